//! Read-only git data collection.

pub mod snapshot;

pub use snapshot::{GitSnapshot, TagRecord};

/// Default number of commits sampled for history analysis.
pub const DEFAULT_MAX_COMMITS: usize = 400;
