//! Optional LLM-assisted convention refinement.
//!
//! The refiner asks an OpenAI-compatible chat-completions endpoint for the
//! same three convention fields the rule-based matchers produce. Its answers
//! override rule-based values field by field; every failure mode degrades to
//! "no opinion" without surfacing an error.

pub mod client;
pub mod error;
pub mod prompts;

pub use client::ConventionRefiner;
pub use error::LlmError;
