//! Refiner-specific error handling.

use thiserror::Error;

/// Convention refiner errors.
///
/// Every variant is recovered inside this subsystem: a failed refinement
/// run degrades to "no opinion" for that run, never to a caller-visible
/// failure.
#[derive(Error, Debug)]
pub enum LlmError {
    /// API key not found in settings or environment variables.
    #[error("LLM API key not found. Set LLM_API_KEY or OPENAI_API_KEY environment variable")]
    ApiKeyNotFound,

    /// The endpoint answered with a non-success status.
    #[error("LLM API request failed: {0}")]
    ApiRequestFailed(String),

    /// The response body or its message content had an unexpected shape.
    #[error("Invalid response format from LLM API: {0}")]
    InvalidResponseFormat(String),

    /// Network connectivity error, including timeouts.
    #[error("Network error: {0}")]
    NetworkError(String),
}
