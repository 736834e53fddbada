//! Error types for hkipo.

use thiserror::Error;

/// Errors that can occur while fetching, classifying or emitting IPO events.
#[derive(Error, Debug)]
pub enum HkIpoError {
    #[error("Configuration error: {0}")]
    Config(String),

    /// Transport-level failure that survived every retry.
    #[error("Fetch failed after {attempts} attempt(s): {cause}")]
    Fetch { attempts: u32, cause: String },

    /// The upstream answered, but not with the payload we expect. Never retried.
    #[error("Malformed upstream payload: {0}")]
    Parse(String),

    #[error("ICS generation error: {0}")]
    IcsGenerate(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for hkipo operations.
pub type HkIpoResult<T> = Result<T, HkIpoError>;
