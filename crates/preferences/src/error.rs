//! Error types for the preferences crate.

use catalog::GenreId;
use thiserror::Error;

/// Errors raised while reading or writing genre preferences
#[derive(Error, Debug)]
pub enum PreferenceError {
    /// The id is not in the genre reference table
    #[error("Unknown genre id: {0}")]
    InvalidGenreId(GenreId),

    /// The profile file could not be read or written
    #[error("Profile storage error: {0}")]
    Io(#[from] std::io::Error),

    /// The profile file exists but is not a valid preferences record
    #[error("Profile serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, PreferenceError>;
