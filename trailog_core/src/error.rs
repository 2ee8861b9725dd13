//! Error types for the trailog_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for trailog_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Workout input rejected before a record was built
    #[error("Invalid input: {0}")]
    Validation(String),

    /// A record with this id is already in the store
    #[error("Duplicate workout id: {0}")]
    DuplicateId(String),

    /// No record with this id
    #[error("Workout not found: {0}")]
    NotFound(String),

    /// Persisted payload is not well-formed
    #[error("Corrupt workout data: {0}")]
    CorruptData(String),

    /// Persisted entry parsed but violates workout invariants
    #[error("Invalid stored workout: {0}")]
    InvalidWorkout(String),

    /// Current position could not be determined
    #[error("Location unavailable: {0}")]
    Location(String),
}
