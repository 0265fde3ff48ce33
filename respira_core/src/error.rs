//! Error types for the respira_core library.

use crate::Phase;
use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for respira_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Phase duration outside the allowed range
    #[error("Invalid duration for {phase}: {seconds}s (allowed 1-10s)")]
    InvalidDuration { phase: Phase, seconds: u8 },

    /// Command not allowed in the engine's current state
    #[error("Invalid state transition: {0}")]
    InvalidStateTransition(String),

    /// Exercise name not recognised
    #[error("Unknown exercise: {0}")]
    UnknownExercise(String),

    /// Phase name not recognised
    #[error("Unknown phase: {0}")]
    UnknownPhase(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}
