//! Error types for the fitness-tracker library.
//!
//! This module provides custom error types using `thiserror` for better error handling
//! and more specific error messages throughout the application.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur in the fitness-tracker application.
#[derive(Error, Debug)]
pub enum FitnessError {
    /// Username unknown or password digest mismatch
    #[error("Invalid login credentials for user: {0}")]
    AuthFailure(String),

    /// A persisted file exists but cannot be parsed
    #[error("Malformed store at {path}: {message}")]
    MalformedStore {
        /// File that failed to parse
        path: PathBuf,
        /// Parser diagnostic
        message: String,
    },

    /// Attempt to provision an account that already exists
    #[error("User already exists: {0}")]
    UserExists(String),

    /// Food name missing from the reference table
    #[error("Unknown food: {0}")]
    UnknownFood(String),

    /// Unparsable user input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Invalid date format
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Session state machine violation
    #[error("Session error: {0}")]
    Session(String),

    /// Training or inference failure
    #[error("Model error: {0}")]
    Model(String),

    /// File I/O errors
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV encoding errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl FitnessError {
    /// Wrap a parse failure of the file at `path`.
    pub fn malformed(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::MalformedStore {
            path: path.into(),
            message: message.to_string(),
        }
    }

    /// True for errors the shell reports inline and recovers from.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::AuthFailure(_)
                | Self::UserExists(_)
                | Self::UnknownFood(_)
                | Self::InvalidInput(_)
                | Self::InvalidDate(_)
                | Self::Session(_)
        )
    }
}

/// Convenience type alias for Result with FitnessError
pub type Result<T> = std::result::Result<T, FitnessError>;
