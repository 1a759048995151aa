//! Error types for tsk
//!
//! Exit codes:
//! - 0: Success
//! - 2: User error (bad args, invalid input, bad config)
//! - 3: Auth required (no owner signed in, rejected credentials)
//! - 4: Operation failed (backend unreachable, IO, lock contention)

use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the tsk CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const USER_ERROR: i32 = 2;
    pub const AUTH_REQUIRED: i32 = 3;
    pub const OPERATION_FAILED: i32 = 4;
}

/// Main error type for tsk operations
#[derive(Error, Debug)]
pub enum Error {
    // User errors (exit code 2)
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // Auth boundary (exit code 3)
    #[error("Not signed in: {0}")]
    Auth(String),

    // Operation failures (exit code 4)
    #[error("Task not found: {0}")]
    NotFound(String),

    #[error("Backend unreachable: {0}")]
    Connection(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Lock acquisition failed: {0}")]
    LockFailed(PathBuf),
}

impl Error {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            // User errors
            Error::Validation(_) | Error::InvalidArgument(_) | Error::InvalidConfig(_) => {
                exit_codes::USER_ERROR
            }

            // Auth boundary
            Error::Auth(_) => exit_codes::AUTH_REQUIRED,

            // Operation failures
            Error::NotFound(_)
            | Error::Connection(_)
            | Error::Io(_)
            | Error::Json(_)
            | Error::TomlParse(_)
            | Error::TomlSerialize(_)
            | Error::LockFailed(_) => exit_codes::OPERATION_FAILED,
        }
    }

    /// True when a mutation target was already gone on the backend.
    ///
    /// The store treats this as a benign no-op rather than a failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }
}

/// Result type alias for tsk operations
pub type Result<T> = std::result::Result<T, Error>;
