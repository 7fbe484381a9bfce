//! Error types for tdo
//!
//! Exit codes:
//! - 0: Success
//! - 2: User error (bad args, missing project, unknown task)
//! - 4: Operation failed (I/O error, interrupted move)

use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the tdo CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const USER_ERROR: i32 = 2;
    pub const OPERATION_FAILED: i32 = 4;
}

/// Main error type for tdo operations
#[derive(Error, Debug)]
pub enum Error {
    // User errors (exit code 2)
    #[error("No TASKS directory found from {0}")]
    ProjectNotFound(PathBuf),

    #[error("No such task: {0}")]
    NotFound(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("File already exists: {0}")]
    AlreadyExists(PathBuf),

    // Operation failures (exit code 4)
    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Move interrupted: {} was copied to {} but could not be removed", from.display(), to.display())]
    PartialMove { from: PathBuf, to: PathBuf },
}

impl Error {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::ProjectNotFound(_)
            | Error::NotFound(_)
            | Error::Parse(_)
            | Error::InvalidArgument(_)
            | Error::InvalidConfig(_)
            | Error::AlreadyExists(_) => exit_codes::USER_ERROR,

            Error::Storage(_) | Error::Json(_) | Error::PartialMove { .. } => {
                exit_codes::OPERATION_FAILED
            }
        }
    }

    /// Structured details for JSON error output, when the error carries paths.
    pub fn details(&self) -> Option<serde_json::Value> {
        match self {
            Error::ProjectNotFound(start) => Some(serde_json::json!({ "start": start })),
            Error::AlreadyExists(path) => Some(serde_json::json!({ "path": path })),
            Error::PartialMove { from, to } => Some(serde_json::json!({
                "from": from,
                "to": to,
            })),
            _ => None,
        }
    }
}

/// Result type alias for tdo operations
pub type Result<T> = std::result::Result<T, Error>;

/// Wrapper for displaying errors in JSON format
#[derive(serde::Serialize)]
pub struct JsonError {
    pub message: String,
    pub code: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl From<&Error> for JsonError {
    fn from(err: &Error) -> Self {
        JsonError {
            message: err.to_string(),
            code: err.exit_code(),
            details: err.details(),
        }
    }
}
