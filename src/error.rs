//! Error types for todo
//!
//! Exit codes:
//! - 0: Success
//! - 2: User error (bad args, unknown task/tag/user, bad config)
//! - 4: Operation failed (store unavailable, corrupt store data)

use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the todo CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const USER_ERROR: i32 = 2;
    pub const OPERATION_FAILED: i32 = 4;
}

/// Main error type for todo operations
#[derive(Error, Debug)]
pub enum Error {
    // User errors (exit code 2)
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Task not found: {0}")]
    TaskNotFound(String),

    #[error("Tag not found: {0}")]
    TagNotFound(String),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Ambiguous {kind} '{input}': {}", .candidates.join(", "))]
    Ambiguous {
        kind: &'static str,
        input: String,
        candidates: Vec<String>,
    },

    // Operation failures (exit code 4)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Lock acquisition failed: {0}")]
    LockFailed(PathBuf),

    #[error("Corrupt store value for key '{key}': {source}")]
    CorruptStore {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

impl Error {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            // User errors
            Error::InvalidConfig(_)
            | Error::InvalidArgument(_)
            | Error::TaskNotFound(_)
            | Error::TagNotFound(_)
            | Error::UserNotFound(_)
            | Error::Ambiguous { .. } => exit_codes::USER_ERROR,

            // Operation failures
            Error::Io(_)
            | Error::Json(_)
            | Error::TomlParse(_)
            | Error::LockFailed(_)
            | Error::CorruptStore { .. } => exit_codes::OPERATION_FAILED,
        }
    }

    /// Structured fields for the JSON error envelope
    pub fn details(&self) -> Option<serde_json::Value> {
        match self {
            Error::InvalidConfig(message) | Error::InvalidArgument(message) => {
                Some(serde_json::json!({ "message": message }))
            }
            Error::TaskNotFound(input) | Error::TagNotFound(input) | Error::UserNotFound(input) => {
                Some(serde_json::json!({ "input": input }))
            }
            Error::Ambiguous {
                kind,
                input,
                candidates,
            } => Some(serde_json::json!({
                "kind": kind,
                "input": input,
                "candidates": candidates,
            })),
            Error::LockFailed(path) => Some(serde_json::json!({ "path": path })),
            Error::CorruptStore { key, .. } => Some(serde_json::json!({ "key": key })),
            _ => None,
        }
    }
}

/// Result type alias for todo operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error body of the JSON output envelope
#[derive(Debug, serde::Serialize)]
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
