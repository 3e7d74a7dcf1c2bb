//! Custom error types for native query operations

use super::status::NtStatus;
use thiserror::Error;

/// Main error type for variable-length native queries
#[derive(Error, Debug)]
pub enum QueryError {
    #[error("{api} failed with status {status}")]
    Native { api: &'static str, status: NtStatus },

    #[error("Access denied to process {pid}: {reason}")]
    AccessDenied { pid: u32, reason: String },

    #[error("Process {0} not found")]
    ProcessNotFound(u32),

    #[error("{api} kept reporting a length mismatch past the {limit} byte capacity limit")]
    BufferLimit { api: &'static str, limit: usize },

    #[error("Malformed {what} buffer: {reason}")]
    Malformed { what: &'static str, reason: String },

    #[error("Read past used length at offset {offset}: needed {needed} bytes, {available} available")]
    OutOfBounds {
        offset: usize,
        needed: usize,
        available: usize,
    },

    #[error("Invalid handle: {0}")]
    InvalidHandle(String),

    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),
}

/// Result type alias for query operations
pub type QueryResult<T> = Result<T, QueryError>;

impl QueryError {
    /// Creates a native failure carrying the raw status
    pub fn native(api: &'static str, status: NtStatus) -> Self {
        QueryError::Native { api, status }
    }

    /// Creates an access denied error for a process
    pub fn access_denied(pid: u32, reason: impl Into<String>) -> Self {
        QueryError::AccessDenied {
            pid,
            reason: reason.into(),
        }
    }

    /// Creates a malformed-buffer error for a named layout
    pub fn malformed(what: &'static str, reason: impl Into<String>) -> Self {
        QueryError::Malformed {
            what,
            reason: reason.into(),
        }
    }
}
