//! Core module containing fundamental types for ntquery
//!
//! Provides the status, error, and advisory types shared by the
//! growable-buffer adapter and every decoder family.

pub mod types;

// Re-export commonly used types for convenience
pub use types::{Advisory, NtStatus, QueryError, QueryResult, StatusKind, Win32Code};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const AUTHORS: &str = env!("CARGO_PKG_AUTHORS");
