//! Shared types used across all query and decode modules

mod advisory;
mod codes;
mod error;
mod status;

pub use advisory::Advisory;
pub use codes::Win32Code;
pub use error::{QueryError, QueryResult};
pub use status::{NtStatus, StatusKind};
