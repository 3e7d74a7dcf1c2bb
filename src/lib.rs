//! ntquery: variable-length native information queries for Windows
//!
//! Wraps the probe-then-fetch convention of the NtQuery* family behind a
//! growable-buffer adapter, then decodes the returned byte layouts into
//! typed records: access-token information, the kernel object-type table,
//! the system extended-handle table, and self-relative security
//! descriptors. Decoders are pure functions over bounds-checked views and
//! run on any platform; the FFI layer is confined to the `windows`
//! module.

#![allow(dead_code)]

pub mod config;
pub mod core;
pub mod inspect;
pub mod layout;
pub mod object;
pub mod query;
pub mod security;
pub mod token;

#[cfg(windows)]
pub mod windows;

// Re-export main types from core module
pub use core::types::{Advisory, NtStatus, QueryError, QueryResult, StatusKind, Win32Code};

pub use layout::{BufferView, PointerWidth};
pub use query::{
    query_growable, GrowableBuffer, HandleGuard, HandleProvider, InfoSelector, NativeQuery,
    ObjectClass, RawHandle, SystemClass, TokenClass,
};
