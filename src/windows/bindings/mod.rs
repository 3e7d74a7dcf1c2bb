//! Windows API bindings
//!
//! Low-level FFI declarations with thin safe wrappers. All unsafe calls
//! are contained here and in `native`.

pub mod ntdll;

pub use ntdll::{query_information_token, query_object, query_system_information};
