//! Windows API layer
//!
//! Real implementations of the native seams. All unsafe FFI calls are
//! contained within this module; everything above it consumes the traits
//! and decodes plain bytes.

pub mod bindings;
pub mod native;
pub mod strings;

pub use native::SystemNative;
