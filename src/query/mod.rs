//! Growable-buffer query protocol
//!
//! The adapter owns buffer lifecycle: allocate at a caller-supplied hint,
//! invoke, grow on the native "buffer too small" status, and release on
//! every exit path. Decoders never see a buffer the native layer did not
//! accept.

mod adapter;
mod buffer;
mod guard;
mod selector;

pub use adapter::{query_growable, NativeQuery};
pub use buffer::GrowableBuffer;
pub use guard::{HandleGuard, HandleProvider};
pub use selector::{InfoSelector, ObjectClass, RawHandle, SystemClass, TokenClass};
