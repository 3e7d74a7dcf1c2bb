//! Kernel object enumeration decoders
//!
//! Handle decoding depends on a prior object-type enumeration: the type
//! table is an explicit parameter, never an implicit call ordering.

pub mod handles;
pub mod types;

pub use handles::{
    decode_extended_handles, filter_handles, HandleFilter, HandleRecord,
    HANDLE_ATTRIBUTE_INHERIT,
};
pub use types::{decode_object_types, ObjectTypeInfo, ObjectTypeTable};
