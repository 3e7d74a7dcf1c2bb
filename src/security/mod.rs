//! SID and security-descriptor helpers

pub mod acl;
pub mod sid;

pub use acl::{
    decode_security_descriptor, descriptor_string, AceInfo, AceType, DaclInfo,
    SecurityDescriptorInfo, GENERIC_ALL, SE_DACL_PRESENT, SE_SELF_RELATIVE,
};
pub use sid::{AccountInfo, Sid, SidNameUse};
