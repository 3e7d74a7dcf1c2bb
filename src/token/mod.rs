//! Access-token decoding: attribute tables and per-class decoders

pub mod attributes;
pub mod decode;

pub use attributes::{
    group_attribute_names, privilege_attribute_names, privilege_description, privilege_name,
};
pub use decode::{
    decode_groups, decode_integrity_level, decode_origin, decode_privileges, decode_session_id,
    decode_single_sid, decode_source, decode_statistics, decode_user, IntegrityLabel,
    IntegrityLevel, TokenGroup, TokenPrivilege, TokenSource, TokenStatistics, TokenType, TokenUser,
};
