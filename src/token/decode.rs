//! Token-information decoders
//!
//! Pure functions over a buffer view, one per token-information variant.
//! Fixed-size variants read at offset 0; array variants read a 4-byte
//! count then walk fixed-size entries. Variants whose entries embed
//! absolute pointers back into the same buffer take the buffer's base
//! address and translate each pointer to a checked offset.

use super::attributes::{
    group_attribute_names, privilege_attribute_names, privilege_description, privilege_name,
    SE_GROUP_ENABLED, SE_PRIVILEGE_ENABLED,
};
use crate::core::types::{QueryError, QueryResult};
use crate::layout::{BufferView, PointerWidth};
use crate::security::Sid;
use serde::Serialize;
use std::fmt;

/// Token user: the primary SID plus its attribute bits
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenUser {
    pub sid: Sid,
    pub attributes: u32,
}

/// One token group entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenGroup {
    pub sid: Sid,
    pub attributes: u32,
}

impl TokenGroup {
    pub fn is_enabled(&self) -> bool {
        self.attributes & SE_GROUP_ENABLED != 0
    }

    pub fn attribute_names(&self) -> Vec<&'static str> {
        group_attribute_names(self.attributes)
    }
}

/// One token privilege entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TokenPrivilege {
    pub luid_low: u32,
    pub luid_high: i32,
    pub attributes: u32,
}

impl TokenPrivilege {
    pub fn luid(&self) -> u64 {
        ((self.luid_high as u32 as u64) << 32) | self.luid_low as u64
    }

    pub fn is_enabled(&self) -> bool {
        self.attributes & SE_PRIVILEGE_ENABLED != 0
    }

    /// Well-known name, from the static LUID table
    pub fn name(&self) -> Option<&'static str> {
        if self.luid_high != 0 {
            return None;
        }
        privilege_name(self.luid_low)
    }

    /// User-facing description, from the static table
    pub fn description(&self) -> Option<&'static str> {
        self.name().and_then(privilege_description)
    }

    pub fn attribute_names(&self) -> Vec<&'static str> {
        privilege_attribute_names(self.attributes)
    }
}

impl fmt::Display for TokenPrivilege {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{}", name)?,
            None => write!(f, "Luid(0x{:x})", self.luid())?,
        }
        if self.is_enabled() {
            write!(f, " [enabled]")?;
        }
        Ok(())
    }
}

/// Integrity tier encoded as the RID of the mandatory-label SID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum IntegrityLevel {
    Untrusted,
    Low,
    Medium,
    MediumPlus,
    High,
    System,
    Protected,
    Unrecognized(u32),
}

impl IntegrityLevel {
    pub fn from_rid(rid: u32) -> Self {
        match rid {
            0x0000 => IntegrityLevel::Untrusted,
            0x1000 => IntegrityLevel::Low,
            0x2000 => IntegrityLevel::Medium,
            0x2100 => IntegrityLevel::MediumPlus,
            0x3000 => IntegrityLevel::High,
            0x4000 => IntegrityLevel::System,
            r if r >= 0x5000 => IntegrityLevel::Protected,
            other => IntegrityLevel::Unrecognized(other),
        }
    }
}

impl fmt::Display for IntegrityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntegrityLevel::Untrusted => write!(f, "Untrusted"),
            IntegrityLevel::Low => write!(f, "Low"),
            IntegrityLevel::Medium => write!(f, "Medium"),
            IntegrityLevel::MediumPlus => write!(f, "Medium+"),
            IntegrityLevel::High => write!(f, "High"),
            IntegrityLevel::System => write!(f, "System"),
            IntegrityLevel::Protected => write!(f, "Protected"),
            IntegrityLevel::Unrecognized(rid) => write!(f, "Unrecognized(0x{:x})", rid),
        }
    }
}

/// Decoded mandatory-label information
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IntegrityLabel {
    pub sid: Sid,
    pub attributes: u32,
    pub level: IntegrityLevel,
}

/// Type of a token, with unknown future values preserved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TokenType {
    Primary,
    Impersonation,
    Unrecognized(u32),
}

impl From<u32> for TokenType {
    fn from(raw: u32) -> Self {
        match raw {
            1 => TokenType::Primary,
            2 => TokenType::Impersonation,
            other => TokenType::Unrecognized(other),
        }
    }
}

/// Fixed-layout token statistics block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TokenStatistics {
    pub token_id: u64,
    pub authentication_id: u64,
    pub expiration_time: i64,
    pub token_type: TokenType,
    pub impersonation_level: u32,
    pub dynamic_charged: u32,
    pub dynamic_available: u32,
    pub group_count: u32,
    pub privilege_count: u32,
    pub modified_id: u64,
}

/// Token source: an 8-character ASCII tag plus its LUID
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenSource {
    pub name: String,
    pub source_identifier: u64,
}

fn pointer_to_offset(ptr: u64, base: u64, what: &'static str) -> QueryResult<usize> {
    ptr.checked_sub(base)
        .map(|off| off as usize)
        .ok_or_else(|| {
            QueryError::malformed(
                what,
                format!("embedded pointer 0x{:x} precedes buffer base 0x{:x}", ptr, base),
            )
        })
}

/// The count field is untrusted input; the announced array must fit inside
/// the buffer before any allocation sized from it.
fn check_array_bounds(
    count: usize,
    stride: usize,
    array_start: usize,
    view: &BufferView<'_>,
    what: &'static str,
) -> QueryResult<()> {
    count
        .checked_mul(stride)
        .and_then(|len| len.checked_add(array_start))
        .filter(|&end| end <= view.len())
        .map(|_| ())
        .ok_or_else(|| {
            QueryError::malformed(
                what,
                format!("announced count {count} exceeds buffer of {} bytes", view.len()),
            )
        })
}

fn read_sid_and_attributes(
    view: &BufferView<'_>,
    offset: usize,
    width: PointerWidth,
    base: u64,
    what: &'static str,
) -> QueryResult<(Sid, u32)> {
    let sid_ptr = view.read_ptr(offset, width)?;
    let attributes = view.read_u32(offset + width.bytes())?;
    let sid_offset = pointer_to_offset(sid_ptr, base, what)?;
    Ok((Sid::read_at(view, sid_offset)?, attributes))
}

/// Decode a TokenUser buffer (single SID_AND_ATTRIBUTES at offset 0)
pub fn decode_user(
    view: &BufferView<'_>,
    width: PointerWidth,
    base: u64,
) -> QueryResult<TokenUser> {
    let (sid, attributes) = read_sid_and_attributes(view, 0, width, base, "TOKEN_USER")?;
    Ok(TokenUser { sid, attributes })
}

/// Decode a TokenGroups buffer: 4-byte count, then SID_AND_ATTRIBUTES
/// entries starting one pointer-width in
pub fn decode_groups(
    view: &BufferView<'_>,
    width: PointerWidth,
    base: u64,
) -> QueryResult<Vec<TokenGroup>> {
    let count = view.read_u32(0)? as usize;
    let stride = 2 * width.bytes();
    check_array_bounds(count, stride, width.bytes(), view, "TOKEN_GROUPS")?;
    let mut groups = Vec::with_capacity(count);
    for i in 0..count {
        let offset = width.bytes() + i * stride;
        let (sid, attributes) =
            read_sid_and_attributes(view, offset, width, base, "TOKEN_GROUPS")?;
        groups.push(TokenGroup { sid, attributes });
    }
    Ok(groups)
}

/// Decode a TokenPrivileges buffer: 4-byte count, then 12-byte
/// LUID_AND_ATTRIBUTES entries starting at offset 4. The privilege array
/// is 4-byte aligned on both pointer widths.
pub fn decode_privileges(view: &BufferView<'_>) -> QueryResult<Vec<TokenPrivilege>> {
    let count = view.read_u32(0)? as usize;
    check_array_bounds(count, 12, 4, view, "TOKEN_PRIVILEGES")?;
    let mut privileges = Vec::with_capacity(count);
    for i in 0..count {
        let offset = 4 + i * 12;
        privileges.push(TokenPrivilege {
            luid_low: view.read_u32(offset)?,
            luid_high: view.read_i32(offset + 4)?,
            attributes: view.read_u32(offset + 8)?,
        });
    }
    Ok(privileges)
}

/// Decode a TokenOwner or TokenPrimaryGroup buffer (single SID pointer)
pub fn decode_single_sid(
    view: &BufferView<'_>,
    width: PointerWidth,
    base: u64,
) -> QueryResult<Sid> {
    let sid_ptr = view.read_ptr(0, width)?;
    let sid_offset = pointer_to_offset(sid_ptr, base, "TOKEN_OWNER")?;
    Sid::read_at(view, sid_offset)
}

/// Decode a TokenIntegrityLevel buffer (mandatory-label
/// SID_AND_ATTRIBUTES); the level is the label SID's RID
pub fn decode_integrity_level(
    view: &BufferView<'_>,
    width: PointerWidth,
    base: u64,
) -> QueryResult<IntegrityLabel> {
    let (sid, attributes) =
        read_sid_and_attributes(view, 0, width, base, "TOKEN_MANDATORY_LABEL")?;
    let rid = sid.rid().ok_or_else(|| {
        QueryError::malformed("TOKEN_MANDATORY_LABEL", "label SID has no RID".to_string())
    })?;
    Ok(IntegrityLabel {
        sid,
        attributes,
        level: IntegrityLevel::from_rid(rid),
    })
}

/// Decode a TokenSessionId buffer (4-byte session number at offset 0)
pub fn decode_session_id(view: &BufferView<'_>) -> QueryResult<u32> {
    view.read_u32(0)
}

/// Decode a TokenStatistics buffer (fixed struct at offset 0)
pub fn decode_statistics(view: &BufferView<'_>) -> QueryResult<TokenStatistics> {
    Ok(TokenStatistics {
        token_id: view.read_u64(0)?,
        authentication_id: view.read_u64(8)?,
        expiration_time: view.read_i64(16)?,
        token_type: TokenType::from(view.read_u32(24)?),
        impersonation_level: view.read_u32(28)?,
        dynamic_charged: view.read_u32(32)?,
        dynamic_available: view.read_u32(36)?,
        group_count: view.read_u32(40)?,
        privilege_count: view.read_u32(44)?,
        modified_id: view.read_u64(48)?,
    })
}

/// Decode a TokenOrigin buffer (originating logon session LUID)
pub fn decode_origin(view: &BufferView<'_>) -> QueryResult<u64> {
    view.read_u64(0)
}

/// Decode a TokenSource buffer (8-byte ASCII tag plus LUID)
pub fn decode_source(view: &BufferView<'_>) -> QueryResult<TokenSource> {
    let raw = view.bytes(0, 8)?;
    let end = raw.iter().position(|&b| b == 0).unwrap_or(8);
    let name = String::from_utf8_lossy(&raw[..end]).trim_end().to_string();
    Ok(TokenSource {
        name,
        source_identifier: view.read_u64(8)?,
    })
}
