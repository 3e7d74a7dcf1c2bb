//! Security descriptor and DACL decoding
//!
//! Walks self-relative security descriptors out of a query buffer and
//! renders an SDDL-style string form. A null DACL (present bit set, zero
//! offset) grants everything to everyone and decodes to exactly one
//! synthetic allow ACE for the Everyone identity; an empty DACL (zero ACE
//! count) denies by default and decodes to zero ACEs. The two must never
//! produce the same output.

use super::sid::Sid;
use crate::core::types::{QueryError, QueryResult};
use crate::layout::BufferView;
use lazy_static::lazy_static;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt::Write as _;

/// Control flags on a security descriptor
pub const SE_DACL_PRESENT: u16 = 0x0004;
pub const SE_SACL_PRESENT: u16 = 0x0010;
pub const SE_SELF_RELATIVE: u16 = 0x8000;

/// Access mask granted by the synthetic null-DACL ACE
pub const GENERIC_ALL: u32 = 0x1000_0000;

const INHERITED_ACE: u8 = 0x10;

/// Discretionary ACE type, with unknown future values preserved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AceType {
    AccessAllowed,
    AccessDenied,
    SystemAudit,
    Unrecognized(u8),
}

impl From<u8> for AceType {
    fn from(raw: u8) -> Self {
        match raw {
            0 => AceType::AccessAllowed,
            1 => AceType::AccessDenied,
            2 => AceType::SystemAudit,
            other => AceType::Unrecognized(other),
        }
    }
}

/// One decoded access-control entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AceInfo {
    pub ace_type: AceType,
    pub flags: u8,
    pub mask: u32,
    pub sid: Sid,
}

impl AceInfo {
    pub fn is_inherited(&self) -> bool {
        self.flags & INHERITED_ACE != 0
    }

    /// The record substituted for a null DACL
    fn everyone_full_access() -> Self {
        AceInfo {
            ace_type: AceType::AccessAllowed,
            flags: 0,
            mask: GENERIC_ALL,
            sid: Sid::everyone(),
        }
    }
}

/// Decoded discretionary access-control list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DaclInfo {
    /// True when the descriptor carried a null DACL and `entries` holds
    /// the synthetic Everyone record
    pub null_dacl: bool,
    pub entries: Vec<AceInfo>,
}

/// Decoded self-relative security descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SecurityDescriptorInfo {
    pub control: u16,
    pub owner: Option<Sid>,
    pub group: Option<Sid>,
    pub dacl: Option<DaclInfo>,
}

/// Decode a self-relative SECURITY_DESCRIPTOR layout
pub fn decode_security_descriptor(view: &BufferView<'_>) -> QueryResult<SecurityDescriptorInfo> {
    let revision = view.read_u8(0)?;
    if revision != 1 {
        return Err(QueryError::malformed(
            "SECURITY_DESCRIPTOR",
            format!("unsupported revision {}", revision),
        ));
    }
    let control = view.read_u16(2)?;
    if control & SE_SELF_RELATIVE == 0 {
        return Err(QueryError::malformed(
            "SECURITY_DESCRIPTOR",
            "absolute descriptor passed where self-relative expected".to_string(),
        ));
    }

    let owner_offset = view.read_u32(4)? as usize;
    let group_offset = view.read_u32(8)? as usize;
    let dacl_offset = view.read_u32(16)? as usize;

    let owner = if owner_offset != 0 {
        Some(Sid::read_at(view, owner_offset)?)
    } else {
        None
    };
    let group = if group_offset != 0 {
        Some(Sid::read_at(view, group_offset)?)
    } else {
        None
    };

    let dacl = if control & SE_DACL_PRESENT == 0 {
        None
    } else if dacl_offset == 0 {
        // Null DACL: everything is allowed to everyone. This is the
        // opposite of an empty DACL and gets a synthetic record.
        Some(DaclInfo {
            null_dacl: true,
            entries: vec![AceInfo::everyone_full_access()],
        })
    } else {
        Some(DaclInfo {
            null_dacl: false,
            entries: decode_acl(view, dacl_offset)?,
        })
    };

    Ok(SecurityDescriptorInfo {
        control,
        owner,
        group,
        dacl,
    })
}

/// Walk an ACL at `offset`: 8-byte header, then AceCount variable-size ACEs
fn decode_acl(view: &BufferView<'_>, offset: usize) -> QueryResult<Vec<AceInfo>> {
    let ace_count = view.read_u16(offset + 4)? as usize;
    let acl_size = view.read_u16(offset + 2)? as usize;
    let acl_end = offset + acl_size;

    let mut entries = Vec::with_capacity(ace_count);
    let mut cursor = offset + 8;
    for _ in 0..ace_count {
        let ace_type = AceType::from(view.read_u8(cursor)?);
        let flags = view.read_u8(cursor + 1)?;
        let ace_size = view.read_u16(cursor + 2)? as usize;
        if ace_size < 8 || cursor + ace_size > acl_end {
            return Err(QueryError::malformed(
                "ACL",
                format!("ACE at offset {} declares size {}", cursor, ace_size),
            ));
        }
        let mask = view.read_u32(cursor + 4)?;
        let sid = Sid::read_at(view, cursor + 8)?;
        entries.push(AceInfo {
            ace_type,
            flags,
            mask,
            sid,
        });
        // Variable stride: the ACE's declared size, not a constant
        cursor += ace_size;
    }
    Ok(entries)
}

lazy_static! {
    /// Well-known SDDL abbreviations for common SIDs
    static ref SDDL_SID_ALIASES: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        m.insert("S-1-1-0", "WD");
        m.insert("S-1-5-11", "AU");
        m.insert("S-1-5-18", "SY");
        m.insert("S-1-5-19", "LS");
        m.insert("S-1-5-20", "NS");
        m.insert("S-1-5-32-544", "BA");
        m.insert("S-1-5-32-545", "BU");
        m
    };
}

fn sddl_sid(sid: &Sid) -> String {
    let canonical = sid.to_string();
    match SDDL_SID_ALIASES.get(canonical.as_str()) {
        Some(alias) => (*alias).to_string(),
        None => canonical,
    }
}

fn sddl_mask(mask: u32) -> String {
    const GENERIC: [(u32, &str); 4] = [
        (0x1000_0000, "GA"),
        (0x2000_0000, "GX"),
        (0x4000_0000, "GW"),
        (0x8000_0000, "GR"),
    ];
    let generic_bits: u32 = GENERIC.iter().map(|(bit, _)| bit).sum();
    if mask != 0 && mask & !generic_bits == 0 {
        let mut out = String::new();
        for (bit, tag) in GENERIC {
            if mask & bit != 0 {
                out.push_str(tag);
            }
        }
        out
    } else {
        format!("0x{:x}", mask)
    }
}

fn sddl_ace_flags(flags: u8) -> String {
    const FLAGS: [(u8, &str); 5] = [
        (0x01, "OI"),
        (0x02, "CI"),
        (0x04, "NP"),
        (0x08, "IO"),
        (0x10, "ID"),
    ];
    let mut out = String::new();
    for (bit, tag) in FLAGS {
        if flags & bit != 0 {
            out.push_str(tag);
        }
    }
    out
}

/// Render the normalized SDDL-style string form of a decoded descriptor
pub fn descriptor_string(descriptor: &SecurityDescriptorInfo) -> String {
    let mut out = String::new();
    if let Some(owner) = &descriptor.owner {
        let _ = write!(out, "O:{}", sddl_sid(owner));
    }
    if let Some(group) = &descriptor.group {
        let _ = write!(out, "G:{}", sddl_sid(group));
    }
    if let Some(dacl) = &descriptor.dacl {
        out.push_str("D:");
        for ace in &dacl.entries {
            let tag = match ace.ace_type {
                AceType::AccessAllowed => "A".to_string(),
                AceType::AccessDenied => "D".to_string(),
                AceType::SystemAudit => "AU".to_string(),
                AceType::Unrecognized(raw) => format!("0x{:x}", raw),
            };
            let _ = write!(
                out,
                "({};{};{};;;{})",
                tag,
                sddl_ace_flags(ace.flags),
                sddl_mask(ace.mask),
                sddl_sid(&ace.sid)
            );
        }
    }
    out
}
