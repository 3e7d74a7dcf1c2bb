//! Security identifier parsing and formatting
//!
//! SIDs are carried as owned copies of their self-relative binary form, so
//! records outlive the query buffer they were decoded from.

use crate::core::types::{QueryError, QueryResult};
use crate::layout::BufferView;
use serde::{Serialize, Serializer};
use std::fmt;

const SID_REVISION: u8 = 1;
const SID_MAX_SUB_AUTHORITIES: usize = 15;

/// Owned, immutable security identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Sid {
    bytes: Vec<u8>,
}

impl Sid {
    /// Parse the self-relative binary layout: revision, sub-authority
    /// count, a 6-byte big-endian authority, then count little-endian
    /// 32-bit sub-authorities. Trailing bytes beyond the declared length
    /// are ignored.
    pub fn from_bytes(raw: &[u8]) -> QueryResult<Self> {
        if raw.len() < 8 {
            return Err(QueryError::malformed(
                "SID",
                format!("{} bytes is shorter than the fixed header", raw.len()),
            ));
        }
        if raw[0] != SID_REVISION {
            return Err(QueryError::malformed(
                "SID",
                format!("unsupported revision {}", raw[0]),
            ));
        }
        let count = raw[1] as usize;
        if count > SID_MAX_SUB_AUTHORITIES {
            return Err(QueryError::malformed(
                "SID",
                format!("{} sub-authorities exceeds the maximum of 15", count),
            ));
        }
        let declared = 8 + 4 * count;
        if raw.len() < declared {
            return Err(QueryError::malformed(
                "SID",
                format!("declares {} bytes but only {} present", declared, raw.len()),
            ));
        }
        Ok(Sid {
            bytes: raw[..declared].to_vec(),
        })
    }

    /// Read a SID embedded in a query buffer at `offset`
    pub fn read_at(view: &BufferView<'_>, offset: usize) -> QueryResult<Self> {
        let header = view.bytes(offset, 8)?;
        let count = header[1] as usize;
        let declared = 8 + 4 * count.min(SID_MAX_SUB_AUTHORITIES);
        Sid::from_bytes(view.bytes(offset, declared)?)
    }

    /// Build from identifier authority and sub-authorities
    pub fn from_parts(authority: u64, sub_authorities: &[u32]) -> QueryResult<Self> {
        if sub_authorities.len() > SID_MAX_SUB_AUTHORITIES {
            return Err(QueryError::malformed(
                "SID",
                format!("{} sub-authorities exceeds the maximum of 15", sub_authorities.len()),
            ));
        }
        let mut bytes = Vec::with_capacity(8 + 4 * sub_authorities.len());
        bytes.push(SID_REVISION);
        bytes.push(sub_authorities.len() as u8);
        bytes.extend_from_slice(&authority.to_be_bytes()[2..8]);
        for sub in sub_authorities {
            bytes.extend_from_slice(&sub.to_le_bytes());
        }
        Ok(Sid { bytes })
    }

    /// Parse the canonical string form ("S-1-5-32-544")
    pub fn parse(s: &str) -> QueryResult<Self> {
        let malformed = |reason: String| QueryError::Malformed {
            what: "SID string",
            reason,
        };
        let rest = s
            .strip_prefix("S-1-")
            .or_else(|| s.strip_prefix("s-1-"))
            .ok_or_else(|| malformed(format!("{:?} does not start with S-1-", s)))?;
        let mut parts = rest.split('-');
        let authority_part = parts
            .next()
            .filter(|p| !p.is_empty())
            .ok_or_else(|| malformed("missing identifier authority".to_string()))?;
        let authority = if let Some(hex) = authority_part
            .strip_prefix("0x")
            .or_else(|| authority_part.strip_prefix("0X"))
        {
            u64::from_str_radix(hex, 16)
        } else {
            authority_part.parse::<u64>()
        }
        .map_err(|_| malformed(format!("bad identifier authority {:?}", authority_part)))?;

        let mut subs = Vec::new();
        for part in parts {
            let sub = part
                .parse::<u32>()
                .map_err(|_| malformed(format!("bad sub-authority {:?}", part)))?;
            subs.push(sub);
        }
        Sid::from_parts(authority, &subs)
    }

    /// Well-known Everyone identity (S-1-1-0)
    pub fn everyone() -> Self {
        Sid::from_parts(1, &[0]).expect("well-known SID is valid")
    }

    /// Well-known Local System identity (S-1-5-18)
    pub fn local_system() -> Self {
        Sid::from_parts(5, &[18]).expect("well-known SID is valid")
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// 48-bit identifier authority
    pub fn authority(&self) -> u64 {
        let mut auth = [0u8; 8];
        auth[2..8].copy_from_slice(&self.bytes[2..8]);
        u64::from_be_bytes(auth)
    }

    pub fn sub_authority_count(&self) -> usize {
        self.bytes[1] as usize
    }

    pub fn sub_authorities(&self) -> Vec<u32> {
        self.bytes[8..]
            .chunks_exact(4)
            .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect()
    }

    /// Relative identifier: the last sub-authority component. Used to
    /// extract an integrity level from a mandatory-label SID.
    pub fn rid(&self) -> Option<u32> {
        self.sub_authorities().last().copied()
    }
}

impl fmt::Display for Sid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S-1-")?;
        let authority = self.authority();
        // Canonical form: decimal below 2^32, hex at or above
        if authority < (1u64 << 32) {
            write!(f, "{}", authority)?;
        } else {
            write!(f, "0x{:012X}", authority)?;
        }
        for sub in self.sub_authorities() {
            write!(f, "-{}", sub)?;
        }
        Ok(())
    }
}

impl Serialize for Sid {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Account classification reported by SID resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SidNameUse {
    User,
    Group,
    Domain,
    Alias,
    WellKnownGroup,
    DeletedAccount,
    Invalid,
    Unknown,
    Computer,
    Label,
    LogonSession,
    Unrecognized(u32),
}

impl From<u32> for SidNameUse {
    fn from(raw: u32) -> Self {
        match raw {
            1 => SidNameUse::User,
            2 => SidNameUse::Group,
            3 => SidNameUse::Domain,
            4 => SidNameUse::Alias,
            5 => SidNameUse::WellKnownGroup,
            6 => SidNameUse::DeletedAccount,
            7 => SidNameUse::Invalid,
            8 => SidNameUse::Unknown,
            9 => SidNameUse::Computer,
            10 => SidNameUse::Label,
            11 => SidNameUse::LogonSession,
            other => SidNameUse::Unrecognized(other),
        }
    }
}

/// Resolved account identity for a SID
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountInfo {
    pub name: String,
    pub domain: String,
    pub use_kind: SidNameUse,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_binary_round_trip() {
        let sid = Sid::from_parts(5, &[32, 544]).unwrap();
        assert_eq!(sid.to_string(), "S-1-5-32-544");
        assert_eq!(Sid::from_bytes(sid.as_bytes()).unwrap(), sid);
        assert_eq!(sid.authority(), 5);
        assert_eq!(sid.sub_authorities(), vec![32, 544]);
        assert_eq!(sid.rid(), Some(544));
    }

    #[test]
    fn test_parse_canonical_string() {
        let sid = Sid::parse("S-1-5-21-100-200-300-1001").unwrap();
        assert_eq!(sid.sub_authority_count(), 5);
        assert_eq!(sid.rid(), Some(1001));
        assert_eq!(sid.to_string(), "S-1-5-21-100-200-300-1001");

        assert_eq!(Sid::parse("S-1-1-0").unwrap(), Sid::everyone());
        assert!(Sid::parse("X-1-5").is_err());
        assert!(Sid::parse("S-1-5-notanumber").is_err());
    }

    #[test]
    fn test_large_authority_renders_hex() {
        let sid = Sid::from_parts(0xABCD_1234_5678, &[1]).unwrap();
        assert_eq!(sid.to_string(), "S-1-0xABCD12345678-1");
        assert_eq!(Sid::parse(&sid.to_string()).unwrap(), sid);
    }

    #[test]
    fn test_zero_sub_authorities() {
        let sid = Sid::from_parts(3, &[]).unwrap();
        assert_eq!(sid.rid(), None);
        assert_eq!(sid.to_string(), "S-1-3");
    }

    #[test]
    fn test_malformed_binary() {
        assert!(Sid::from_bytes(&[1, 1, 0, 0]).is_err());
        // Wrong revision
        assert!(Sid::from_bytes(&[2, 0, 0, 0, 0, 0, 0, 1]).is_err());
        // Declares more sub-authorities than present
        assert!(Sid::from_bytes(&[1, 3, 0, 0, 0, 0, 0, 5, 1, 0, 0, 0]).is_err());
    }

    #[test]
    fn test_read_at_offset() {
        let mandatory = Sid::from_parts(16, &[0x2000]).unwrap();
        let mut buffer = vec![0u8; 16];
        buffer.extend_from_slice(mandatory.as_bytes());
        let view = BufferView::new(&buffer);
        let read = Sid::read_at(&view, 16).unwrap();
        assert_eq!(read, mandatory);
        assert_eq!(read.rid(), Some(0x2000));
    }

    #[test]
    fn test_sid_name_use_fallback() {
        assert_eq!(SidNameUse::from(5), SidNameUse::WellKnownGroup);
        assert_eq!(SidNameUse::from(77), SidNameUse::Unrecognized(77));
    }

    #[test]
    fn test_serializes_as_string() {
        let json = serde_json::to_string(&Sid::everyone()).unwrap();
        assert_eq!(json, "\"S-1-1-0\"");
    }
}
