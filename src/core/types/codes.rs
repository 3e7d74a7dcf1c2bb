//! Win32 error code handling for advisory lookups

use std::fmt;

/// Common Win32 error codes surfaced by account/privilege resolution calls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Win32Code {
    Success,
    AccessDenied,
    InvalidHandle,
    InvalidParameter,
    InsufficientBuffer,
    NoneMapped,
    Unrecognized(u32),
}

impl From<u32> for Win32Code {
    fn from(code: u32) -> Self {
        match code {
            0 => Win32Code::Success,
            5 => Win32Code::AccessDenied,
            6 => Win32Code::InvalidHandle,
            87 => Win32Code::InvalidParameter,
            122 => Win32Code::InsufficientBuffer,
            1332 => Win32Code::NoneMapped,
            other => Win32Code::Unrecognized(other),
        }
    }
}

impl Win32Code {
    pub fn raw(self) -> u32 {
        match self {
            Win32Code::Success => 0,
            Win32Code::AccessDenied => 5,
            Win32Code::InvalidHandle => 6,
            Win32Code::InvalidParameter => 87,
            Win32Code::InsufficientBuffer => 122,
            Win32Code::NoneMapped => 1332,
            Win32Code::Unrecognized(code) => code,
        }
    }
}

impl fmt::Display for Win32Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Win32Code::Success => write!(f, "Success"),
            Win32Code::AccessDenied => write!(f, "Access denied"),
            Win32Code::InvalidHandle => write!(f, "Invalid handle"),
            Win32Code::InvalidParameter => write!(f, "Invalid parameter"),
            Win32Code::InsufficientBuffer => write!(f, "Insufficient buffer"),
            Win32Code::NoneMapped => write!(f, "No mapping between account names and SIDs"),
            Win32Code::Unrecognized(code) => write!(f, "Unknown error: {}", code),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codes_round_trip() {
        for code in [0u32, 5, 6, 87, 122, 1332] {
            assert_eq!(Win32Code::from(code).raw(), code);
        }
    }

    #[test]
    fn test_unrecognized_preserved() {
        let code = Win32Code::from(31337);
        assert_eq!(code, Win32Code::Unrecognized(31337));
        assert_eq!(code.raw(), 31337);
        assert_eq!(code.to_string(), "Unknown error: 31337");
    }

    #[test]
    fn test_display() {
        assert!(!Win32Code::NoneMapped.to_string().is_empty());
        assert_eq!(Win32Code::AccessDenied.to_string(), "Access denied");
    }
}
