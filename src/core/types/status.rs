//! NTSTATUS handling for native query calls

use serde::Serialize;
use std::fmt;

/// Raw NTSTATUS value returned by an ntdll-level call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct NtStatus(pub i32);

impl NtStatus {
    pub const SUCCESS: NtStatus = NtStatus(0);
    pub const BUFFER_OVERFLOW: NtStatus = NtStatus(0x8000_0005_u32 as i32);
    pub const INVALID_INFO_CLASS: NtStatus = NtStatus(0xC000_0003_u32 as i32);
    pub const INFO_LENGTH_MISMATCH: NtStatus = NtStatus(0xC000_0004_u32 as i32);
    pub const ACCESS_DENIED: NtStatus = NtStatus(0xC000_0022_u32 as i32);
    pub const BUFFER_TOO_SMALL: NtStatus = NtStatus(0xC000_0023_u32 as i32);

    /// Severity bits clear means success (informational statuses included)
    pub fn is_success(self) -> bool {
        self.0 >= 0
    }

    /// Statuses that mean "the call needs a larger buffer, retry"
    pub fn needs_larger_buffer(self) -> bool {
        matches!(
            self,
            NtStatus::INFO_LENGTH_MISMATCH | NtStatus::BUFFER_TOO_SMALL | NtStatus::BUFFER_OVERFLOW
        )
    }

    pub fn raw(self) -> i32 {
        self.0
    }

    /// Classify into the outcomes the adapter loop cares about
    pub fn kind(self) -> StatusKind {
        match self {
            s if s.needs_larger_buffer() => StatusKind::NeedsLargerBuffer,
            s if s.is_success() => StatusKind::Success,
            NtStatus::ACCESS_DENIED => StatusKind::AccessDenied,
            NtStatus::INVALID_INFO_CLASS => StatusKind::InvalidInfoClass,
            s => StatusKind::Unrecognized(s.0 as u32),
        }
    }
}

impl fmt::Display for NtStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match *self {
            NtStatus::SUCCESS => "STATUS_SUCCESS",
            NtStatus::BUFFER_OVERFLOW => "STATUS_BUFFER_OVERFLOW",
            NtStatus::INVALID_INFO_CLASS => "STATUS_INVALID_INFO_CLASS",
            NtStatus::INFO_LENGTH_MISMATCH => "STATUS_INFO_LENGTH_MISMATCH",
            NtStatus::ACCESS_DENIED => "STATUS_ACCESS_DENIED",
            NtStatus::BUFFER_TOO_SMALL => "STATUS_BUFFER_TOO_SMALL",
            _ => return write!(f, "0x{:08X}", self.0 as u32),
        };
        write!(f, "{} (0x{:08X})", name, self.0 as u32)
    }
}

/// Adapter-level classification of an NTSTATUS
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Success,
    NeedsLargerBuffer,
    AccessDenied,
    InvalidInfoClass,
    /// Any other failure status, preserved rather than dropped
    Unrecognized(u32),
}
