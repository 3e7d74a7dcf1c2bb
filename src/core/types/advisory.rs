//! Advisory warnings for non-fatal enrichment lookups
//!
//! Enrichment lookups (SID to account name, descriptor string conversion)
//! never abort the enumeration that triggered them. Failures are recorded
//! as advisories and left out of the primary records.

use super::codes::Win32Code;
use serde::Serialize;
use std::fmt;

/// A non-fatal lookup failure attached to an enumeration result
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Advisory {
    /// Name of the operation that failed (e.g. "LookupAccountSid")
    pub operation: &'static str,
    /// Numeric native error code
    pub code: u32,
    /// Human-readable rendition of the code
    pub message: String,
}

impl Advisory {
    pub fn new(operation: &'static str, code: Win32Code) -> Self {
        Advisory {
            operation,
            code: code.raw(),
            message: code.to_string(),
        }
    }
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failed ({}): {}", self.operation, self.code, self.message)
    }
}
