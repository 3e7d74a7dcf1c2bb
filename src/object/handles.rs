//! Extended handle-table decoding and filtering
//!
//! SystemExtendedHandleInformation returns a pointer-width count, one
//! reserved pointer-width field, then fixed-size entries. Each entry
//! carries an object-type index that only the object-type enumeration can
//! resolve, so the type table is passed in explicitly.

use super::types::ObjectTypeTable;
use crate::core::types::{QueryError, QueryResult};
use crate::layout::{BufferView, PointerWidth};
use serde::Serialize;

/// Handle attribute bit marking an inheritable handle
pub const HANDLE_ATTRIBUTE_INHERIT: u32 = 0x2;

/// One entry from the system handle table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HandleRecord {
    pub pid: u32,
    pub handle_value: u64,
    pub object_address: u64,
    pub granted_access: u32,
    pub type_index: u16,
    /// Resolved from the object-type table; None when the index is not in
    /// the table the caller supplied
    pub type_name: Option<String>,
    pub attributes: u32,
}

impl HandleRecord {
    pub fn is_inherited(&self) -> bool {
        self.attributes & HANDLE_ATTRIBUTE_INHERIT != 0
    }
}

/// Post-decode handle filter; zero fields mean "no filter"
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HandleFilter {
    /// Owning process id to match exactly; 0 matches every process
    pub pid: u32,
    /// Object-type index to match exactly; 0 matches every type
    pub type_index: u16,
    /// Keep only handles with the inherit attribute bit set
    pub inherited_only: bool,
}

impl HandleFilter {
    pub fn matches(&self, record: &HandleRecord) -> bool {
        if self.pid != 0 && record.pid != self.pid {
            return false;
        }
        if self.type_index != 0 && record.type_index != self.type_index {
            return false;
        }
        if self.inherited_only && !record.is_inherited() {
            return false;
        }
        true
    }
}

fn entry_size(width: PointerWidth) -> usize {
    // object, pid, handle (pointer-sized), then access, back-trace index,
    // type index, attributes, reserved
    3 * width.bytes() + 16
}

/// Decode a SystemExtendedHandleInformation buffer.
///
/// `types` resolves each entry's type index to a name; handle enumeration
/// therefore composes with a prior object-type enumeration.
pub fn decode_extended_handles(
    view: &BufferView<'_>,
    width: PointerWidth,
    types: &ObjectTypeTable,
) -> QueryResult<Vec<HandleRecord>> {
    let count = view.read_ptr(0, width)? as usize;
    // One reserved pointer-width field sits between the count and the array
    let array_start = 2 * width.bytes();
    let stride = entry_size(width);

    // The count field is untrusted input; verify the announced array fits
    // inside the buffer before any allocation sized from it
    count
        .checked_mul(stride)
        .and_then(|len| len.checked_add(array_start))
        .filter(|&end| end <= view.len())
        .ok_or_else(|| {
            QueryError::malformed(
                "SYSTEM_HANDLE_INFORMATION_EX",
                format!("announced count {count} exceeds buffer of {} bytes", view.len()),
            )
        })?;

    let mut records = Vec::with_capacity(count);
    for i in 0..count {
        let offset = array_start + i * stride;
        let object_address = view.read_ptr(offset, width)?;
        let pid = view.read_ptr(offset + width.bytes(), width)? as u32;
        let handle_value = view.read_ptr(offset + 2 * width.bytes(), width)?;
        let fixed = offset + 3 * width.bytes();
        let granted_access = view.read_u32(fixed)?;
        let type_index = view.read_u16(fixed + 6)?;
        let attributes = view.read_u32(fixed + 8)?;

        records.push(HandleRecord {
            pid,
            handle_value,
            object_address,
            granted_access,
            type_index,
            type_name: types.name_of(type_index).map(String::from),
            attributes,
        });
    }
    Ok(records)
}

/// Apply a filter after decode; a filter that matches nothing yields an
/// empty sequence, not an error
pub fn filter_handles(records: Vec<HandleRecord>, filter: &HandleFilter) -> Vec<HandleRecord> {
    records
        .into_iter()
        .filter(|record| filter.matches(record))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::types::decode_object_types;
    use pretty_assertions::assert_eq;

    /// Serialize a synthetic extended handle buffer
    pub(crate) fn build_handles_buffer(
        width: PointerWidth,
        entries: &[(u32, u64, u16, u32, u32)],
    ) -> Vec<u8> {
        let mut buf = Vec::new();
        let push_ptr = |buf: &mut Vec<u8>, value: u64| match width {
            PointerWidth::Four => buf.extend_from_slice(&(value as u32).to_le_bytes()),
            PointerWidth::Eight => buf.extend_from_slice(&value.to_le_bytes()),
        };
        push_ptr(&mut buf, entries.len() as u64);
        push_ptr(&mut buf, 0); // reserved
        for (pid, handle, type_index, access, attributes) in entries {
            push_ptr(&mut buf, 0xFFFF_8000_0000_1000); // object address
            push_ptr(&mut buf, *pid as u64);
            push_ptr(&mut buf, *handle);
            buf.extend_from_slice(&access.to_le_bytes());
            buf.extend_from_slice(&0u16.to_le_bytes()); // back-trace index
            buf.extend_from_slice(&type_index.to_le_bytes());
            buf.extend_from_slice(&attributes.to_le_bytes());
            buf.extend_from_slice(&0u32.to_le_bytes()); // reserved
        }
        buf
    }

    fn token_and_file_table() -> ObjectTypeTable {
        let buf = super::super::types::tests::build_types_buffer(
            PointerWidth::Eight,
            &[(5, "Token", 1, 1), (30, "File", 1, 1)],
        );
        decode_object_types(&BufferView::new(&buf), PointerWidth::Eight).unwrap()
    }

    #[test]
    fn test_fixed_stride_walk_resolves_types() {
        let types = token_and_file_table();
        for width in [PointerWidth::Four, PointerWidth::Eight] {
            let buf = build_handles_buffer(
                width,
                &[
                    (4321, 0x1c, 5, 0x000F_01FF, 0),
                    (4321, 0x20, 30, 0x0012_0089, HANDLE_ATTRIBUTE_INHERIT),
                    (8888, 0x24, 99, 0x0010_0000, 0),
                ],
            );
            let records =
                decode_extended_handles(&BufferView::new(&buf), width, &types).unwrap();
            assert_eq!(records.len(), 3);
            assert_eq!(records[0].type_name.as_deref(), Some("Token"));
            assert_eq!(records[1].type_name.as_deref(), Some("File"));
            assert!(records[1].is_inherited());
            // Unknown index is preserved, not dropped
            assert_eq!(records[2].type_index, 99);
            assert_eq!(records[2].type_name, None);
        }
    }

    #[test]
    fn test_zero_handles_is_empty_not_error() {
        let buf = build_handles_buffer(PointerWidth::Eight, &[]);
        let records = decode_extended_handles(
            &BufferView::new(&buf),
            PointerWidth::Eight,
            &ObjectTypeTable::default(),
        )
        .unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_announced_count_checked_against_length() {
        let mut buf = build_handles_buffer(PointerWidth::Eight, &[(1, 0x4, 5, 0, 0)]);
        buf[0] = 3; // announce three entries, provide one
        assert!(decode_extended_handles(
            &BufferView::new(&buf),
            PointerWidth::Eight,
            &ObjectTypeTable::default(),
        )
        .is_err());
    }

    #[test]
    fn test_hostile_count_is_malformed_not_panic() {
        let mut buf = vec![0u8; 16];
        buf[0..8].copy_from_slice(&u64::MAX.to_le_bytes());
        let err = decode_extended_handles(
            &BufferView::new(&buf),
            PointerWidth::Eight,
            &ObjectTypeTable::default(),
        )
        .unwrap_err();
        assert!(matches!(err, QueryError::Malformed { .. }));
    }

    #[test]
    fn test_filter_by_pid() {
        let types = token_and_file_table();
        let buf = build_handles_buffer(
            PointerWidth::Eight,
            &[(100, 0x4, 5, 0, 0), (200, 0x8, 5, 0, 0), (100, 0xc, 30, 0, 0)],
        );
        let records =
            decode_extended_handles(&BufferView::new(&buf), PointerWidth::Eight, &types).unwrap();

        let filter = HandleFilter {
            pid: 100,
            ..Default::default()
        };
        let matched = filter_handles(records.clone(), &filter);
        assert_eq!(matched.len(), 2);
        assert!(matched.iter().all(|r| r.pid == 100));

        // A pid that matches nothing yields an empty sequence
        let filter = HandleFilter {
            pid: 31337,
            ..Default::default()
        };
        assert!(filter_handles(records, &filter).is_empty());
    }

    #[test]
    fn test_filter_combinations() {
        let record = HandleRecord {
            pid: 100,
            handle_value: 0x4,
            object_address: 0,
            granted_access: 0,
            type_index: 5,
            type_name: Some("Token".to_string()),
            attributes: HANDLE_ATTRIBUTE_INHERIT,
        };
        assert!(HandleFilter::default().matches(&record));
        assert!(HandleFilter {
            pid: 100,
            type_index: 5,
            inherited_only: true,
        }
        .matches(&record));
        assert!(!HandleFilter {
            type_index: 30,
            ..Default::default()
        }
        .matches(&record));
        assert!(!HandleFilter {
            inherited_only: true,
            ..Default::default()
        }
        .matches(&HandleRecord {
            attributes: 0,
            ..record
        }));
    }
}
