//! Kernel object-type enumeration decoding
//!
//! The buffer behind ObjectTypesInformation is a linked-stride walk: a
//! 4-byte total count, then one entry per registered type whose start
//! offset depends on the previous entry's declared name length, padded to
//! the pointer width. A running offset is mandatory; there is no constant
//! stride to multiply by.

use crate::core::types::{QueryError, QueryResult};
use crate::layout::{BufferView, PointerWidth};
use serde::Serialize;
use std::collections::HashMap;

/// Indices below this value are reserved by the object manager
const FIRST_TYPE_INDEX: u16 = 2;

/// Fixed header preceding each type's name characters:
/// UNICODE_STRING, 13 counters, GENERIC_MAPPING, valid-access mask,
/// two flag bytes, the type index, a reserved byte, and three pool fields.
fn entry_header_size(width: PointerWidth) -> usize {
    let unicode_string = 2 * width.bytes();
    unicode_string + 13 * 4 + 16 + 4 + 4 + 12
}

/// One registered kernel object type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObjectTypeInfo {
    pub index: u16,
    pub name: String,
    pub total_objects: u32,
    pub total_handles: u32,
}

/// Decoded object-type enumeration, indexable by the type index that
/// handle entries carry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ObjectTypeTable {
    entries: Vec<ObjectTypeInfo>,
    by_index: HashMap<u16, usize>,
}

impl ObjectTypeTable {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: u16) -> Option<&ObjectTypeInfo> {
        self.by_index.get(&index).map(|&i| &self.entries[i])
    }

    pub fn name_of(&self, index: u16) -> Option<&str> {
        self.get(index).map(|info| info.name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &ObjectTypeInfo> {
        self.entries.iter()
    }

    fn insert(&mut self, info: ObjectTypeInfo) {
        self.by_index.insert(info.index, self.entries.len());
        self.entries.push(info);
    }
}

/// Decode an ObjectTypesInformation buffer
pub fn decode_object_types(
    view: &BufferView<'_>,
    width: PointerWidth,
) -> QueryResult<ObjectTypeTable> {
    let count = view.read_u32(0)? as usize;
    let mut table = ObjectTypeTable::default();
    if count == 0 {
        return Ok(table);
    }

    let header_size = entry_header_size(width);
    let unicode_string = 2 * width.bytes();
    // First entry starts after the count, padded up to the pointer width
    let mut offset = width.align_up(4);

    for position in 0..count {
        let name_length = view.read_u16(offset)? as usize;
        let name_maximum = view.read_u16(offset + 2)? as usize;
        if name_maximum < name_length {
            return Err(QueryError::malformed(
                "OBJECT_TYPES_INFORMATION",
                format!(
                    "entry {} declares name length {} over maximum {}",
                    position, name_length, name_maximum
                ),
            ));
        }

        let total_objects = view.read_u32(offset + unicode_string)?;
        let total_handles = view.read_u32(offset + unicode_string + 4)?;
        // TypeIndex byte sits after the counters, the generic mapping,
        // the valid-access mask, and two boolean flags
        let raw_index = view.read_u8(offset + unicode_string + 13 * 4 + 16 + 4 + 2)?;
        let index = if raw_index != 0 {
            raw_index as u16
        } else {
            // Older kit layouts leave the field zero; indices then follow
            // enumeration order past the reserved slots
            position as u16 + FIRST_TYPE_INDEX
        };

        // Name characters follow the fixed header directly
        let name = view.read_utf16(offset + header_size, name_length)?;

        table.insert(ObjectTypeInfo {
            index,
            name,
            total_objects,
            total_handles,
        });

        // Next entry: header plus the name's reserved capacity, padded up
        offset = width.align_up(offset + header_size + name_maximum);
    }

    Ok(table)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Serialize a synthetic ObjectTypesInformation buffer
    pub(crate) fn build_types_buffer(
        width: PointerWidth,
        types: &[(u16, &str, u32, u32)],
    ) -> Vec<u8> {
        let header_size = entry_header_size(width);
        let unicode_string = 2 * width.bytes();
        let mut buf = (types.len() as u32).to_le_bytes().to_vec();
        buf.resize(width.align_up(4), 0);

        for (index, name, objects, handles) in types {
            let name_bytes: Vec<u8> = name
                .encode_utf16()
                .flat_map(|u| u.to_le_bytes())
                .collect();
            let name_maximum = name_bytes.len() + 2; // room for the terminator

            let start = buf.len();
            buf.resize(start + header_size, 0);
            buf[start..start + 2].copy_from_slice(&(name_bytes.len() as u16).to_le_bytes());
            buf[start + 2..start + 4].copy_from_slice(&(name_maximum as u16).to_le_bytes());
            let counters = start + unicode_string;
            buf[counters..counters + 4].copy_from_slice(&objects.to_le_bytes());
            buf[counters + 4..counters + 8].copy_from_slice(&handles.to_le_bytes());
            buf[counters + 13 * 4 + 16 + 4 + 2] = *index as u8;

            buf.extend_from_slice(&name_bytes);
            buf.extend_from_slice(&[0, 0]);
            let padded = width.align_up(buf.len());
            buf.resize(padded, 0);
        }
        buf
    }

    #[test]
    fn test_linked_stride_walk() {
        let types = [
            (5u16, "Token", 120, 300),
            (7, "Process", 90, 450),
            (30, "File", 4000, 9000),
        ];
        for width in [PointerWidth::Four, PointerWidth::Eight] {
            let buf = build_types_buffer(width, &types);
            let table = decode_object_types(&BufferView::new(&buf), width).unwrap();
            assert_eq!(table.len(), 3);
            assert_eq!(table.name_of(5), Some("Token"));
            assert_eq!(table.name_of(7), Some("Process"));
            assert_eq!(table.name_of(30), Some("File"));
            assert_eq!(table.get(30).unwrap().total_handles, 9000);
            assert_eq!(table.name_of(99), None);
        }
    }

    #[test]
    fn test_zero_types_is_empty_not_error() {
        let buf = build_types_buffer(PointerWidth::Eight, &[]);
        let table = decode_object_types(&BufferView::new(&buf), PointerWidth::Eight).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_zero_index_falls_back_to_position() {
        let buf = build_types_buffer(PointerWidth::Eight, &[(0, "Directory", 1, 2)]);
        let table = decode_object_types(&BufferView::new(&buf), PointerWidth::Eight).unwrap();
        assert_eq!(table.name_of(FIRST_TYPE_INDEX), Some("Directory"));
    }

    #[test]
    fn test_truncated_buffer_rejected() {
        let mut buf = build_types_buffer(PointerWidth::Eight, &[(5, "Token", 1, 1)]);
        buf.truncate(buf.len() - 8);
        assert!(decode_object_types(&BufferView::new(&buf), PointerWidth::Eight).is_err());
    }

    #[test]
    fn test_count_larger_than_buffer_rejected() {
        let mut buf = build_types_buffer(PointerWidth::Eight, &[(5, "Token", 1, 1)]);
        buf[0] = 4; // announce more entries than present
        assert!(decode_object_types(&BufferView::new(&buf), PointerWidth::Eight).is_err());
    }

    #[test]
    fn test_inconsistent_name_lengths_rejected() {
        let mut buf = build_types_buffer(PointerWidth::Eight, &[(5, "Token", 1, 1)]);
        // name_length > name_maximum
        let offset = PointerWidth::Eight.align_up(4);
        buf[offset] = 0xFF;
        buf[offset + 1] = 0xFF;
        assert!(decode_object_types(&BufferView::new(&buf), PointerWidth::Eight).is_err());
    }
}
