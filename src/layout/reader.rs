//! Bounds-checked binary layout reader
//!
//! Native information classes come back as opaque byte regions with a fixed
//! binary layout (header plus fixed-size entries, or header plus
//! variable-length entries padded to the platform pointer width). All
//! decoders walk those regions through `BufferView` instead of
//! reinterpreting raw memory, so every read is checked against the length
//! the native layer reported as used.

use crate::core::types::{QueryError, QueryResult};

/// Pointer width of the layout being decoded
///
/// Carried explicitly so decoders stay portable: a 32-bit capture can be
/// decoded by a 64-bit process and vice versa.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerWidth {
    Four,
    Eight,
}

impl PointerWidth {
    /// Width of the platform this process runs on
    pub fn native() -> Self {
        if std::mem::size_of::<usize>() == 8 {
            PointerWidth::Eight
        } else {
            PointerWidth::Four
        }
    }

    pub fn bytes(self) -> usize {
        match self {
            PointerWidth::Four => 4,
            PointerWidth::Eight => 8,
        }
    }

    /// Round `offset` up to the next multiple of this width
    pub fn align_up(self, offset: usize) -> usize {
        let width = self.bytes();
        (offset + width - 1) & !(width - 1)
    }
}

/// Read-only view over the used portion of a query buffer
#[derive(Debug, Clone, Copy)]
pub struct BufferView<'a> {
    data: &'a [u8],
}

impl<'a> BufferView<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        BufferView { data }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Checked sub-slice of `len` bytes starting at `offset`
    pub fn bytes(&self, offset: usize, len: usize) -> QueryResult<&'a [u8]> {
        match offset.checked_add(len) {
            Some(end) if end <= self.data.len() => Ok(&self.data[offset..end]),
            _ => Err(QueryError::OutOfBounds {
                offset,
                needed: len,
                available: self.data.len(),
            }),
        }
    }

    pub fn read_u8(&self, offset: usize) -> QueryResult<u8> {
        Ok(self.bytes(offset, 1)?[0])
    }

    pub fn read_u16(&self, offset: usize) -> QueryResult<u16> {
        let b = self.bytes(offset, 2)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    pub fn read_u32(&self, offset: usize) -> QueryResult<u32> {
        let b = self.bytes(offset, 4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    pub fn read_i32(&self, offset: usize) -> QueryResult<i32> {
        Ok(self.read_u32(offset)? as i32)
    }

    pub fn read_u64(&self, offset: usize) -> QueryResult<u64> {
        let b = self.bytes(offset, 8)?;
        Ok(u64::from_le_bytes([
            b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7],
        ]))
    }

    pub fn read_i64(&self, offset: usize) -> QueryResult<i64> {
        Ok(self.read_u64(offset)? as i64)
    }

    /// Pointer-sized field, widened to u64 regardless of layout width
    pub fn read_ptr(&self, offset: usize, width: PointerWidth) -> QueryResult<u64> {
        match width {
            PointerWidth::Four => Ok(self.read_u32(offset)? as u64),
            PointerWidth::Eight => self.read_u64(offset),
        }
    }

    /// UTF-16LE string of `byte_len` bytes starting at `offset`
    pub fn read_utf16(&self, offset: usize, byte_len: usize) -> QueryResult<String> {
        if byte_len % 2 != 0 {
            return Err(QueryError::malformed(
                "UTF-16 field",
                format!("odd byte length {} at offset {}", byte_len, offset),
            ));
        }
        let raw = self.bytes(offset, byte_len)?;
        let units: Vec<u16> = raw
            .chunks_exact(2)
            .map(|c| u16::from_le_bytes([c[0], c[1]]))
            .collect();
        Ok(String::from_utf16_lossy(&units))
    }
}
