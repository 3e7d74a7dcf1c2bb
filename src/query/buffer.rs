//! Owned byte buffer for variable-length query output

use crate::layout::BufferView;

/// Contiguous byte region owned by a single query call.
///
/// Capacity only grows; `used` tracks the length the native layer reported
/// as actually written. The region is released when the buffer drops, on
/// every exit path, and a grow discards prior content because the retried
/// call rewrites the buffer in full.
#[derive(Debug)]
pub struct GrowableBuffer {
    data: Vec<u8>,
    used: usize,
}

impl GrowableBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        GrowableBuffer {
            data: vec![0u8; capacity],
            used: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Bytes the last successful call actually wrote
    pub fn used(&self) -> usize {
        self.used
    }

    /// Reallocate to `capacity` bytes, zeroed; prior content is discarded
    pub fn grow_to(&mut self, capacity: usize) {
        debug_assert!(capacity > self.data.len());
        self.data = vec![0u8; capacity];
        self.used = 0;
    }

    /// Record the used length reported by the native layer, clamped to
    /// capacity. A zero report on success means the class does not report
    /// lengths; the whole region is then considered used.
    pub fn set_used(&mut self, reported: usize) {
        self.used = if reported == 0 {
            self.data.len()
        } else {
            reported.min(self.data.len())
        };
    }

    /// Address the native layer saw, for translating embedded pointers
    pub fn base_address(&self) -> u64 {
        self.data.as_ptr() as u64
    }

    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// View restricted to the used length; decoders cannot read past it
    pub fn view(&self) -> BufferView<'_> {
        BufferView::new(&self.data[..self.used])
    }
}
