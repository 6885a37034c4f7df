use std::fs;
use std::path::Path;

use memchr::memmem;

use crate::error::{CarveError, CarveResult};

/// Immutable view over the raw bytes of a flash dump.
///
/// All searches and slices are zero-copy; the buffer is loaded once and never
/// mutated for the remainder of a decomposition run.
#[derive(Debug)]
pub struct ImageBuffer {
    data: Vec<u8>,
}

impl ImageBuffer {
    /// Wrap an in-memory byte buffer.
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    /// Read a dump file from disk.
    pub fn load(path: &Path) -> CarveResult<Self> {
        Ok(Self::new(fs::read(path)?))
    }

    /// Total image length in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The full underlying byte buffer.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Forward literal substring search bounded by `[from, to)`.
    ///
    /// The window is clamped to the buffer; an empty pattern never matches.
    /// Returns the absolute offset of the first occurrence.
    pub fn find(&self, pattern: &[u8], from: usize, to: usize) -> Option<usize> {
        let from = from.min(self.data.len());
        let to = to.min(self.data.len());
        if pattern.is_empty() || from >= to {
            return None;
        }
        memmem::find(&self.data[from..to], pattern).map(|pos| from + pos)
    }

    /// Find the `n`-th occurrence (0-indexed) of `pattern`, scanning forward
    /// from the start of the image and advancing past each prior hit.
    pub fn find_nth(&self, pattern: &[u8], n: usize) -> Option<usize> {
        let mut cursor = 0;
        let mut hit = None;
        for _ in 0..=n {
            match self.find(pattern, cursor, self.data.len()) {
                Some(offset) => {
                    hit = Some(offset);
                    cursor = offset + pattern.len();
                }
                None => return None,
            }
        }
        hit
    }

    /// Bounds-checked subslice `[start, end)`.
    pub fn slice(&self, start: usize, end: usize) -> CarveResult<&[u8]> {
        if end > self.data.len() || start > end {
            return Err(CarveError::OutOfRange { start, end, len: self.data.len() });
        }
        Ok(&self.data[start..end])
    }

    /// Read a big-endian u16 at `offset` (DER length fields).
    pub fn read_u16_be(&self, offset: usize) -> CarveResult<u16> {
        let bytes = self.slice(offset, offset + 2)?;
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    /// Read a little-endian u32 at `offset` (http table length fields).
    pub fn read_u32_le(&self, offset: usize) -> CarveResult<u32> {
        let bytes = self.slice(offset, offset + 4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }
}
