//! Output dictionary.
//!
//! The decoded bytes double as the match source: a back-reference copies
//! from bytes already produced, which may include bytes written by the same
//! copy when the distance is shorter than the length.

use super::{DecompressError, Result};

/// Append-only output buffer used as the LZ dictionary.
pub struct OutputDictionary {
    buf: Vec<u8>,
    /// Largest distance a match may reach back
    dict_size: u32,
}

impl OutputDictionary {
    /// Create an empty dictionary, reserving room for `capacity` bytes.
    pub fn new(dict_size: u32, capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
            dict_size,
        }
    }

    /// Drop the contents but keep the allocation.
    #[inline]
    pub fn reset(&mut self) {
        self.buf.clear();
    }

    /// Number of bytes produced so far.
    #[inline]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn reserve(&mut self, additional: usize) {
        self.buf.reserve(additional);
    }

    /// Append a literal byte.
    #[inline]
    pub fn push(&mut self, byte: u8) {
        self.buf.push(byte);
    }

    /// Most recent byte, or 0 for an empty dictionary.
    #[inline]
    pub fn last_byte(&self) -> u8 {
        self.buf.last().copied().unwrap_or(0)
    }

    /// Byte `distance` positions back from the end (1 is the last byte).
    #[inline]
    pub fn byte_at_distance(&self, distance: u32) -> Result<u8> {
        self.check_distance(distance)?;
        Ok(self.buf[self.buf.len() - distance as usize])
    }

    #[inline]
    fn check_distance(&self, distance: u32) -> Result<()> {
        if distance == 0 || distance as usize > self.buf.len() || distance > self.dict_size {
            return Err(DecompressError::InvalidDistance {
                distance,
                position: self.buf.len(),
            });
        }
        Ok(())
    }

    /// Copy `length` bytes starting `distance` bytes back.
    ///
    /// Overlapping copies (`distance < length`) repeat the last `distance`
    /// bytes, so they go through a byte-at-a-time loop.
    #[inline]
    pub fn copy_match(&mut self, distance: u32, length: usize) -> Result<()> {
        self.check_distance(distance)?;

        let dist = distance as usize;
        let start = self.buf.len() - dist;

        if dist >= length {
            self.buf.extend_from_within(start..start + length);
            return Ok(());
        }

        self.buf.reserve(length);
        for i in 0..length {
            let byte = self.buf[start + i];
            self.buf.push(byte);
        }
        Ok(())
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    /// Bytes produced at or after `start`.
    pub fn tail(&self, start: usize) -> &[u8] {
        self.buf.get(start..).unwrap_or(&[])
    }

    /// Move the output out, leaving the dictionary empty.
    pub fn take(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.buf)
    }
}
