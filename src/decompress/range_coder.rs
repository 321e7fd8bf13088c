//! Range decoder for LZMA streams.
//!
//! Holds the `(range, code)` pair and a read cursor into the compressed
//! input. The first byte of a stream is a lead byte (zero in well-formed
//! streams); the next four seed `code`.
//!
//! Normalization runs after every decoded bit: while `range` is below
//! [`TOP`], both registers are shifted left by one byte and the next input
//! byte enters `code`. Past the end of the input the byte is zero and the
//! underrun is counted, so callers can decide whether a truncated stream is
//! an error.

/// Normalization threshold (2^24).
pub const TOP: u32 = 1 << 24;

/// Bytes consumed by [`RangeDecoder::new`].
pub const INIT_BYTES: usize = 5;

/// Snapshot of the coder registers, used to resume decoding over a new
/// input buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeState {
    pub range: u32,
    pub code: u32,
}

/// Range decoder over a borrowed input slice.
pub struct RangeDecoder<'a> {
    input: &'a [u8],
    pos: usize,
    pub(super) range: u32,
    pub(super) code: u32,
    /// Lead byte of the stream (0 for well-formed input)
    lead_byte: u8,
    /// Bytes substituted with zero after the input ran out
    zero_filled: usize,
}

impl<'a> RangeDecoder<'a> {
    /// Initialize from the first five bytes of `input`.
    ///
    /// Missing bytes are zero-filled and counted in [`zero_filled`].
    ///
    /// [`zero_filled`]: RangeDecoder::zero_filled
    pub fn new(input: &'a [u8]) -> Self {
        let mut rc = Self {
            input,
            pos: 0,
            range: 0xFFFF_FFFF,
            code: 0,
            lead_byte: 0,
            zero_filled: 0,
        };
        rc.lead_byte = rc.next_byte();
        for _ in 0..4 {
            rc.code = (rc.code << 8) | u32::from(rc.next_byte());
        }
        rc
    }

    /// Continue decoding with previously saved registers over `input`.
    pub fn resume(input: &'a [u8], state: RangeState) -> Self {
        Self {
            input,
            pos: 0,
            range: state.range,
            code: state.code,
            lead_byte: 0,
            zero_filled: 0,
        }
    }

    /// Current register values.
    pub fn state(&self) -> RangeState {
        RangeState {
            range: self.range,
            code: self.code,
        }
    }

    /// Bytes of `input` consumed so far.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// The stream's lead byte (only meaningful after [`RangeDecoder::new`]).
    pub fn lead_byte(&self) -> u8 {
        self.lead_byte
    }

    /// Number of zero bytes substituted past the end of the input.
    pub fn zero_filled(&self) -> usize {
        self.zero_filled
    }

    /// Remaining unread input bytes.
    pub fn remaining(&self) -> usize {
        self.input.len() - self.pos
    }

    #[inline]
    fn next_byte(&mut self) -> u8 {
        match self.input.get(self.pos) {
            Some(&b) => {
                self.pos += 1;
                b
            }
            None => {
                self.zero_filled += 1;
                0
            }
        }
    }

    /// Keep `range` at or above [`TOP`].
    #[inline]
    pub fn normalize(&mut self) {
        while self.range < TOP {
            self.range <<= 8;
            self.code = (self.code << 8) | u32::from(self.next_byte());
        }
    }

    /// Decode `count` bits with a fixed probability of one half, most
    /// significant bit first.
    #[inline]
    pub fn decode_direct_bits(&mut self, count: u32) -> u32 {
        let mut result = 0u32;
        for _ in 0..count {
            self.range >>= 1;
            let bit = u32::from(self.code >= self.range);
            self.code -= self.range & 0u32.wrapping_sub(bit);
            result = (result << 1) | bit;
            self.normalize();
        }
        result
    }
}
