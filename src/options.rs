//! Decoder configuration.
//!
//! LZMA streams carry no self-describing parameters at this level: the
//! literal context bits, position bits and dictionary size have to be
//! supplied by whoever knows how the stream was produced.

use crate::error::{LzmaError, Result};

/// Largest `pb` and `lp`.
pub const MAX_POS_BITS: u32 = 4;

/// Largest `lc`.
pub const MAX_LITERAL_CONTEXT_BITS: u32 = 8;

/// Largest `lc + lp`.
pub const MAX_LITERAL_BITS: u32 = 4;

/// Default dictionary size (8 MiB).
pub const DEFAULT_DICT_SIZE: u32 = 1 << 23;

/// Default ceiling on produced bytes (256 MiB).
pub const DEFAULT_OUTPUT_LIMIT: usize = 1 << 28;

/// What to do when normalization needs a byte past the end of the input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TruncationPolicy {
    /// Shift in zero bytes and keep going. A truncated stream decodes to
    /// deterministic but meaningless bytes past the cut.
    #[default]
    ZeroFill,
    /// Fail with [`DecompressError::TruncatedStream`].
    ///
    /// [`DecompressError::TruncatedStream`]: crate::DecompressError::TruncatedStream
    Error,
}

/// Session parameters for an LZMA decoder.
///
/// # Example
///
/// ```rust
/// use lzma_stream::{DecoderOptions, TruncationPolicy};
///
/// let opts = DecoderOptions::default()
///     .with_literal_bits(0, 2)
///     .with_pos_bits(2)
///     .with_dict_size(1 << 16)
///     .with_truncation(TruncationPolicy::Error);
/// assert!(opts.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecoderOptions {
    /// Literal context bits: high bits of the previous byte (0-8)
    pub lc: u32,
    /// Literal position bits (0-4)
    pub lp: u32,
    /// Position bits for match/length contexts (0-4)
    pub pb: u32,
    /// Largest distance a match may reach back
    pub dict_size: u32,
    /// Most bytes a single decode will produce
    pub output_limit: usize,
    /// Behaviour on input underrun
    pub truncation: TruncationPolicy,
}

impl Default for DecoderOptions {
    fn default() -> Self {
        Self {
            lc: 3,
            lp: 0,
            pb: 2,
            dict_size: DEFAULT_DICT_SIZE,
            output_limit: DEFAULT_OUTPUT_LIMIT,
            truncation: TruncationPolicy::ZeroFill,
        }
    }
}

impl DecoderOptions {
    pub fn with_literal_bits(mut self, lc: u32, lp: u32) -> Self {
        self.lc = lc;
        self.lp = lp;
        self
    }

    pub fn with_pos_bits(mut self, pb: u32) -> Self {
        self.pb = pb;
        self
    }

    pub fn with_dict_size(mut self, dict_size: u32) -> Self {
        self.dict_size = dict_size;
        self
    }

    pub fn with_output_limit(mut self, output_limit: usize) -> Self {
        self.output_limit = output_limit;
        self
    }

    pub fn with_truncation(mut self, truncation: TruncationPolicy) -> Self {
        self.truncation = truncation;
        self
    }

    /// Check every parameter; called once when a session is built.
    pub fn validate(&self) -> Result<()> {
        if self.lc > MAX_LITERAL_CONTEXT_BITS
            || self.lp > MAX_POS_BITS
            || self.lc + self.lp > MAX_LITERAL_BITS
        {
            return Err(LzmaError::InvalidLiteralBits {
                lc: self.lc,
                lp: self.lp,
            });
        }
        if self.pb > MAX_POS_BITS {
            return Err(LzmaError::InvalidPositionBits(self.pb));
        }
        if self.dict_size == 0 {
            return Err(LzmaError::InvalidDictionarySize);
        }
        if self.output_limit == 0 {
            return Err(LzmaError::InvalidOutputLimit);
        }
        Ok(())
    }

    /// Mask applied to the output position to get `pos_state`.
    pub fn pos_state_mask(&self) -> usize {
        (1 << self.pb) - 1
    }

    /// Mask applied to the output position for literal coder selection.
    pub fn literal_pos_mask(&self) -> usize {
        (1 << self.lp) - 1
    }

    pub fn is_strict(&self) -> bool {
        self.truncation == TruncationPolicy::Error
    }
}
