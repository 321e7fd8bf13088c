//! Adaptive bit and bit-tree decoding.
//!
//! Every modelled bit of an LZMA stream goes through [`RangeDecoder::decode_bit`],
//! the only place where the coding interval is split by a probability. Trees
//! decode a multi-bit symbol one bit at a time, each node addressing its own
//! probability slot.

use super::range_coder::RangeDecoder;

/// Bits of precision in a probability.
pub const BIT_MODEL_TOTAL_BITS: u32 = 11;

/// Probability scale (0x800 represents certainty).
pub const BIT_MODEL_TOTAL: u16 = 1 << BIT_MODEL_TOTAL_BITS;

/// Initial probability of a zero bit: one half.
pub const PROB_INIT: u16 = BIT_MODEL_TOTAL / 2;

/// Adaptation speed of the moving average.
pub const MOVE_BITS: u32 = 5;

/// Move `prob` towards zero being more likely.
#[inline(always)]
pub fn update_zero(prob: &mut u16) {
    *prob += (BIT_MODEL_TOTAL - *prob) >> MOVE_BITS;
}

/// Move `prob` towards one being more likely.
#[inline(always)]
pub fn update_one(prob: &mut u16) {
    *prob -= *prob >> MOVE_BITS;
}

impl RangeDecoder<'_> {
    /// Decode one bit against `prob` and adapt it.
    #[inline]
    pub fn decode_bit(&mut self, prob: &mut u16) -> u32 {
        let bound = (self.range >> BIT_MODEL_TOTAL_BITS) * u32::from(*prob);
        let bit = if self.code < bound {
            self.range = bound;
            update_zero(prob);
            0
        } else {
            self.code -= bound;
            self.range -= bound;
            update_one(prob);
            1
        };
        self.normalize();
        bit
    }

    /// Decode a `num_bits` symbol, most significant bit first.
    ///
    /// `probs` must hold `1 << num_bits` slots; slot 0 is unused.
    #[inline]
    pub fn decode_tree(&mut self, probs: &mut [u16], num_bits: u32) -> u32 {
        debug_assert!(probs.len() >= 1 << num_bits);
        let mut symbol = 1usize;
        for _ in 0..num_bits {
            symbol = (symbol << 1) | self.decode_bit(&mut probs[symbol]) as usize;
        }
        (symbol - (1 << num_bits)) as u32
    }

    /// Decode a `num_bits` symbol, least significant bit first.
    ///
    /// The tree walk is the same as [`decode_tree`](Self::decode_tree); only
    /// the assembly of the result is mirrored.
    #[inline]
    pub fn decode_reverse_tree(&mut self, probs: &mut [u16], num_bits: u32) -> u32 {
        debug_assert!(probs.len() >= 1 << num_bits);
        let mut index = 1usize;
        let mut symbol = 0u32;
        for i in 0..num_bits {
            let bit = self.decode_bit(&mut probs[index]);
            index = (index << 1) | bit as usize;
            symbol |= bit << i;
        }
        symbol
    }
}
