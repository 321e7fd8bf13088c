//! LZMA decode state machine.
//!
//! Turns range-decoded bits into literals and matches:
//!
//! - `is_match = 0`: a literal, coded through a 256-leaf tree chosen by the
//!   previous byte and the output position. After a match the literal tree
//!   first follows the byte at `rep0` until a predicted bit is wrong.
//! - `is_match = 1, is_rep = 0`: a new match. Length, then a 6-bit distance
//!   slot and its extra bits; the distance is pushed onto the rep cache.
//! - `is_match = 1, is_rep = 1`: a repeat of one of the four cached
//!   distances, or a one-byte "short rep" of `rep0`.

use log::{debug, warn};

use super::model::{
    LenKind, ProbabilityModel, ALIGN_BITS, END_POS_MODEL_INDEX, LEN_HIGH_BITS, LEN_LOW_BITS,
    LEN_MID_BITS, LEN_TO_POS_STATES, POS_SLOT_BITS, START_POS_MODEL_INDEX,
};
use super::range_coder::RangeDecoder;
use super::state::{RepDistances, State};
use super::window::OutputDictionary;
use super::{DecompressError, Result};
use crate::options::DecoderOptions;

/// Shortest match length.
pub const MATCH_LEN_MIN: usize = 2;

/// Longest match length (2 + 8 + 8 + 256 - 1).
pub const MATCH_LEN_MAX: usize =
    MATCH_LEN_MIN + (1 << LEN_LOW_BITS) + (1 << LEN_MID_BITS) + (1 << LEN_HIGH_BITS) - 1;

/// Coded distance that marks the end of a stream.
const END_MARKER: u32 = 0xFFFF_FFFF;

/// Upper bound on the output buffer reserved up front.
const PREALLOC_MAX: usize = 1 << 24;

/// Outcome of decoding one symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Continue,
    EndMarker,
}

/// Why [`LzmaDecoder::run`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Progress {
    /// The target size was reached.
    Complete,
    /// An end marker was decoded.
    EndMarker,
    /// Fewer than the reserved number of input bytes are left.
    NeedInput,
}

/// LZMA decoder session.
///
/// Owns the probability table, the history state, the rep cache and the
/// output dictionary. Each call to [`decompress`](Self::decompress) starts a
/// fresh stream; the probability table is reused.
pub struct LzmaDecoder {
    options: DecoderOptions,
    model: ProbabilityModel,
    state: State,
    reps: RepDistances,
    dict: OutputDictionary,
    /// Zero-fill has already been reported for this stream
    zero_fill_warned: bool,
}

impl LzmaDecoder {
    /// Create a decoder, rejecting invalid options.
    pub fn new(options: DecoderOptions) -> crate::error::Result<Self> {
        options.validate()?;
        Ok(Self {
            model: ProbabilityModel::new(options.lc, options.lp),
            state: State::new(),
            reps: RepDistances::new(),
            dict: OutputDictionary::new(options.dict_size, 0),
            zero_fill_warned: false,
            options,
        })
    }

    /// Return to the start-of-stream state.
    pub fn reset(&mut self) {
        self.model.reset();
        self.state = State::new();
        self.reps = RepDistances::new();
        self.dict.reset();
        self.zero_fill_warned = false;
    }

    /// Decompress a complete stream.
    ///
    /// # Arguments
    /// * `input` - Compressed bytes, starting with the lead byte
    /// * `unpacked_size` - Bytes to produce; capped at the output limit
    pub fn decompress(&mut self, input: &[u8], unpacked_size: usize) -> Result<Vec<u8>> {
        self.reset();
        let target = self.target(unpacked_size);
        if target == 0 {
            return Ok(Vec::new());
        }
        debug!(
            "lzma: decoding {} input bytes to {} (lc={} lp={} pb={} dict={})",
            input.len(),
            target,
            self.options.lc,
            self.options.lp,
            self.options.pb,
            self.options.dict_size
        );

        self.dict.reserve(target.min(PREALLOC_MAX));
        let mut rc = RangeDecoder::new(input);
        self.check_start(&rc)?;

        let progress = self.run(&mut rc, target, 0)?;
        self.check_end(progress, target)?;

        debug!(
            "lzma: produced {} bytes from {} input bytes",
            self.dict.len(),
            rc.position()
        );
        Ok(self.dict.take())
    }

    /// Output size a stream of `unpacked_size` bytes will be decoded to.
    pub(super) fn target(&self, unpacked_size: usize) -> usize {
        unpacked_size.min(self.options.output_limit)
    }

    pub(super) fn dict(&self) -> &OutputDictionary {
        &self.dict
    }

    pub(super) fn take_output(&mut self) -> Vec<u8> {
        self.dict.take()
    }

    /// Validate what [`RangeDecoder::new`] read.
    pub(super) fn check_start(&mut self, rc: &RangeDecoder<'_>) -> Result<()> {
        if self.options.is_strict() && rc.lead_byte() != 0 {
            return Err(DecompressError::CorruptStream("non-zero lead byte"));
        }
        self.check_underrun(rc)
    }

    /// Apply the strict end-marker rule once decoding stopped.
    pub(super) fn check_end(&self, progress: Progress, target: usize) -> Result<()> {
        if progress == Progress::EndMarker {
            debug!("lzma: end marker at {} of {} bytes", self.dict.len(), target);
            if self.options.is_strict() && self.dict.len() < target {
                return Err(DecompressError::CorruptStream(
                    "end marker before expected size",
                ));
            }
        }
        Ok(())
    }

    fn check_underrun(&mut self, rc: &RangeDecoder<'_>) -> Result<()> {
        if rc.zero_filled() == 0 {
            return Ok(());
        }
        if self.options.is_strict() {
            return Err(DecompressError::TruncatedStream {
                position: self.dict.len(),
            });
        }
        if !self.zero_fill_warned {
            warn!(
                "lzma: input exhausted at output byte {}, continuing with zero fill",
                self.dict.len()
            );
            self.zero_fill_warned = true;
        }
        Ok(())
    }

    /// Decode symbols until `target` bytes exist, an end marker appears, or
    /// fewer than `reserve` unread input bytes remain.
    pub(super) fn run(
        &mut self,
        rc: &mut RangeDecoder<'_>,
        target: usize,
        reserve: usize,
    ) -> Result<Progress> {
        while self.dict.len() < target {
            if rc.remaining() < reserve {
                return Ok(Progress::NeedInput);
            }
            if self.decode_symbol(rc, target)? == Step::EndMarker {
                return Ok(Progress::EndMarker);
            }
            self.check_underrun(rc)?;
        }
        Ok(Progress::Complete)
    }

    fn decode_symbol(&mut self, rc: &mut RangeDecoder<'_>, target: usize) -> Result<Step> {
        let pos = self.dict.len();
        let pos_state = pos & self.options.pos_state_mask();
        let s = self.state.index();

        if rc.decode_bit(self.model.is_match(s, pos_state)) == 0 {
            self.decode_literal(rc)?;
            return Ok(Step::Continue);
        }

        let len = if rc.decode_bit(self.model.is_rep(s)) == 0 {
            let len = self.decode_len(rc, LenKind::Match, pos_state);
            self.state.update_match();
            let distance = self.decode_distance(rc, len);
            if distance == END_MARKER {
                return Ok(Step::EndMarker);
            }
            self.reps.push(distance + 1);
            len
        } else {
            if rc.decode_bit(self.model.is_rep_g0(s)) == 0 {
                if rc.decode_bit(self.model.is_rep0_long(s, pos_state)) == 0 {
                    self.state.update_short_rep();
                    let byte = self.dict.byte_at_distance(self.reps.rep0())?;
                    self.dict.push(byte);
                    return Ok(Step::Continue);
                }
            } else {
                let slot = if rc.decode_bit(self.model.is_rep_g1(s)) == 0 {
                    1
                } else if rc.decode_bit(self.model.is_rep_g2(s)) == 0 {
                    2
                } else {
                    3
                };
                self.reps.promote(slot);
            }
            let len = self.decode_len(rc, LenKind::Rep, pos_state);
            self.state.update_rep();
            len
        };

        // a match running past the target is cut short
        let len = len.min(target - pos);
        self.dict.copy_match(self.reps.rep0(), len)?;
        Ok(Step::Continue)
    }

    fn decode_literal(&mut self, rc: &mut RangeDecoder<'_>) -> Result<()> {
        let match_byte = if self.state.is_literal() {
            None
        } else {
            Some(self.dict.byte_at_distance(self.reps.rep0())?)
        };
        let lit_pos = self.dict.len() & self.options.literal_pos_mask();
        let probs = self.model.literal(lit_pos, self.dict.last_byte());

        let mut symbol = 1usize;
        if let Some(mut match_byte) = match_byte {
            while symbol < 0x100 {
                let match_bit = usize::from(match_byte >> 7);
                match_byte <<= 1;
                let bit = rc.decode_bit(&mut probs[((1 + match_bit) << 8) + symbol]) as usize;
                symbol = (symbol << 1) | bit;
                if bit != match_bit {
                    break;
                }
            }
        }
        while symbol < 0x100 {
            symbol = (symbol << 1) | rc.decode_bit(&mut probs[symbol]) as usize;
        }

        self.dict.push((symbol - 0x100) as u8);
        self.state.update_literal();
        Ok(())
    }

    fn decode_len(&mut self, rc: &mut RangeDecoder<'_>, kind: LenKind, pos_state: usize) -> usize {
        if rc.decode_bit(self.model.len_choice(kind)) == 0 {
            let low = rc.decode_tree(self.model.len_low(kind, pos_state), LEN_LOW_BITS);
            return MATCH_LEN_MIN + low as usize;
        }
        if rc.decode_bit(self.model.len_choice_2(kind)) == 0 {
            let mid = rc.decode_tree(self.model.len_mid(kind, pos_state), LEN_MID_BITS);
            return MATCH_LEN_MIN + (1 << LEN_LOW_BITS) + mid as usize;
        }
        let high = rc.decode_tree(self.model.len_high(kind), LEN_HIGH_BITS);
        MATCH_LEN_MIN + (1 << LEN_LOW_BITS) + (1 << LEN_MID_BITS) + high as usize
    }

    /// Decode a zero-based distance for a match of length `len`.
    fn decode_distance(&mut self, rc: &mut RangeDecoder<'_>, len: usize) -> u32 {
        let len_state = (len - MATCH_LEN_MIN).min(LEN_TO_POS_STATES - 1);
        let slot = rc.decode_tree(self.model.pos_slot(len_state), POS_SLOT_BITS);
        if slot < START_POS_MODEL_INDEX {
            return slot;
        }

        let num_direct_bits = (slot >> 1) - 1;
        let mut distance = (2 | (slot & 1)) << num_direct_bits;
        if slot < END_POS_MODEL_INDEX {
            let probs = self.model.spec_pos(distance, slot, num_direct_bits);
            distance += rc.decode_reverse_tree(probs, num_direct_bits);
        } else {
            distance += rc.decode_direct_bits(num_direct_bits - ALIGN_BITS) << ALIGN_BITS;
            distance += rc.decode_reverse_tree(self.model.align(), ALIGN_BITS);
        }
        distance
    }

    #[cfg(test)]
    pub(super) fn reps(&self) -> &RepDistances {
        &self.reps
    }

    #[cfg(test)]
    pub(super) fn state(&self) -> State {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LzmaError;
    use crate::options::TruncationPolicy;

    fn decoder() -> LzmaDecoder {
        LzmaDecoder::new(DecoderOptions::default()).unwrap()
    }

    #[test]
    fn test_match_len_bounds() {
        assert_eq!(MATCH_LEN_MAX, 273);
    }

    #[test]
    fn test_invalid_options_rejected() {
        let opts = DecoderOptions::default().with_literal_bits(3, 2);
        assert!(matches!(
            LzmaDecoder::new(opts),
            Err(LzmaError::InvalidLiteralBits { lc: 3, lp: 2 })
        ));
    }

    #[test]
    fn test_single_literal_from_minimal_stream() {
        let mut d = decoder();
        let out = d.decompress(&[0x00, 0x00, 0x00, 0x00, 0x00], 1).unwrap();
        assert_eq!(out, vec![0x00]);
        assert_eq!(d.state().index(), 0);
    }

    #[test]
    fn test_zero_stream_is_all_literals() {
        let mut d = decoder();
        let out = d.decompress(&[0u8; 32], 100).unwrap();
        assert_eq!(out, vec![0u8; 100]);
        assert_eq!(d.reps().as_array(), [1, 1, 1, 1]);
    }

    #[test]
    fn test_zero_length_output() {
        let mut d = decoder();
        assert!(d.decompress(&[0u8; 5], 0).unwrap().is_empty());
        assert!(d.decompress(&[], 0).unwrap().is_empty());

        // nothing to decode, so no input is required even in strict mode
        let opts = DecoderOptions::default().with_truncation(TruncationPolicy::Error);
        let mut strict = LzmaDecoder::new(opts).unwrap();
        assert_eq!(strict.decompress(&[], 0), Ok(Vec::new()));
        assert_eq!(strict.decompress(&[0x01], 0), Ok(Vec::new()));
    }

    #[test]
    fn test_output_limit_caps_target() {
        let opts = DecoderOptions::default().with_output_limit(10);
        let mut d = LzmaDecoder::new(opts).unwrap();
        let out = d.decompress(&[0u8; 16], 1000).unwrap();
        assert_eq!(out.len(), 10);
    }

    #[test]
    fn test_exhaustion_is_deterministic() {
        let input = [0x00, 0x3C, 0x91, 0x07, 0xE2, 0x55];
        let first = decoder().decompress(&input, 512);
        let second = decoder().decompress(&input, 512);
        assert_eq!(first, second);

        // reusing one decoder gives the same result as a fresh one
        let mut d = decoder();
        let _ = d.decompress(&[0u8; 8], 64);
        assert_eq!(d.decompress(&input, 512), first);
    }

    #[test]
    fn test_strict_rejects_truncation() {
        let opts = DecoderOptions::default().with_truncation(TruncationPolicy::Error);
        let mut d = LzmaDecoder::new(opts).unwrap();
        assert!(matches!(
            d.decompress(&[0u8; 5], 64),
            Err(DecompressError::TruncatedStream { .. })
        ));
        assert!(matches!(
            d.decompress(&[0u8; 3], 1),
            Err(DecompressError::TruncatedStream { position: 0 })
        ));
    }

    #[test]
    fn test_strict_rejects_lead_byte() {
        let opts = DecoderOptions::default().with_truncation(TruncationPolicy::Error);
        let mut d = LzmaDecoder::new(opts).unwrap();
        assert!(matches!(
            d.decompress(&[0x01, 0, 0, 0, 0, 0, 0, 0], 1),
            Err(DecompressError::CorruptStream(_))
        ));

        // the permissive policy ignores it
        let out = decoder().decompress(&[0x01, 0, 0, 0, 0, 0, 0, 0], 1).unwrap();
        assert_eq!(out, vec![0]);
    }

    #[test]
    fn test_match_at_start_is_invalid_distance() {
        // code = 0xFFFFFFFF takes the "1" branch of is_match and is_rep:
        // a rep match with nothing in the dictionary
        let mut d = decoder();
        let err = d.decompress(&[0x00, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF], 4).unwrap_err();
        assert!(matches!(
            err,
            DecompressError::InvalidDistance { distance: 1, position: 0 }
        ));
    }
}
