//! Probability model table.
//!
//! All adaptive probabilities of a session live in one flat array. Each
//! context family owns a fixed, named sub-range; accessors hand out checked
//! sub-slices so no decode step can index outside its family.
//!
//! | Family | Offset | Slots |
//! |--------|--------|-------|
//! | `is_match` | 0 | 12 × 16 |
//! | `is_rep` | 192 | 12 |
//! | `is_rep_g0` | 204 | 12 |
//! | `is_rep_g1` | 216 | 12 |
//! | `is_rep_g2` | 228 | 12 |
//! | `is_rep0_long` | 240 | 12 × 16 |
//! | `pos_slot` | 432 | 4 × 64 |
//! | `spec_pos` | 688 | 114 |
//! | `align` | 802 | 16 |
//! | `len` | 818 | 514 |
//! | `rep_len` | 1332 | 514 |
//! | `literal` | 1846 | 0x300 × 2^(lc+lp) |

use super::bit_decoder::PROB_INIT;
use super::state::NUM_STATES;

/// Position-state bits the tables are laid out for (pb is at most 4).
pub const POS_BITS_MAX: u32 = 4;
const POS_STATES_MAX: usize = 1 << POS_BITS_MAX;

/// Distance-slot trees, one per length class.
pub const LEN_TO_POS_STATES: usize = 4;
pub const POS_SLOT_BITS: u32 = 6;

/// First slot whose distance carries extra bits.
pub const START_POS_MODEL_INDEX: u32 = 4;
/// First slot whose extra bits are partly direct-coded.
pub const END_POS_MODEL_INDEX: u32 = 14;
pub const NUM_FULL_DISTANCES: usize = 1 << (END_POS_MODEL_INDEX >> 1);

pub const ALIGN_BITS: u32 = 4;

pub const LEN_LOW_BITS: u32 = 3;
pub const LEN_MID_BITS: u32 = 3;
pub const LEN_HIGH_BITS: u32 = 8;
const LEN_LOW_SYMBOLS: usize = 1 << LEN_LOW_BITS;
const LEN_MID_SYMBOLS: usize = 1 << LEN_MID_BITS;
const LEN_HIGH_SYMBOLS: usize = 1 << LEN_HIGH_BITS;

/// Slots per literal coder (plain tree plus the two matched sub-trees).
pub const LITERAL_CODER_SIZE: usize = 0x300;

const IS_MATCH: usize = 0;
const IS_REP: usize = IS_MATCH + (NUM_STATES << POS_BITS_MAX);
const IS_REP_G0: usize = IS_REP + NUM_STATES;
const IS_REP_G1: usize = IS_REP_G0 + NUM_STATES;
const IS_REP_G2: usize = IS_REP_G1 + NUM_STATES;
const IS_REP0_LONG: usize = IS_REP_G2 + NUM_STATES;
const POS_SLOT: usize = IS_REP0_LONG + (NUM_STATES << POS_BITS_MAX);
const SPEC_POS: usize = POS_SLOT + (LEN_TO_POS_STATES << POS_SLOT_BITS);
const ALIGN: usize = SPEC_POS + NUM_FULL_DISTANCES - END_POS_MODEL_INDEX as usize;
const LEN_CODER: usize = ALIGN + (1 << ALIGN_BITS);
const REP_LEN_CODER: usize = LEN_CODER + LEN_CODER_SIZE;
const LITERAL: usize = REP_LEN_CODER + LEN_CODER_SIZE;

// Offsets inside one length coder.
const LEN_CHOICE: usize = 0;
const LEN_CHOICE_2: usize = 1;
const LEN_LOW: usize = 2;
const LEN_MID: usize = LEN_LOW + POS_STATES_MAX * LEN_LOW_SYMBOLS;
const LEN_HIGH: usize = LEN_MID + POS_STATES_MAX * LEN_MID_SYMBOLS;
const LEN_CODER_SIZE: usize = LEN_HIGH + LEN_HIGH_SYMBOLS;

/// Number of slots that do not depend on `lc`/`lp` (0x736).
pub const BASE_SIZE: usize = LITERAL;

/// Which of the two length coders to address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LenKind {
    /// Lengths of newly coded distances
    Match,
    /// Lengths of repeated distances
    Rep,
}

/// Adaptive probabilities for one `(lc, lp)` configuration.
#[derive(Clone)]
pub struct ProbabilityModel {
    probs: Vec<u16>,
    lc: u32,
    lp: u32,
}

impl ProbabilityModel {
    /// Allocate a table for the given literal context/position bits, with
    /// every slot at one half.
    pub fn new(lc: u32, lp: u32) -> Self {
        Self {
            probs: vec![PROB_INIT; Self::table_size(lc, lp)],
            lc,
            lp,
        }
    }

    /// Table size for a configuration: `(0x300 << (lc + lp)) + 0x736`.
    pub fn table_size(lc: u32, lp: u32) -> usize {
        (LITERAL_CODER_SIZE << (lc + lp)) + BASE_SIZE
    }

    /// Put every probability back to one half.
    pub fn reset(&mut self) {
        self.probs.fill(PROB_INIT);
    }

    /// Raw view of the whole table.
    pub fn as_slice(&self) -> &[u16] {
        &self.probs
    }

    #[inline]
    pub fn is_match(&mut self, state: usize, pos_state: usize) -> &mut u16 {
        &mut self.probs[IS_MATCH + (state << POS_BITS_MAX) + pos_state]
    }

    #[inline]
    pub fn is_rep(&mut self, state: usize) -> &mut u16 {
        &mut self.probs[IS_REP + state]
    }

    #[inline]
    pub fn is_rep_g0(&mut self, state: usize) -> &mut u16 {
        &mut self.probs[IS_REP_G0 + state]
    }

    #[inline]
    pub fn is_rep_g1(&mut self, state: usize) -> &mut u16 {
        &mut self.probs[IS_REP_G1 + state]
    }

    #[inline]
    pub fn is_rep_g2(&mut self, state: usize) -> &mut u16 {
        &mut self.probs[IS_REP_G2 + state]
    }

    #[inline]
    pub fn is_rep0_long(&mut self, state: usize, pos_state: usize) -> &mut u16 {
        &mut self.probs[IS_REP0_LONG + (state << POS_BITS_MAX) + pos_state]
    }

    /// 6-bit slot tree for a length class (`0..4`).
    #[inline]
    pub fn pos_slot(&mut self, len_state: usize) -> &mut [u16] {
        let start = POS_SLOT + (len_state << POS_SLOT_BITS);
        &mut self.probs[start..start + (1 << POS_SLOT_BITS)]
    }

    /// Reverse tree for the extra bits of slots `4..14`.
    ///
    /// `base` is the slot's distance base; the tree starts one slot before
    /// `base - slot` so that node 1 is its first entry.
    #[inline]
    pub fn spec_pos(&mut self, base: u32, slot: u32, num_bits: u32) -> &mut [u16] {
        let start = SPEC_POS + base as usize - slot as usize - 1;
        &mut self.probs[start..start + (1 << num_bits)]
    }

    /// 4-bit reverse tree for the low bits of long distances.
    #[inline]
    pub fn align(&mut self) -> &mut [u16] {
        &mut self.probs[ALIGN..ALIGN + (1 << ALIGN_BITS)]
    }

    #[inline]
    fn len_coder(&mut self, kind: LenKind) -> &mut [u16] {
        let start = match kind {
            LenKind::Match => LEN_CODER,
            LenKind::Rep => REP_LEN_CODER,
        };
        &mut self.probs[start..start + LEN_CODER_SIZE]
    }

    #[inline]
    pub fn len_choice(&mut self, kind: LenKind) -> &mut u16 {
        &mut self.len_coder(kind)[LEN_CHOICE]
    }

    #[inline]
    pub fn len_choice_2(&mut self, kind: LenKind) -> &mut u16 {
        &mut self.len_coder(kind)[LEN_CHOICE_2]
    }

    #[inline]
    pub fn len_low(&mut self, kind: LenKind, pos_state: usize) -> &mut [u16] {
        let start = LEN_LOW + pos_state * LEN_LOW_SYMBOLS;
        &mut self.len_coder(kind)[start..start + LEN_LOW_SYMBOLS]
    }

    #[inline]
    pub fn len_mid(&mut self, kind: LenKind, pos_state: usize) -> &mut [u16] {
        let start = LEN_MID + pos_state * LEN_MID_SYMBOLS;
        &mut self.len_coder(kind)[start..start + LEN_MID_SYMBOLS]
    }

    #[inline]
    pub fn len_high(&mut self, kind: LenKind) -> &mut [u16] {
        &mut self.len_coder(kind)[LEN_HIGH..LEN_HIGH + LEN_HIGH_SYMBOLS]
    }

    /// Literal coder selected by the masked output position (`pos &
    /// literal_pos_mask`) and the previous byte.
    #[inline]
    pub fn literal(&mut self, lit_pos: usize, prev_byte: u8) -> &mut [u16] {
        debug_assert!(lit_pos < 1 << self.lp);
        let lit_state = (lit_pos << self.lc) + (usize::from(prev_byte) >> (8 - self.lc));
        let start = LITERAL + lit_state * LITERAL_CODER_SIZE;
        &mut self.probs[start..start + LITERAL_CODER_SIZE]
    }
}

impl std::fmt::Debug for ProbabilityModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProbabilityModel")
            .field("lc", &self.lc)
            .field("lp", &self.lp)
            .field("slots", &self.probs.len())
            .finish()
    }
}
