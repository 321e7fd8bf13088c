//! Literal/match history state and the repeat-distance cache.

/// Number of distinct history states.
pub const NUM_STATES: usize = 12;

/// States below this value were last moved by a literal.
const LIT_STATES: u8 = 7;

/// Recent literal/match history (`0..12`).
///
/// States `0..7` follow a literal, `7..12` follow a match, repeat or short
/// repeat. The value selects which `is_match`, `is_rep*` and
/// `is_rep0_long` probabilities are consulted next.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct State(u8);

impl State {
    pub fn new() -> Self {
        Self(0)
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Whether the previous symbol was a literal.
    #[inline]
    pub fn is_literal(self) -> bool {
        self.0 < LIT_STATES
    }

    #[inline]
    pub fn update_literal(&mut self) {
        self.0 = match self.0 {
            0..=3 => 0,
            4..=9 => self.0 - 3,
            _ => self.0 - 6,
        };
    }

    #[inline]
    pub fn update_match(&mut self) {
        self.0 = if self.is_literal() { 7 } else { 10 };
    }

    #[inline]
    pub fn update_rep(&mut self) {
        self.0 = if self.is_literal() { 8 } else { 11 };
    }

    #[inline]
    pub fn update_short_rep(&mut self) {
        self.0 = if self.is_literal() { 9 } else { 11 };
    }
}

/// Number of cached distances.
pub const NUM_REPS: usize = 4;

/// Most-recently-used match distances, most recent first.
///
/// Distances are 1-based: a distance of 1 refers to the previous byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepDistances {
    reps: [u32; NUM_REPS],
}

impl Default for RepDistances {
    fn default() -> Self {
        Self::new()
    }
}

impl RepDistances {
    pub fn new() -> Self {
        Self {
            reps: [1; NUM_REPS],
        }
    }

    #[inline]
    pub fn rep0(&self) -> u32 {
        self.reps[0]
    }

    pub fn as_array(&self) -> [u32; NUM_REPS] {
        self.reps
    }

    /// Insert a newly coded distance at the front; the oldest entry drops out.
    #[inline]
    pub fn push(&mut self, distance: u32) {
        self.reps.copy_within(0..NUM_REPS - 1, 1);
        self.reps[0] = distance;
    }

    /// Move entry `slot` to the front, shifting the more recent entries back
    /// by one. Entries after `slot` keep their place.
    #[inline]
    pub fn promote(&mut self, slot: usize) -> u32 {
        let distance = self.reps[slot];
        self.reps.copy_within(0..slot, 1);
        self.reps[0] = distance;
        distance
    }
}
