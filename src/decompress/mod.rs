//! LZMA range decoding.
//!
//! This module implements the core decoding loop of LZMA: an adaptive
//! binary range decoder, the probability model table, and the
//! literal/match state machine that rebuilds the output from it. Container
//! headers are not parsed; the caller supplies `lc`, `lp`, `pb` and the
//! dictionary size through [`DecoderOptions`](crate::DecoderOptions).
//!
//! ## Decoders
//!
//! | Decoder | Input | Use |
//! |---------|-------|-----|
//! | [`LzmaDecoder`] | whole stream in memory | one call per stream |
//! | [`StreamDecoder`] | stream arriving in chunks | feed, then finish |
//!
//! ## Architecture
//!
//! ```text
//! Compressed Data
//!       ↓
//! ┌──────────────┐
//! │ RangeDecoder │ ← (range, code) registers, byte-wise normalization
//! └──────────────┘
//!       ↓
//! ┌──────────────┐
//! │ Bit / tree   │ ← adaptive bits against ProbabilityModel slots
//! └──────────────┘
//!       ↓
//! ┌──────────────┐
//! │ LzmaDecoder  │ ← literal / match / rep state machine
//! └──────────────┘
//!       ↓
//! ┌──────────────┐
//! │ Dictionary   │ ← append-only output, source of match copies
//! └──────────────┘
//!       ↓
//! Decompressed Data
//! ```
//!
//! ## Example
//!
//! ```rust
//! use lzma_stream::{DecoderOptions, LzmaDecoder};
//!
//! let mut decoder = LzmaDecoder::new(DecoderOptions::default()).unwrap();
//! // An all-zero stream decodes to zero literals.
//! let out = decoder.decompress(&[0u8; 16], 4).unwrap();
//! assert_eq!(out, vec![0u8; 4]);
//! ```

mod bit_decoder;
mod lzma;
mod model;
mod range_coder;
mod state;
mod stream;
mod window;


pub use bit_decoder::{update_one, update_zero, BIT_MODEL_TOTAL, PROB_INIT};
pub use lzma::{LzmaDecoder, MATCH_LEN_MAX, MATCH_LEN_MIN};
pub use model::{LenKind, ProbabilityModel};
pub use range_coder::{RangeDecoder, RangeState};
pub use state::{RepDistances, State};
pub use stream::{StreamDecoder, REQUIRED_INPUT_MAX};
pub use window::OutputDictionary;

use std::fmt;

/// Errors found in compressed data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecompressError {
    /// The input ended before the requested output was produced
    /// (strict truncation policy only).
    TruncatedStream { position: usize },
    /// A match referenced a distance of zero, beyond the bytes produced so
    /// far, or beyond the dictionary size.
    InvalidDistance { distance: u32, position: usize },
    /// The stream is malformed in a way not tied to a distance.
    CorruptStream(&'static str),
}

impl fmt::Display for DecompressError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TruncatedStream { position } => {
                write!(f, "Truncated stream: input ran out at output byte {}", position)
            }
            Self::InvalidDistance { distance, position } => {
                write!(
                    f,
                    "Invalid match distance: {} exceeds window at position {}",
                    distance, position
                )
            }
            Self::CorruptStream(msg) => write!(f, "Corrupt stream: {}", msg),
        }
    }
}

impl std::error::Error for DecompressError {}

pub type Result<T> = std::result::Result<T, DecompressError>;
