//! Error types for LZMA session setup and decoding.
//!
//! This module provides the [`LzmaError`] type returned by the crate-level
//! entry points. Configuration problems are reported when a session is
//! built; problems found in the compressed data are wrapped
//! [`DecompressError`]s.
//!
//! ## Error Categories
//!
//! | Category | Errors | Description |
//! |----------|--------|-------------|
//! | Configuration | [`InvalidLiteralBits`], [`InvalidPositionBits`], [`InvalidDictionarySize`], [`InvalidOutputLimit`] | Rejected before any byte is decoded |
//! | Stream | [`Decompress`] | Truncated or corrupt compressed data |
//!
//! ## Example
//!
//! ```rust
//! use lzma_stream::{decompress, DecoderOptions, LzmaError};
//!
//! let opts = DecoderOptions::default().with_literal_bits(4, 1);
//! match decompress(&[0u8; 5], opts, 1) {
//!     Err(LzmaError::InvalidLiteralBits { lc, lp }) => assert_eq!((lc, lp), (4, 1)),
//!     other => panic!("unexpected: {:?}", other),
//! }
//! ```
//!
//! [`InvalidLiteralBits`]: LzmaError::InvalidLiteralBits
//! [`InvalidPositionBits`]: LzmaError::InvalidPositionBits
//! [`InvalidDictionarySize`]: LzmaError::InvalidDictionarySize
//! [`InvalidOutputLimit`]: LzmaError::InvalidOutputLimit
//! [`Decompress`]: LzmaError::Decompress

use std::fmt;

use crate::decompress::DecompressError;

/// Error type for LZMA operations.
#[derive(Debug)]
pub enum LzmaError {
    /// Literal context/position bits out of range.
    ///
    /// `lc` must be at most 8, `lp` at most 4, and `lc + lp` at most 4.
    InvalidLiteralBits {
        /// Requested literal context bits.
        lc: u32,
        /// Requested literal position bits.
        lp: u32,
    },

    /// Position bits above 4.
    InvalidPositionBits(u32),

    /// A dictionary size of zero.
    InvalidDictionarySize,

    /// An output limit of zero.
    InvalidOutputLimit,

    /// The compressed data could not be decoded.
    Decompress(DecompressError),
}

impl fmt::Display for LzmaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidLiteralBits { lc, lp } => {
                write!(f, "Invalid literal bits: lc={} lp={} (lc+lp must be <= 4)", lc, lp)
            }
            Self::InvalidPositionBits(pb) => write!(f, "Invalid position bits: pb={}", pb),
            Self::InvalidDictionarySize => write!(f, "Dictionary size must be positive"),
            Self::InvalidOutputLimit => write!(f, "Output limit must be positive"),
            Self::Decompress(e) => write!(f, "Decompression failed: {}", e),
        }
    }
}

impl std::error::Error for LzmaError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Decompress(e) => Some(e),
            _ => None,
        }
    }
}

impl From<DecompressError> for LzmaError {
    fn from(e: DecompressError) -> Self {
        Self::Decompress(e)
    }
}

pub type Result<T> = std::result::Result<T, LzmaError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_display() {
        let e = LzmaError::InvalidLiteralBits { lc: 4, lp: 1 };
        assert_eq!(
            e.to_string(),
            "Invalid literal bits: lc=4 lp=1 (lc+lp must be <= 4)"
        );
        assert_eq!(
            LzmaError::InvalidPositionBits(7).to_string(),
            "Invalid position bits: pb=7"
        );
    }

    #[test]
    fn test_source_chain() {
        let e: LzmaError = DecompressError::TruncatedStream { position: 9 }.into();
        assert!(e.source().is_some());
        assert!(e.to_string().contains("Truncated"));
        assert!(LzmaError::InvalidOutputLimit.source().is_none());
    }
}
