//! LZMA range decoding library.
//!
//! Decodes raw LZMA streams: the adaptive binary range decoder, the
//! probability model table, and the literal/match state machine with its
//! four-entry rep cache. Container formats (`.lzma`, `.xz`, `.7z`) are out of
//! scope; the caller supplies the stream parameters through
//! [`DecoderOptions`].
//!
//! ## Features
//! - Core library depends only on `log`
//! - `parallel` - Decode independent streams on a rayon thread pool
//!
//! ## Example
//!
//! ```rust
//! use lzma_stream::{decompress, DecoderOptions};
//!
//! let out = decompress(&[0u8; 16], DecoderOptions::default(), 4).unwrap();
//! assert_eq!(out, vec![0u8; 4]);
//! ```

pub mod decompress;
pub mod error;
pub mod options;

#[cfg(feature = "parallel")]
pub mod parallel;

pub use error::LzmaError;
pub use options::{DecoderOptions, TruncationPolicy};

// Re-export decompression types
pub use decompress::{DecompressError, LzmaDecoder, StreamDecoder};

/// Decode one complete stream of `unpacked_size` bytes.
///
/// Validates `options` first, so an invalid configuration is reported before
/// any input is read.
pub fn decompress(
    input: &[u8],
    options: DecoderOptions,
    unpacked_size: usize,
) -> error::Result<Vec<u8>> {
    let mut decoder = LzmaDecoder::new(options)?;
    Ok(decoder.decompress(input, unpacked_size)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decompress_validates_first() {
        let opts = DecoderOptions::default().with_pos_bits(5);
        assert!(matches!(
            decompress(&[], opts, 1),
            Err(LzmaError::InvalidPositionBits(5))
        ));
    }

    #[test]
    fn test_decompress_wraps_stream_errors() {
        let opts = DecoderOptions::default().with_truncation(TruncationPolicy::Error);
        match decompress(&[0u8; 2], opts, 1) {
            Err(LzmaError::Decompress(DecompressError::TruncatedStream { position: 0 })) => {}
            other => panic!("unexpected: {:?}", other),
        }
    }
}
