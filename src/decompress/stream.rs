//! Incremental decoding for input that arrives in pieces.
//!
//! A symbol is only decoded while at least [`REQUIRED_INPUT_MAX`] unread
//! bytes are buffered, which is more than any single LZMA symbol can
//! consume. Decoding therefore never stops inside a symbol: between calls
//! the only carried state is the `(range, code)` pair, the models, the
//! history state, the rep cache and the output. Once the caller calls
//! [`StreamDecoder::finish`] the tail is decoded like a one-shot stream, so
//! the result does not depend on how the input was split.

use std::io;

use super::lzma::{LzmaDecoder, Progress};
use super::range_coder::{RangeDecoder, RangeState, INIT_BYTES};
use super::{DecompressError, Result};
use crate::options::DecoderOptions;

/// Most input bytes a single symbol can consume.
pub const REQUIRED_INPUT_MAX: usize = 20;

/// Push-style LZMA decoder.
///
/// # Example
///
/// ```rust
/// use lzma_stream::{DecoderOptions, StreamDecoder};
///
/// let mut decoder = StreamDecoder::new(DecoderOptions::default(), 8).unwrap();
/// for chunk in [0u8; 40].chunks(7) {
///     decoder.feed(chunk).unwrap();
/// }
/// assert_eq!(decoder.finish().unwrap(), vec![0u8; 8]);
/// ```
pub struct StreamDecoder {
    decoder: LzmaDecoder,
    /// Output size this stream decodes to
    target: usize,
    /// Coder registers, once the first five bytes were seen
    range: Option<RangeState>,
    /// Input received but not yet consumed
    pending: Vec<u8>,
    /// Total input bytes consumed
    consumed: u64,
    /// Target reached, end marker seen, or an error occurred
    done: bool,
    /// First decode error; every later call reports it again
    error: Option<DecompressError>,
}

impl StreamDecoder {
    /// Create a streaming decoder for a stream of `unpacked_size` bytes.
    pub fn new(options: DecoderOptions, unpacked_size: usize) -> crate::error::Result<Self> {
        let decoder = LzmaDecoder::new(options)?;
        let target = decoder.target(unpacked_size);
        Ok(Self {
            decoder,
            target,
            range: None,
            pending: Vec::with_capacity(REQUIRED_INPUT_MAX * 2),
            consumed: 0,
            done: false,
            error: None,
        })
    }

    /// Supply more compressed input. Returns the number of bytes of output
    /// produced by this call.
    ///
    /// Once a call has failed, every later call returns the same error.
    pub fn feed(&mut self, chunk: &[u8]) -> Result<usize> {
        if self.done {
            return self.error.clone().map_or(Ok(0), Err);
        }
        self.pending.extend_from_slice(chunk);
        self.advance(REQUIRED_INPUT_MAX)
    }

    /// Signal end of input, decode what is left and return the output.
    pub fn finish(mut self) -> Result<Vec<u8>> {
        self.advance(0)?;
        Ok(self.decoder.take_output())
    }

    /// Output produced so far.
    pub fn output(&self) -> &[u8] {
        self.decoder.dict().as_slice()
    }

    /// Whether no further input can change the output.
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Total compressed bytes consumed so far.
    pub fn consumed(&self) -> u64 {
        self.consumed
    }

    /// Compressed bytes buffered but not yet consumed.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    fn advance(&mut self, reserve: usize) -> Result<usize> {
        if self.done {
            return self.error.clone().map_or(Ok(0), Err);
        }
        let result = self.advance_inner(reserve);
        if let Err(e) = &result {
            self.error = Some(e.clone());
            self.done = true;
        }
        result
    }

    fn advance_inner(&mut self, reserve: usize) -> Result<usize> {
        if self.target == 0 {
            self.done = true;
            return Ok(0);
        }
        let before = self.decoder.dict().len();

        let mut rc = match self.range {
            Some(state) => RangeDecoder::resume(&self.pending, state),
            None => {
                if reserve > 0 && self.pending.len() < INIT_BYTES {
                    return Ok(0);
                }
                let rc = RangeDecoder::new(&self.pending);
                self.decoder.check_start(&rc)?;
                rc
            }
        };

        let progress = self.decoder.run(&mut rc, self.target, reserve)?;
        let used = rc.position();
        self.range = Some(rc.state());
        self.pending.drain(..used);
        self.consumed += used as u64;

        if progress != Progress::NeedInput {
            self.decoder.check_end(progress, self.target)?;
            self.done = true;
        }
        Ok(self.decoder.dict().len() - before)
    }
}

impl io::Write for StreamDecoder {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.feed(buf).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decompress::DecompressError;
    use crate::options::TruncationPolicy;
    use std::io::Write;

    #[test]
    fn test_waits_for_enough_input() {
        let mut d = StreamDecoder::new(DecoderOptions::default(), 4).unwrap();
        assert_eq!(d.feed(&[0u8; 4]).unwrap(), 0);
        assert_eq!(d.consumed(), 0);
        assert_eq!(d.feed(&[0u8; 10]).unwrap(), 0);
        // coder initialized, but fewer than REQUIRED_INPUT_MAX bytes remain
        assert_eq!(d.consumed(), 5);
        assert_eq!(d.pending(), 9);
        assert!(!d.is_done());
        assert_eq!(d.finish().unwrap(), vec![0u8; 4]);
    }

    #[test]
    fn test_done_after_target() {
        let mut d = StreamDecoder::new(DecoderOptions::default(), 3).unwrap();
        assert_eq!(d.feed(&[0u8; 64]).unwrap(), 3);
        assert!(d.is_done());
        assert_eq!(d.output(), &[0, 0, 0]);
        assert_eq!(d.feed(&[0u8; 64]).unwrap(), 0);
    }

    #[test]
    fn test_chunking_matches_one_shot() {
        let input: Vec<u8> = (0..200u32).map(|i| (i * 37 % 251) as u8).collect();
        let mut input = input;
        input[0] = 0;
        let opts = DecoderOptions::default();
        let expected = LzmaDecoder::new(opts).unwrap().decompress(&input, 300);

        for chunk_size in [1, 3, 19, 20, 64, 200] {
            let mut d = StreamDecoder::new(opts, 300).unwrap();
            let mut result = Ok(());
            for chunk in input.chunks(chunk_size) {
                if let Err(e) = d.feed(chunk) {
                    result = Err(e);
                    break;
                }
            }
            let got = result.and_then(|()| d.finish());
            assert_eq!(got, expected, "chunk size {}", chunk_size);
        }
    }

    #[test]
    fn test_strict_truncation_reported_on_finish() {
        let opts = DecoderOptions::default().with_truncation(TruncationPolicy::Error);
        let mut d = StreamDecoder::new(opts, 64).unwrap();
        d.feed(&[0u8; 5]).unwrap();
        assert!(matches!(
            d.finish(),
            Err(DecompressError::TruncatedStream { .. })
        ));
    }

    #[test]
    fn test_write_adapter() {
        let mut d = StreamDecoder::new(DecoderOptions::default(), 16).unwrap();
        d.write_all(&[0u8; 48]).unwrap();
        d.flush().unwrap();
        assert_eq!(d.finish().unwrap(), vec![0u8; 16]);
    }

    #[test]
    fn test_write_adapter_maps_errors() {
        let mut d = StreamDecoder::new(DecoderOptions::default(), 16).unwrap();
        let mut input = vec![0xFF; 25];
        input[0] = 0x00;
        let err = d.write_all(&input).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
        assert!(d.is_done());
    }

    #[test]
    fn test_error_is_sticky() {
        // a rep match before any output: invalid distance on the first symbol
        let mut input = vec![0xFF; 30];
        input[0] = 0x00;
        let expected = DecompressError::InvalidDistance {
            distance: 1,
            position: 0,
        };

        let mut d = StreamDecoder::new(DecoderOptions::default(), 16).unwrap();
        assert_eq!(d.feed(&input), Err(expected.clone()));
        assert_eq!(d.feed(&[0u8; 32]), Err(expected.clone()));
        assert_eq!(d.finish(), Err(expected.clone()));

        // an ignored write error still surfaces from finish
        let mut d = StreamDecoder::new(DecoderOptions::default(), 16).unwrap();
        let _ = d.write(&input);
        assert_eq!(d.finish(), Err(expected));
    }

    #[test]
    fn test_zero_target_needs_no_input() {
        let opts = DecoderOptions::default().with_truncation(TruncationPolicy::Error);
        let mut d = StreamDecoder::new(opts, 0).unwrap();
        assert_eq!(d.feed(&[]), Ok(0));
        assert!(d.is_done());
        assert_eq!(d.finish(), Ok(Vec::new()));
    }
}
