//! Parallel decoding of independent streams.
//!
//! Every stream gets its own [`LzmaDecoder`]; nothing is shared between
//! jobs, so results are identical to decoding them one after another.

use rayon::prelude::*;

use crate::decompress::LzmaDecoder;
use crate::error::Result;
use crate::options::DecoderOptions;

/// One stream to decode.
#[derive(Debug, Clone, Copy)]
pub struct DecodeJob<'a> {
    pub input: &'a [u8],
    pub options: DecoderOptions,
    pub unpacked_size: usize,
}

impl<'a> DecodeJob<'a> {
    pub fn new(input: &'a [u8], options: DecoderOptions, unpacked_size: usize) -> Self {
        Self {
            input,
            options,
            unpacked_size,
        }
    }

    fn run(&self) -> Result<Vec<u8>> {
        let mut decoder = LzmaDecoder::new(self.options)?;
        Ok(decoder.decompress(self.input, self.unpacked_size)?)
    }
}

/// Decode all jobs on the rayon pool. Results are in job order.
pub fn decompress_all(jobs: &[DecodeJob<'_>]) -> Vec<Result<Vec<u8>>> {
    log::debug!(
        "lzma: decoding {} streams on {} threads",
        jobs.len(),
        rayon::current_num_threads()
    );
    jobs.par_iter().map(DecodeJob::run).collect()
}
