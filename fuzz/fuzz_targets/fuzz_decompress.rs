#![no_main]
use libfuzzer_sys::fuzz_target;
use lzma_stream::{DecoderOptions, LzmaDecoder, TruncationPolicy};

// Fuzz the decoder with arbitrary parameters and input.
// First 4 bytes: props byte, truncation policy, unpacked size (u16 LE).
fuzz_target!(|data: &[u8]| {
    if data.len() < 4 {
        return;
    }

    let mut props = u32::from(data[0]);
    let lc = props % 9;
    props /= 9;
    let lp = props % 5;
    let pb = (props / 5) % 5;
    let truncation = if data[1] & 1 == 0 {
        TruncationPolicy::ZeroFill
    } else {
        TruncationPolicy::Error
    };
    // Cap unpacked size to prevent timeouts
    let unpacked_size = u16::from_le_bytes([data[2], data[3]]) as usize;

    let options = DecoderOptions::default()
        .with_literal_bits(lc, lp)
        .with_pos_bits(pb)
        .with_dict_size(1 << 16)
        .with_truncation(truncation);
    let mut decoder = match LzmaDecoder::new(options) {
        Ok(d) => d,
        Err(_) => return,
    };

    if let Ok(out) = decoder.decompress(&data[4..], unpacked_size) {
        assert!(out.len() <= unpacked_size);
    }
});
