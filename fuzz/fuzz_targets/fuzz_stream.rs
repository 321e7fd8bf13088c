#![no_main]
use libfuzzer_sys::fuzz_target;
use lzma_stream::{DecoderOptions, LzmaDecoder, StreamDecoder};

// Feed the input in chunks and compare against one-shot decoding.
// First 2 bytes: chunk size, unpacked size.
fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }

    let chunk_size = usize::from(data[0]).max(1);
    let unpacked_size = usize::from(data[1]) * 64;
    let input = &data[2..];
    let options = DecoderOptions::default().with_dict_size(1 << 16);

    let one_shot = LzmaDecoder::new(options)
        .unwrap()
        .decompress(input, unpacked_size);

    let mut stream = StreamDecoder::new(options, unpacked_size).unwrap();
    let mut failed = None;
    for chunk in input.chunks(chunk_size) {
        if let Err(e) = stream.feed(chunk) {
            failed = Some(e);
            break;
        }
    }
    let streamed = match failed {
        Some(e) => Err(e),
        None => stream.finish(),
    };

    assert_eq!(one_shot, streamed);
});
