#![no_main]

use libfuzzer_sys::fuzz_target;
use romlz::{compress, decompress};

fuzz_target!(|data: &[u8]| {
    // Limit data size to avoid slowdowns
    let data = if data.len() > 8 * 1024 { &data[..8 * 1024] } else { data };

    let compressed = compress(data).expect("compression of in-memory data cannot fail");
    let decoded = decompress(&compressed.data, 0).expect("freshly compressed stream must decode");

    assert_eq!(decoded.data, data, "Round-trip mismatch");
    assert_eq!(decoded.compressed_size, compressed.data.len());
});
