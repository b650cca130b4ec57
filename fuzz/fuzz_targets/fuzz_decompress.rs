#![no_main]

use libfuzzer_sys::fuzz_target;
use romlz::LzDecoder;

/// Cap on decoded size; a few dozen bytes can otherwise expand to gigabytes
const MAX_OUTPUT: usize = 1 << 20;

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes must decode or fail cleanly, never panic
    let Ok(decoder) = LzDecoder::new(data, 0) else {
        return;
    };
    if let Ok(result) = decoder.with_max_output(MAX_OUTPUT).decode() {
        assert!(result.compressed_size <= data.len());
        assert!(result.data.len() <= MAX_OUTPUT);
    }
});
