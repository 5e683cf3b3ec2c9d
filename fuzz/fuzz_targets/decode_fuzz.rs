#![no_main]
use bitspeak::{Bitspeak, Config, Format};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Arbitrary text must only ever produce errors, never panics.
    let text = String::from_utf8_lossy(data);
    for format in [Format::Bs6, Format::Bs8] {
        let codec = Bitspeak::new(format, Config::default());
        let _ = codec.decode(&text);

        // Same input through the streaming path, raw bytes included.
        let mut out = Vec::new();
        let _ = codec.decode_stream(data, &mut out);
    }
});
