#![no_main]
use bitspeak::{Bitspeak, Config, Format};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() < 3 {
        return;
    }

    // Use the first bytes as control: format, word size, line size.
    let format = if data[0] & 1 == 0 {
        Format::Bs6
    } else {
        Format::Bs8
    };
    let size = |b: u8| if b == 0 { -1 } else { i64::from(b % 40) + 1 };
    let config = Config::builder()
        .max_word_size(size(data[1]))
        .max_line_size(size(data[2]))
        .build()
        .unwrap();
    let payload = &data[3..];

    let codec = Bitspeak::new(format, config);
    let text = codec.encode(payload);
    assert!(text.chars().count() <= codec.estimate_encode_size(payload.len()));

    let decoded = codec.decode(&text).unwrap();
    assert_eq!(decoded, payload);
});
