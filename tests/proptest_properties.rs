use bitspeak::codec::{Finish, Format};
use bitspeak::{Bitspeak, Config};
use proptest::prelude::*;

const DELIMITERS: &[&str] = &["", "-", " ", "_", "\n", "\r\n", " - "];

fn format_strategy() -> impl Strategy<Value = Format> {
    prop_oneof![Just(Format::Bs6), Just(Format::Bs8)]
}

fn size_strategy(max: i64) -> impl Strategy<Value = i64> {
    prop_oneof![Just(-1i64), 1..=max]
}

fn config_strategy() -> impl Strategy<Value = Config> {
    (
        size_strategy(24),
        0..DELIMITERS.len(),
        size_strategy(120),
        0..DELIMITERS.len(),
    )
        .prop_map(|(word, wd, line, ld)| {
            Config::builder()
                .max_word_size(word)
                .word_delimiter(DELIMITERS[wd])
                .max_line_size(line)
                .line_delimiter(DELIMITERS[ld])
                .build()
                .unwrap()
        })
}

/// Drive the block encoder with bounded source chunks and destination slices.
fn encode_in_pieces(codec: &Bitspeak, data: &[u8], src_chunk: usize, dst_chunk: usize) -> String {
    let mut encoder = codec.new_encoder();
    let mut out = String::new();
    let mut buf = vec!['\0'; dst_chunk];
    let mut pos = 0;
    while pos < data.len() {
        let end = (pos + src_chunk).min(data.len());
        let before = encoder.read_count();
        let n = encoder.encode_block(&data[pos..end], &mut buf);
        pos += (encoder.read_count() - before) as usize;
        out.extend(&buf[..n]);
    }
    loop {
        match encoder.finish_block(&mut buf) {
            Finish::Wrote(n) => out.extend(&buf[..n]),
            Finish::NeedsCapacity => panic!("finish stalled with {dst_chunk} slots"),
            Finish::Done => return out,
        }
    }
}

/// Drive the block decoder the same way.
fn decode_in_pieces(codec: &Bitspeak, text: &str, src_chunk: usize, dst_chunk: usize) -> Vec<u8> {
    let chars: Vec<char> = text.chars().collect();
    let mut decoder = codec.new_decoder();
    let mut out = Vec::new();
    let mut buf = vec![0u8; dst_chunk];
    let mut pos = 0;
    while pos < chars.len() {
        let end = (pos + src_chunk).min(chars.len());
        let before = decoder.read_count();
        let n = decoder.decode_block(&chars[pos..end], &mut buf).unwrap();
        pos += (decoder.read_count() - before) as usize;
        out.extend_from_slice(&buf[..n]);
    }
    loop {
        match decoder.finish_block(&mut buf).unwrap() {
            Finish::Wrote(n) => out.extend_from_slice(&buf[..n]),
            Finish::NeedsCapacity => panic!("finish stalled with {dst_chunk} slots"),
            Finish::Done => return out,
        }
    }
}

proptest! {
    #[test]
    fn prop_encode_decode_roundtrip(
        data in proptest::collection::vec(any::<u8>(), 0..4096),
        format in format_strategy(),
        config in config_strategy(),
    ) {
        let codec = Bitspeak::new(format, config);
        let text = codec.encode(&data);
        prop_assert_eq!(codec.decode(&text).unwrap(), data);
    }

    #[test]
    fn prop_estimates_are_upper_bounds(
        data in proptest::collection::vec(any::<u8>(), 0..2048),
        format in format_strategy(),
        config in config_strategy(),
    ) {
        let codec = Bitspeak::new(format, config);
        let chars = codec.encode(&data).chars().count();
        prop_assert!(
            chars <= codec.estimate_encode_size(data.len()),
            "chars={} estimate={}",
            chars,
            codec.estimate_encode_size(data.len())
        );
        prop_assert!(data.len() <= codec.estimate_decode_size(chars));
    }

    #[test]
    fn prop_block_splits_do_not_change_output(
        data in proptest::collection::vec(any::<u8>(), 0..1024),
        format in format_strategy(),
        config in config_strategy(),
        src_chunk in 1usize..64,
        dst_chunk in 1usize..64,
    ) {
        let codec = Bitspeak::new(format, config);
        let text = codec.encode(&data);
        prop_assert_eq!(&encode_in_pieces(&codec, &data, src_chunk, dst_chunk), &text);
        prop_assert_eq!(decode_in_pieces(&codec, &text, src_chunk, dst_chunk), data);
    }

    #[test]
    fn prop_words_and_lines_respect_limits(
        data in proptest::collection::vec(any::<u8>(), 0..1024),
        format in format_strategy(),
        word in 1i64..16,
        line in 1i64..64,
    ) {
        let config = Config::builder()
            .max_word_size(word)
            .word_delimiter(" ")
            .max_line_size(line)
            .line_delimiter("\n")
            .build()
            .unwrap();
        let text = Bitspeak::new(format, config).encode(&data);
        if text.is_empty() {
            return Ok(());
        }
        for l in text.split('\n') {
            // A full line may still take the word delimiter that closed its last word.
            prop_assert!(l.chars().count() as i64 <= line + 1, "line {:?}", l);
            for w in l.trim_end_matches(' ').split(' ') {
                prop_assert!(!w.is_empty(), "empty word in {:?}", l);
                prop_assert!(w.chars().count() as i64 <= word, "word {:?}", w);
            }
        }
    }

    #[test]
    fn prop_decoding_garbage_never_panics(text in "\\PC{0,64}", format in format_strategy()) {
        let _ = Bitspeak::new(format, Config::default()).decode(&text);
    }
}

#[test]
#[ignore = "performance properties are workload and machine dependent"]
fn perf_property_roundtrip_not_pathological() {
    use rand::{Rng, SeedableRng, rngs::StdRng};
    use std::time::Instant;

    let mut rng = StdRng::seed_from_u64(0x5EED);
    let mut data = vec![0u8; 16 * 1024 * 1024];
    rng.fill(&mut data[..]);

    for codec in [Bitspeak::bs6(), Bitspeak::bs8()] {
        let t0 = Instant::now();
        let text = codec.encode(&data);
        let decoded = codec.decode(&text).unwrap();
        let dt = t0.elapsed();
        assert_eq!(decoded, data);
        assert!(dt.as_secs_f64() < 20.0, "{} took {:?}", codec.name(), dt);
    }
}
