use bitspeak::io::{decode_file, encode_file};
use bitspeak::{Bitspeak, Config, Format};
use std::io::{Read, Seek, Write};
use tempfile::NamedTempFile;

#[test]
#[ignore = "large file test is opt-in due runtime and disk requirements"]
fn sparse_file_roundtrip() {
    const SIZE: u64 = 256 * 1024 * 1024;

    let mut input = NamedTempFile::new().unwrap();
    let encoded = NamedTempFile::new().unwrap();
    let output = NamedTempFile::new().unwrap();

    // Sparse file with a few touched blocks.
    input.as_file_mut().set_len(SIZE).unwrap();
    for (off, block) in [(64 * 1024, &b"first-block"[..]), (SIZE / 2, &b"middle-chunk"[..])] {
        input
            .as_file_mut()
            .seek(std::io::SeekFrom::Start(off))
            .unwrap();
        input.as_file_mut().write_all(block).unwrap();
    }

    for codec in [Bitspeak::bs6(), Bitspeak::bs8()] {
        let enc = encode_file(&codec, input.path(), encoded.path()).unwrap();
        assert_eq!(enc.input_size, SIZE);
        assert!(enc.chars <= codec.estimate_encode_size(SIZE as usize) as u64);

        let dec = decode_file(&codec, encoded.path(), output.path()).unwrap();
        assert_eq!(dec.output_size, SIZE);
        assert_eq!(dec.output_sha256, enc.input_sha256);

        let mut out_f = std::fs::File::open(output.path()).unwrap();
        let mut in_f = std::fs::File::open(input.path()).unwrap();
        for off in [0u64, 64 * 1024, SIZE / 2, SIZE - 32] {
            out_f.seek(std::io::SeekFrom::Start(off)).unwrap();
            in_f.seek(std::io::SeekFrom::Start(off)).unwrap();
            let mut ob = [0u8; 32];
            let mut ib = [0u8; 32];
            out_f.read_exact(&mut ob).unwrap();
            in_f.read_exact(&mut ib).unwrap();
            assert_eq!(ob, ib, "{}: mismatch at offset {off}", codec.name());
        }
    }
}

#[test]
fn edge_case_matrix() {
    let cases: Vec<&[u8]> = vec![
        b"",
        b"\0",
        b"\xFF",
        b"\0\0\0\0\0",
        b"\xFF\xFF\xFF\xFF\xFF",
        b"\xAA\x55\xAA\x55",
    ];
    let configs = [
        Config::default(),
        Config::unlimited(),
        Config::builder()
            .max_word_size(1)
            .max_line_size(1)
            .build()
            .unwrap(),
    ];

    for data in cases {
        for config in &configs {
            for format in [Format::Bs6, Format::Bs8] {
                let input = NamedTempFile::new().unwrap();
                let encoded = NamedTempFile::new().unwrap();
                let output = NamedTempFile::new().unwrap();
                std::fs::write(input.path(), data).unwrap();

                let codec = Bitspeak::new(format, config.clone());
                encode_file(&codec, input.path(), encoded.path()).unwrap();
                decode_file(&codec, encoded.path(), output.path()).unwrap();
                assert_eq!(std::fs::read(output.path()).unwrap(), data, "{format}");
            }
        }
    }
}
