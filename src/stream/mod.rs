// Stream adapters over the block codec.
//
// The block API is pull-free: callers hand in slices and get counts back.
// These adapters own a staging buffer and a cursor so the codec can sit
// behind ordinary reader interfaces:
//   - EncodeReader: `Read` (bytes) -> `CharRead` (symbols)
//   - DecodeReader: `CharRead` (symbols) -> `Read` (bytes)
// Chaining them gives an in-memory round trip without intermediate buffers.

pub mod chars;
pub mod decoder;
pub mod encoder;

pub use chars::{CharRead, StrChars, Utf8Chars};
pub use decoder::DecodeReader;
pub use encoder::EncodeReader;

/// Default staging buffer size (bytes for encoding, chars for decoding).
pub const DEFAULT_STAGING_SIZE: usize = 4096;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{Decoder, Encoder, Format};
    use crate::config::Config;
    use std::io::Read;
    use std::sync::Arc;

    #[test]
    fn chained_adapters_roundtrip() {
        let data: Vec<u8> = (0..5000u32).map(|i| (i * 7 % 251) as u8).collect();
        let config = Arc::new(Config::default());
        for format in [Format::Bs6, Format::Bs8] {
            let encoder = Encoder::new(format, Arc::clone(&config));
            let chars = EncodeReader::with_capacity(13, &data[..], encoder).unwrap();
            let mut bytes =
                DecodeReader::with_capacity(5, chars, Decoder::new(format, config.clone()))
                    .unwrap();
            let mut out = Vec::new();
            bytes.read_to_end(&mut out).unwrap();
            assert_eq!(out, data, "{format}");
        }
    }
}
