#![no_main]
use bitspeak::charset::{self, CharSet};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let text = String::from_utf8_lossy(data);
    let _ = charset::unescape(&text);

    // Rendering a parsed set and parsing it again gives the same set.
    if let Ok(set) = CharSet::parse(&text) {
        let rendered = set.to_string();
        let reparsed = CharSet::parse(&rendered).unwrap();
        assert_eq!(reparsed, set);
        for c in text.chars() {
            assert_eq!(set.contains(c), set.ranges().iter().any(|r| r.contains(c)));
        }
    }
});
