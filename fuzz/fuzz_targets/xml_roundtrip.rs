#![no_main]
use libfuzzer_sys::fuzz_target;
use xedit::{parse, print};

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(doc) = parse(s) {
            assert_eq!(print(&doc), s);
        }
    }
});
