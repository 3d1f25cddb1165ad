#![no_main]
use libfuzzer_sys::fuzz_target;
use opus_stream::{OpusFile, ParseOptions};
use std::io::Cursor;

fuzz_target!(|data: &[u8]| {
    let options = ParseOptions {
        max_entries: Some(256),
        max_parameters: Some(1024),
    };
    let Ok(mut file) = OpusFile::from_reader_with(Cursor::new(data), options) else {
        return;
    };
    let entries = file.header().entries.clone();
    for entry in &entries {
        let _ = file.describe(entry);
        if entry.is_binary() && entry.length <= 1 << 20 {
            let _ = file.data_block(entry);
            let _ = file.axis_for(entry);
        }
    }
});
