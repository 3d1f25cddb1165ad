#![no_main]
use libfuzzer_sys::fuzz_target;
use opus_stream::parsing::{read_parameter_list, ParameterRecord};
use std::io::Cursor;

fuzz_target!(|data: &[u8]| {
    // Single record from a slice
    let _ = ParameterRecord::parse(data);

    // Whole list from a cursor; never reads past END
    let mut cursor = Cursor::new(data);
    if let Ok(records) = read_parameter_list(&mut cursor) {
        assert!(records.last().is_some_and(|r| r.is_end()));
        assert!(cursor.position() as usize <= data.len());
    }
});
