#![no_main]
use libfuzzer_sys::fuzz_target;
use opus_stream::parsing::FileHeader;
use std::io::Cursor;

fuzz_target!(|data: &[u8]| {
    let parsed = FileHeader::parse(data);
    let read = FileHeader::read(&mut Cursor::new(data));

    // Both decoders must agree on success.
    if let (Ok(a), Ok(b)) = (&parsed, &read) {
        assert_eq!(a, b);
    }
    assert_eq!(parsed.is_ok(), read.is_ok());

    if let Ok(header) = parsed {
        for entry in &header.entries {
            let _ = entry.kind();
            let _ = header.find_parameter_list_for(entry);
        }
    }
});
