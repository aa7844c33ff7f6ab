#![no_main]
use libfuzzer_sys::fuzz_target;

/// Fuzz the XML document parser.
///
/// Feeds arbitrary UTF-8 strings to `parse_document_str`; malformed markup
/// must come back as an error, never a panic.
fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let _ = docdiff_tools::parsers::parse_document_str(s);
    }
});
