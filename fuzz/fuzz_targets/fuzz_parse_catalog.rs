#![no_main]
use libfuzzer_sys::fuzz_target;

use docdiff_tools::model::SchemaCatalog;

/// Fuzz the schema catalog loaders, both formats.
fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let _ = SchemaCatalog::from_yaml_str(s);
        let _ = SchemaCatalog::from_json_str(s);
    }
});
