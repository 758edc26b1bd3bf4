#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else { return };

    if let Ok(descriptor) = importfix_types::descriptor::ModuleDescriptor::from_json(s) {
        let _ = descriptor.canonical_name();
    }
    let _ = importfix_types::patch::parse_patch_document(s);
});
