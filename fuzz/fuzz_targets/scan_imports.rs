#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else { return };

    let mut last_end = 0;
    for occ in importfix_domain::scan(text) {
        // Spans are ordered, disjoint and cover exactly the reported raw text.
        assert!(occ.span.start >= last_end);
        assert_eq!(&text[occ.span.clone()], occ.raw);
        assert!(occ.line >= 1);
        last_end = occ.span.end;
    }
});
