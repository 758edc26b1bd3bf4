#![no_main]

use arbitrary::Arbitrary;
use importfix_domain::{ModuleIdentity, OwnershipIndex, Sanitizer};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input {
    owners: Vec<(String, String)>,
    owner: Option<String>,
    text: String,
}

/// Module and header names as they appear on disk: no delimiters, no separators.
fn plain_name(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || "_.+-".contains(c))
}

fuzz_target!(|input: Input| {
    let index = OwnershipIndex::from_entries(
        input
            .owners
            .iter()
            .filter(|(h, m)| plain_name(h) && plain_name(m))
            .map(|(h, m)| (h.as_str(), m.as_str())),
    );
    let owner = input.owner.as_deref().map(ModuleIdentity::named);
    let sanitizer = Sanitizer::new(&index);

    let once = sanitizer.sanitize(&input.text, owner.as_ref());
    let twice = sanitizer.sanitize(&once.content, owner.as_ref());
    assert_eq!(once.content, twice.content);
    assert!(!twice.changed);
    assert_eq!(once.changed, once.content != input.text);
});
