//! Fuzz target for source token resolution.
//!
//! Resolves arbitrary tokens against a fixed entry that carries text,
//! binary and multi-valued attributes.
//!
//! Run with:
//! cargo +nightly fuzz run fuzz_token_resolver -- -max_total_time=600

#![no_main]

use ldapsync_directory::DirectoryRecord;
use ldapsync_profile::TokenResolver;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(token) = std::str::from_utf8(data) else {
        return;
    };

    let record = DirectoryRecord::new("cn=Fuzz,dc=example,dc=com")
        .with("cn", "Fuzz")
        .with("objectGUID", vec![0u8, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15])
        .with("thumbnailPhoto", vec![0xffu8, 0xd8, 0x00])
        .with_values("mail", ["a@example.com", "b@example.com"]);

    let resolver = TokenResolver::new();
    let value = resolver.resolve(&record, token);

    // Templates always compose to a single value
    if TokenResolver::is_template(token) {
        assert!(value.as_ref().is_some_and(|v| v.as_str().is_some()));
    }

    // Resolution is deterministic
    assert_eq!(resolver.resolve(&record, token), value);

    let _ = TokenResolver::referenced_attributes(token);
});
