//! Fuzz target for attribute key parsing.
//!
//! Keys come from admin-edited mapping tables, so parsing must never
//! panic whatever the input.
//!
//! Run with:
//! cargo +nightly fuzz run fuzz_attribute_key -- -max_total_time=600

#![no_main]

use ldapsync_profile::{parse_attribute_key, TargetReference};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(key) = std::str::from_utf8(data) {
        let target = TargetReference::parse(key);

        // Names are never empty, only absent
        if let Some(name) = &target.name {
            assert!(!name.is_empty());
        }

        // Both entry points agree
        let (category, name) = parse_attribute_key(key);
        assert_eq!(category, target.category.as_str());
        assert_eq!(name, target.name);

        // Parsing is deterministic
        assert_eq!(TargetReference::parse(key), target);
    }
});
