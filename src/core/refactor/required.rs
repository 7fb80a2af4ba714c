//! Scan for `public required <Type> <Name> { ... }` property declarations.
//!
//! Read-only. Matches may span lines since the accessor body is `[^}]*`.

use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

/// One `required` property occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequiredProperty {
    /// Line number (1-indexed) where the match starts.
    pub line: usize,
    pub type_name: String,
    pub name: String,
    /// The matched declaration text.
    pub matched: String,
}

fn required_property_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"public\s+required\s+(\w+)\s+(\w+)\s*\{[^}]*\}").unwrap()
    })
}

pub fn contains_required_property(text: &str) -> bool {
    required_property_pattern().is_match(text)
}

/// All non-overlapping occurrences in source order.
pub fn find_required_properties(text: &str) -> Vec<RequiredProperty> {
    required_property_pattern()
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            Some(RequiredProperty {
                line: line_of_offset(text, whole.start()),
                type_name: caps[1].to_string(),
                name: caps[2].to_string(),
                matched: whole.as_str().to_string(),
            })
        })
        .collect()
}

fn line_of_offset(text: &str, offset: usize) -> usize {
    text[..offset].matches('\n').count() + 1
}
