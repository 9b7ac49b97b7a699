//! Merging a `defineMetadata({...})` call into the decorator metadata.

use crate::target::{ClassProperty, TargetClass};

pub const SELECTOR: &str = "selector";
pub const EXPOSES: &str = "exposes";

/// A `key: value` entry of the `defineMetadata` object; `value` is the
/// initializer's source text, never re-evaluated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataEntry<'s> {
    pub key: String,
    pub value: &'s str,
}

/// Identifiers listed in an `exposes` value such as `[Math, formatDate]`.
pub fn parse_exposes(value: &str) -> Vec<&str> {
    value
        .split(',')
        .map(|item| item.trim_matches(|c: char| c == '[' || c == ']' || c.is_whitespace()))
        .filter(|item| !item.is_empty())
        .collect()
}

pub fn merge_metadata(class: &mut TargetClass, entries: &[MetadataEntry<'_>]) {
    for entry in entries {
        match entry.key.as_str() {
            SELECTOR => {
                // last writer wins, and moves to the end
                class.metadata.remove(SELECTOR);
                class.metadata.upsert(SELECTOR, entry.value);
            }
            EXPOSES => {
                for exposed in parse_exposes(entry.value) {
                    class.add_property(ClassProperty::initialized(exposed, exposed));
                }
            }
            key => class.metadata.upsert(key, entry.value),
        }
    }
}
