//! Identifier variants for a component name.
//!
//! Mirrors the Nx devkit `names()` helper so selectors derived here match the
//! ones the rest of an Nx/Analog workspace generates.

use lazy_static::lazy_static;
use regex::{Captures, Regex};

lazy_static! {
    static ref SEPARATOR_RUN_RE: Regex = Regex::new(r"[^a-zA-Z0-9]+(.)?").unwrap();
    static ref NON_ALNUM_RE: Regex = Regex::new(r"[^a-zA-Z0-9]").unwrap();
    static ref CASE_BOUNDARY_RE: Regex = Regex::new(r"([a-z0-9])([A-Z])").unwrap();
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamingVariants {
    pub file_name: String,
    pub class_name: String,
    pub constant_name: String,
    pub property_name: String,
}

impl NamingVariants {
    /// `file-name,ClassName,CONSTANT_NAME`, the scaffold's default selector.
    pub fn selector(&self) -> String {
        format!(
            "{},{},{}",
            self.file_name, self.class_name, self.constant_name
        )
    }
}

pub fn names(identifier: &str) -> NamingVariants {
    let property_name = to_property_name(identifier);
    NamingVariants {
        file_name: to_file_name(identifier),
        class_name: capitalize(&property_name),
        constant_name: to_constant_name(identifier),
        property_name,
    }
}

/// The component identifier of a path: its last `/` segment up to the first `.`.
pub fn component_identifier(file_name: &str) -> Option<&str> {
    let last_segment = file_name.rsplit('/').next()?;
    let stem = last_segment.split('.').next()?;
    if stem.is_empty() {
        None
    } else {
        Some(stem)
    }
}

fn to_property_name(s: &str) -> String {
    let joined = SEPARATOR_RUN_RE.replace_all(s, |caps: &Captures| {
        caps.get(1)
            .map(|m| m.as_str().to_uppercase())
            .unwrap_or_default()
    });
    let cleaned = NON_ALNUM_RE.replace_all(&joined, "");
    lowercase_first(&cleaned)
}

fn to_file_name(s: &str) -> String {
    let hyphenated = CASE_BOUNDARY_RE.replace_all(s, "$1-$2").to_lowercase();
    hyphenated
        .chars()
        .enumerate()
        .map(|(i, c)| match c {
            '_' if i == 0 => c,
            ' ' | '_' => '-',
            _ => c,
        })
        .collect()
}

fn to_constant_name(s: &str) -> String {
    let normalized = if s.to_uppercase() == s {
        s.to_lowercase()
    } else {
        s.to_string()
    };
    let file_name = to_file_name(&to_property_name(&normalized));
    NON_ALNUM_RE
        .replace_all(&file_name, "_")
        .to_uppercase()
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn lowercase_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) if first.is_ascii_uppercase() => {
            first.to_ascii_lowercase().to_string() + chars.as_str()
        }
        Some(_) => s.to_string(),
        None => String::new(),
    }
}
