//! Section extraction for `.ng` files.
//!
//! Splits the raw authoring text into its `<script lang="ts">`, `<template>`
//! and `<style>` blocks. Only the first block of each kind is used.

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::NgCompileError;

lazy_static! {
    static ref SCRIPT_TAG_RE: Regex =
        Regex::new(r#"(?i)<script lang="ts">([\s\S]*?)</script>"#).unwrap();
    static ref TEMPLATE_TAG_RE: Regex = Regex::new(r"(?i)<template>([\s\S]*?)</template>").unwrap();
    static ref STYLE_TAG_RE: Regex = Regex::new(r"(?i)<style>([\s\S]*?)</style>").unwrap();
}

/// An unparsed `.ng` file as handed over by the build pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawComponentSource {
    pub file_name: String,
    pub content: String,
}

impl RawComponentSource {
    pub fn new(file_name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedSections {
    pub script: String,
    pub template: String,
    pub style: String,
}

fn first_block(re: &Regex, content: &str) -> String {
    re.captures(content)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default()
}

pub fn extract_sections(source: &RawComponentSource) -> Result<ExtractedSections, NgCompileError> {
    let sections = ExtractedSections {
        script: first_block(&SCRIPT_TAG_RE, &source.content),
        template: first_block(&TEMPLATE_TAG_RE, &source.content),
        style: first_block(&STYLE_TAG_RE, &source.content),
    };

    if sections.script.is_empty() && sections.template.is_empty() {
        return Err(NgCompileError::MissingSections {
            file: source.file_name.clone(),
        });
    }

    Ok(sections)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(content: &str) -> Result<ExtractedSections, NgCompileError> {
        extract_sections(&RawComponentSource::new("test.ng", content))
    }

    #[test]
    fn test_extracts_all_sections_trimmed() {
        let sections = extract(
            r#"
<script lang="ts">
  const x = 1;
</script>

<template>
  <p>{{ x }}</p>
</template>

<style>
  p { color: red; }
</style>
"#,
        )
        .unwrap();

        assert_eq!(sections.script, "const x = 1;");
        assert_eq!(sections.template, "<p>{{ x }}</p>");
        assert_eq!(sections.style, "p { color: red; }");
    }

    #[test]
    fn test_tags_are_case_insensitive() {
        let sections = extract(r#"<SCRIPT LANG="TS">let a = 1;</SCRIPT><Template>hi</Template>"#)
            .unwrap();
        assert_eq!(sections.script, "let a = 1;");
        assert_eq!(sections.template, "hi");
        assert!(sections.style.is_empty());
    }

    #[test]
    fn test_only_first_block_is_used() {
        let sections = extract("<template>first</template><template>second</template>").unwrap();
        assert_eq!(sections.template, "first");
    }

    #[test]
    fn test_script_without_ts_lang_is_not_a_script_section() {
        let err = extract("<script>const x = 1;</script>").unwrap_err();
        assert!(matches!(err, NgCompileError::MissingSections { .. }));
    }

    #[test]
    fn test_missing_script_and_template_fails() {
        let err = extract("<style>p {}</style>").unwrap_err();
        assert_eq!(
            err,
            NgCompileError::MissingSections {
                file: "test.ng".to_string()
            }
        );
    }
}
