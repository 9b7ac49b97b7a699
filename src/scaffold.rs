//! Scaffold synthesis: the minimal decorated class every `.ng` file starts from.

use crate::names::NamingVariants;

pub const ENTITY_CLASS_NAME: &str = "AnalogNgEntity";
pub const ANGULAR_CORE: &str = "@angular/core";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NgKind {
    Component,
    Directive,
}

impl NgKind {
    /// A template makes a component; a script-only file is a directive.
    pub fn for_template(template: &str) -> Self {
        if template.is_empty() {
            NgKind::Directive
        } else {
            NgKind::Component
        }
    }

    pub fn decorator_name(&self) -> &'static str {
        match self {
            NgKind::Component => "Component",
            NgKind::Directive => "Directive",
        }
    }
}

/// Escape text so it survives verbatim inside a template literal.
fn escape_template_literal(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('`', "\\`")
        .replace("${", "\\${")
}

/// Style rules are inlined in front of the template, on a single line.
pub fn inline_template(template: &str, style: &str) -> String {
    if style.is_empty() {
        template.to_string()
    } else {
        format!("<style>{}</style>\n{}", style.replace('\n', ""), template)
    }
}

pub fn synthesize_scaffold(
    names: &NamingVariants,
    template: &str,
    style: &str,
    kind: NgKind,
) -> String {
    let decorator = kind.decorator_name();
    let mut metadata = vec![
        "standalone: true".to_string(),
        format!("selector: '{}'", names.selector()),
    ];

    let core_import = match kind {
        NgKind::Component => {
            metadata.push("changeDetection: ChangeDetectionStrategy.OnPush".to_string());
            metadata.push(format!(
                "template: `{}`",
                escape_template_literal(&inline_template(template, style))
            ));
            format!(
                "import {{ {}, ChangeDetectionStrategy }} from '{}';",
                decorator, ANGULAR_CORE
            )
        }
        NgKind::Directive => format!("import {{ {} }} from '{}';", decorator, ANGULAR_CORE),
    };

    format!(
        "{core_import}\n\n@{decorator}({{\n  {metadata}\n}})\nexport default class {ENTITY_CLASS_NAME} {{\n  constructor() {{}}\n}}\n",
        metadata = metadata.join(",\n  "),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::names::names;

    #[test]
    fn test_kind_follows_template_presence() {
        assert_eq!(NgKind::for_template("<p></p>"), NgKind::Component);
        assert_eq!(NgKind::for_template(""), NgKind::Directive);
    }

    #[test]
    fn test_component_scaffold() {
        let scaffold = synthesize_scaffold(&names("hello"), "<p>hi</p>", "", NgKind::Component);
        assert!(scaffold.starts_with(
            "import { Component, ChangeDetectionStrategy } from '@angular/core';"
        ));
        assert!(scaffold.contains("@Component({"));
        assert!(scaffold.contains("standalone: true"));
        assert!(scaffold.contains("selector: 'hello,Hello,HELLO'"));
        assert!(scaffold.contains("changeDetection: ChangeDetectionStrategy.OnPush"));
        assert!(scaffold.contains("template: `<p>hi</p>`"));
        assert!(scaffold.contains("export default class AnalogNgEntity {"));
        assert!(scaffold.contains("constructor() {}"));
    }

    #[test]
    fn test_directive_scaffold_has_no_template() {
        let scaffold = synthesize_scaffold(&names("focus"), "", "", NgKind::Directive);
        assert!(scaffold.starts_with("import { Directive } from '@angular/core';"));
        assert!(scaffold.contains("@Directive({"));
        assert!(!scaffold.contains("template:"));
        assert!(!scaffold.contains("changeDetection"));
    }

    #[test]
    fn test_style_is_flattened_before_template() {
        assert_eq!(
            inline_template("<p>x</p>", "p {\n  color: red;\n}"),
            "<style>p {  color: red;}</style>\n<p>x</p>"
        );
    }

    #[test]
    fn test_template_literal_is_escaped() {
        let scaffold = synthesize_scaffold(&names("a"), "<p>`${x}`</p>", "", NgKind::Component);
        assert!(scaffold.contains(r"template: `<p>\`\${x}\`</p>`"));
    }
}
