//! Adds default imports of other `.ng` files to the component's `imports`.

use oxc_allocator::Allocator;
use oxc_ast::ast::{ArrayExpressionElement, Expression};
use oxc_parser::Parser;
use oxc_span::GetSpan;

use crate::scaffold::NgKind;
use crate::target::{source_type, span_text, TargetFile};

pub const IMPORTS: &str = "imports";

/// Rebuilds an array literal from its parsed elements with `joined` appended.
/// Comments and holes inside the original literal are dropped. `None` when
/// `array` is not an array literal.
fn append_to_array(array: &str, joined: &str) -> Option<String> {
    let allocator = Allocator::default();
    let Ok(Expression::ArrayExpression(literal)) =
        Parser::new(&allocator, array, source_type()).parse_expression()
    else {
        return None;
    };

    let mut elements = literal
        .elements
        .iter()
        .filter(|element| !matches!(element, ArrayExpressionElement::Elision(_)))
        .map(|element| span_text(array, element.span()))
        .collect::<Vec<_>>();
    elements.push(joined);
    Some(format!("[{}]", elements.join(", ")))
}

/// Directives have no `imports`; for components the recorded identifiers
/// keep their source order.
pub fn aggregate_imports(target: &mut TargetFile, declarations: &[String]) {
    if target.kind != NgKind::Component {
        return;
    }

    let joined = declarations
        .iter()
        .filter(|d| !d.is_empty())
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");

    let metadata = &mut target.class.metadata;
    match metadata.get(IMPORTS).map(str::to_string) {
        Some(existing) => {
            if joined.is_empty() {
                return;
            }
            if let Some(merged) = append_to_array(&existing, &joined) {
                metadata.upsert(IMPORTS, merged);
            }
        }
        None => metadata.upsert(IMPORTS, format!("[{}]", joined)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::names::names;
    use crate::scaffold::synthesize_scaffold;

    fn target(kind: NgKind) -> TargetFile {
        let template = if kind == NgKind::Component { "<p></p>" } else { "" };
        let scaffold = synthesize_scaffold(&names("host"), template, "", kind);
        TargetFile::from_scaffold("host.ng", &scaffold, kind).unwrap()
    }

    #[test]
    fn test_creates_imports_in_order_skipping_empty() {
        let mut t = target(NgKind::Component);
        aggregate_imports(
            &mut t,
            &["Child".to_string(), String::new(), "Other".to_string()],
        );
        assert_eq!(t.class.metadata.get("imports"), Some("[Child, Other]"));
    }

    #[test]
    fn test_creates_empty_imports_for_components() {
        let mut t = target(NgKind::Component);
        aggregate_imports(&mut t, &[]);
        assert_eq!(t.class.metadata.get("imports"), Some("[]"));
    }

    #[test]
    fn test_appends_to_existing_array() {
        let mut t = target(NgKind::Component);
        t.class.metadata.upsert("imports", "[NgIf, ]");
        aggregate_imports(&mut t, &["Child".to_string()]);
        assert_eq!(t.class.metadata.get("imports"), Some("[NgIf, Child]"));

        let mut empty = target(NgKind::Component);
        empty.class.metadata.upsert("imports", "[]");
        aggregate_imports(&mut empty, &["Child".to_string()]);
        assert_eq!(empty.class.metadata.get("imports"), Some("[Child]"));
    }

    #[test]
    fn test_appends_after_trailing_comment() {
        let mut t = target(NgKind::Component);
        t.class.metadata.upsert("imports", "[NgIf, // shared\n]");
        aggregate_imports(&mut t, &["Child".to_string(), "Other".to_string()]);
        assert_eq!(t.class.metadata.get("imports"), Some("[NgIf, Child, Other]"));

        let mut block = target(NgKind::Component);
        block.class.metadata.upsert("imports", "[/* common */ NgIf, ...SHARED]");
        aggregate_imports(&mut block, &["Child".to_string()]);
        assert_eq!(block.class.metadata.get("imports"), Some("[NgIf, ...SHARED, Child]"));
    }

    #[test]
    fn test_non_array_imports_are_left_alone() {
        let mut t = target(NgKind::Component);
        t.class.metadata.upsert("imports", "SHARED");
        aggregate_imports(&mut t, &["Child".to_string()]);
        assert_eq!(t.class.metadata.get("imports"), Some("SHARED"));
    }

    #[test]
    fn test_directives_get_no_imports() {
        let mut t = target(NgKind::Directive);
        aggregate_imports(&mut t, &["Child".to_string()]);
        assert!(t.class.metadata.get("imports").is_none());
    }
}
