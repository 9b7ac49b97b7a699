//! Rendering the target tree back to TypeScript.

use oxc_allocator::Allocator;
use oxc_codegen::{Codegen, CodegenOptions};
use oxc_parser::Parser;

use crate::error::NgCompileError;
use crate::promote::terminated;
use crate::target::{source_type, TargetClass, TargetFile};

const INDENT: &str = "  ";
const CLASS_PREFIX: &str = "export default class ";

fn push_block(out: &mut String, statements: &[String], depth: usize) {
    let indent = INDENT.repeat(depth);
    for statement in statements {
        out.push_str(&indent);
        out.push_str(statement);
        out.push('\n');
    }
}

fn render_imports(target: &TargetFile) -> String {
    let mut out = String::new();
    for import in target.imports() {
        out.push_str(&terminated(import));
        out.push('\n');
    }
    out
}

/// The decorator call without the leading `@`.
fn render_decorator_call(class: &TargetClass) -> String {
    if class.metadata.is_empty() {
        return format!("{}({{}})", class.decorator);
    }
    let entries = class
        .metadata
        .entries()
        .map(|(key, value)| format!("{INDENT}{key}: {value}"))
        .collect::<Vec<_>>();
    format!("{}({{\n{}\n}})", class.decorator, entries.join(",\n"))
}

fn render_class(class: &TargetClass) -> String {
    let mut out = format!("{CLASS_PREFIX}{} {{\n", class.name);

    for property in class.properties() {
        out.push_str(INDENT);
        if let Some(keyword) = property.scope.keyword() {
            out.push_str(keyword);
            out.push(' ');
        }
        out.push_str(&property.name);
        if let Some(initializer) = &property.initializer {
            out.push_str(" = ");
            out.push_str(initializer);
        }
        out.push_str(";\n");
    }
    if !class.properties().is_empty() {
        out.push('\n');
    }

    if class.constructor_body().is_empty() {
        out.push_str(&format!("{INDENT}constructor() {{}}\n"));
    } else {
        out.push_str(&format!("{INDENT}constructor() {{\n"));
        push_block(&mut out, class.constructor_body(), 2);
        out.push_str(&format!("{INDENT}}}\n"));
    }

    for method in class.methods() {
        out.push('\n');
        out.push_str(&format!("{INDENT}{}({}) {{\n", method.name, method.params));
        push_block(&mut out, &method.statements, 2);
        out.push_str(&format!("{INDENT}}}\n"));
    }

    out.push_str("}\n");
    out
}

/// Plain rendering with no formatting pass; statement text is emitted as it
/// was captured.
pub fn render(target: &TargetFile) -> String {
    format!(
        "{}\n@{}\n{}",
        render_imports(target),
        render_decorator_call(&target.class),
        render_class(&target.class)
    )
}

/// Re-parse `text` and print it with oxc.
fn reprint(file_name: &str, text: &str) -> Result<String, NgCompileError> {
    let allocator = Allocator::default();
    let ret = Parser::new(&allocator, text, source_type()).parse();

    if ret.panicked || !ret.errors.is_empty() {
        let message = ret
            .errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ");
        return Err(NgCompileError::OutputSyntax {
            file: file_name.to_string(),
            message,
        });
    }

    let options = CodegenOptions {
        single_quote: true,
        ..CodegenOptions::default()
    };
    Ok(Codegen::new().with_options(options).build(&ret.program).code)
}

/// Formatted rendering. oxc prints a decorated `export default class` with
/// the decorator after `export default`, so the decorator call is printed on
/// its own and placed in front of the class declaration. The result always
/// ends with a newline.
pub fn normalize(target: &TargetFile) -> Result<String, NgCompileError> {
    let file_name = target.file_name.as_str();
    let body = reprint(
        file_name,
        &format!("{}\n{}", render_imports(target), render_class(&target.class)),
    )?;
    let decorator = reprint(file_name, &format!("{};", render_decorator_call(&target.class)))?;
    let decorator = decorator.trim_end();
    let decorator = decorator.strip_suffix(';').unwrap_or(decorator);

    let class_start = body
        .match_indices(CLASS_PREFIX)
        .map(|(index, _)| index)
        .find(|&index| index == 0 || body[..index].ends_with('\n'))
        .ok_or_else(|| NgCompileError::OutputSyntax {
            file: file_name.to_string(),
            message: "formatted output has no default class export".to_string(),
        })?;

    let mut code = format!(
        "{}@{}\n{}",
        &body[..class_start],
        decorator,
        &body[class_start..]
    );
    if !code.ends_with('\n') {
        code.push('\n');
    }
    Ok(code)
}

/// Production builds skip the formatting pass.
pub fn serialize(target: &TargetFile, is_prod: bool) -> Result<String, NgCompileError> {
    if is_prod {
        Ok(render(target))
    } else {
        normalize(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::names::names;
    use crate::scaffold::{synthesize_scaffold, NgKind};
    use crate::target::{ClassMethod, ClassProperty};

    fn directive() -> TargetFile {
        let scaffold = synthesize_scaffold(&names("tip"), "", "", NgKind::Directive);
        TargetFile::from_scaffold("tip.ng", &scaffold, NgKind::Directive).unwrap()
    }

    #[test]
    fn test_render_scaffold_round_trips() {
        let rendered = render(&directive());
        assert_eq!(
            rendered,
            "import { Directive } from '@angular/core';\n\n@Directive({\n  standalone: true,\n  selector: 'tip,Tip,TIP'\n})\nexport default class AnalogNgEntity {\n  constructor() {}\n}\n"
        );
    }

    #[test]
    fn test_render_members_in_layout_order() {
        let mut target = directive();
        target.class.add_method(ClassMethod {
            name: "ngOnInit".to_string(),
            params: String::new(),
            statements: vec!["this.onInit();".to_string()],
        });
        target.class.add_property(ClassProperty::declared("x"));
        target.class.add_constructor_statement("const x = 1;");

        let rendered = render(&target);
        let property = rendered.find("protected x;").unwrap();
        let constructor = rendered.find("constructor() {\n    const x = 1;").unwrap();
        let method = rendered.find("ngOnInit() {\n    this.onInit();\n  }").unwrap();
        assert!(property < constructor && constructor < method);
    }

    #[test]
    fn test_normalize_keeps_decorator_before_export() {
        let out = normalize(&directive()).unwrap();
        assert!(out.ends_with('\n'));
        let decorator = out.find("@Directive(").unwrap();
        let class = out.find("export default class AnalogNgEntity").unwrap();
        assert!(decorator < class);
        assert!(!out.contains("export default @"));
        assert!(out.contains("'tip,Tip,TIP'"));
        assert!(out.starts_with("import { Directive } from '@angular/core';"));
    }

    #[test]
    fn test_reprint_rejects_broken_output() {
        let err = reprint("tip.ng", "export default class {").unwrap_err();
        assert!(matches!(err, NgCompileError::OutputSyntax { .. }));
    }
}
