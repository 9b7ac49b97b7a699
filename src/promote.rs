//! Declaration promotion.
//!
//! The script section is parsed with oxc and each top-level statement is
//! classified into a [`ScriptItem`]. Items are then applied to the target
//! class in source order: locals become protected properties that the
//! constructor initializes, lifecycle hooks become methods, and
//! `defineMetadata` feeds the decorator.

use oxc_allocator::Allocator;
use oxc_ast::ast::{
    Argument, ArrowFunctionExpression, BindingPattern, CallExpression, Declaration, Expression,
    Function, ImportDeclarationSpecifier, ObjectPropertyKind, PropertyKind, Statement,
    VariableDeclaration,
};
use oxc_parser::Parser;
use oxc_span::GetSpan;
use tracing::debug;

use crate::error::NgCompileError;
use crate::metadata::{merge_metadata, MetadataEntry};
use crate::target::{source_type, span_text, ClassMethod, ClassProperty, TargetFile};

pub const NG_EXTENSION: &str = ".ng";
pub const DEFINE_METADATA: &str = "defineMetadata";
pub const ON_INIT: &str = "onInit";
pub const NG_ON_INIT: &str = "ngOnInit";

// ═══════════════════════════════════════════════════════════════════════════════
// SCRIPT ITEMS
// ═══════════════════════════════════════════════════════════════════════════════

/// One top-level statement of the script section, borrowed from its text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptItem<'s> {
    Import {
        text: &'s str,
        default_import: Option<&'s str>,
        from_ng_file: bool,
    },
    VariableDecl {
        keyword: &'static str,
        name: &'s str,
        declarator: &'s str,
        is_function: bool,
    },
    FunctionDecl {
        name: &'s str,
        text: &'s str,
    },
    DefineMetadata(Vec<MetadataEntry<'s>>),
    OnInit {
        is_async: bool,
        statements: Vec<String>,
    },
    Call {
        text: &'s str,
    },
    Other {
        text: &'s str,
    },
}

/// Parse the script section and classify its top-level statements.
pub fn classify_script<'s>(
    file_name: &str,
    script: &'s str,
) -> Result<Vec<ScriptItem<'s>>, NgCompileError> {
    let allocator = Allocator::default();
    let ret = Parser::new(&allocator, script, source_type()).parse();

    if ret.panicked || !ret.errors.is_empty() {
        let message = ret
            .errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ");
        return Err(NgCompileError::ScriptSyntax {
            file: file_name.to_string(),
            message,
        });
    }

    ret.program
        .body
        .iter()
        .map(|stmt| classify_statement(file_name, script, stmt))
        .collect()
}

fn classify_statement<'s>(
    file_name: &str,
    script: &'s str,
    stmt: &Statement,
) -> Result<ScriptItem<'s>, NgCompileError> {
    let item = match stmt {
        Statement::ImportDeclaration(import) => {
            let default_import = import.specifiers.as_ref().and_then(|specifiers| {
                specifiers.iter().find_map(|specifier| match specifier {
                    ImportDeclarationSpecifier::ImportDefaultSpecifier(s) => {
                        Some(span_text(script, s.local.span))
                    }
                    _ => None,
                })
            });
            ScriptItem::Import {
                text: span_text(script, import.span),
                default_import,
                from_ng_file: import.source.value.as_str().ends_with(NG_EXTENSION),
            }
        }
        Statement::VariableDeclaration(decl) => classify_variable(file_name, script, decl)?,
        Statement::FunctionDeclaration(func) if func.body.is_some() => {
            classify_function(file_name, script, func)?
        }
        // `export` is dropped: the declaration is re-declared inside the constructor.
        Statement::ExportNamedDeclaration(export) => match &export.declaration {
            Some(Declaration::VariableDeclaration(decl)) => {
                classify_variable(file_name, script, decl)?
            }
            Some(Declaration::FunctionDeclaration(func)) if func.body.is_some() => {
                classify_function(file_name, script, func)?
            }
            _ => ScriptItem::Other {
                text: span_text(script, export.span),
            },
        },
        Statement::ExpressionStatement(expr_stmt) => match &expr_stmt.expression {
            Expression::CallExpression(call) => {
                classify_call(file_name, script, call, span_text(script, expr_stmt.span))?
            }
            _ => ScriptItem::Other {
                text: span_text(script, expr_stmt.span),
            },
        },
        other => ScriptItem::Other {
            text: span_text(script, other.span()),
        },
    };

    Ok(item)
}

fn classify_variable<'s>(
    file_name: &str,
    script: &'s str,
    decl: &VariableDeclaration,
) -> Result<ScriptItem<'s>, NgCompileError> {
    let unsupported = |detail: String| NgCompileError::UnsupportedDeclaration {
        file: file_name.to_string(),
        detail,
    };

    let declarator = match decl.declarations.first() {
        Some(declarator) if decl.declarations.len() == 1 => declarator,
        _ => {
            return Err(unsupported(format!(
                "expected a single declarator in `{}`",
                span_text(script, decl.span)
            )))
        }
    };

    let BindingPattern::BindingIdentifier(id) = &declarator.id else {
        return Err(unsupported(format!(
            "destructuring is not supported in `{}`",
            span_text(script, decl.span)
        )));
    };

    let Some(init) = &declarator.init else {
        return Ok(ScriptItem::Other {
            text: span_text(script, decl.span),
        });
    };

    Ok(ScriptItem::VariableDecl {
        keyword: decl.kind.as_str(),
        name: span_text(script, id.span),
        declarator: span_text(script, declarator.span),
        is_function: matches!(
            init,
            Expression::ArrowFunctionExpression(_) | Expression::FunctionExpression(_)
        ),
    })
}

fn classify_function<'s>(
    file_name: &str,
    script: &'s str,
    func: &Function,
) -> Result<ScriptItem<'s>, NgCompileError> {
    let id = func
        .id
        .as_ref()
        .ok_or_else(|| NgCompileError::UnsupportedDeclaration {
            file: file_name.to_string(),
            detail: "anonymous function declaration".to_string(),
        })?;
    Ok(ScriptItem::FunctionDecl {
        name: span_text(script, id.span),
        text: span_text(script, func.span),
    })
}

fn classify_call<'s>(
    file_name: &str,
    script: &'s str,
    call: &CallExpression,
    statement_text: &'s str,
) -> Result<ScriptItem<'s>, NgCompileError> {
    let callee = span_text(script, call.callee.span());

    if callee == DEFINE_METADATA {
        return classify_define_metadata(file_name, script, call).map(ScriptItem::DefineMetadata);
    }

    if callee == ON_INIT {
        if let (1, Some(Argument::ArrowFunctionExpression(arrow))) =
            (call.arguments.len(), call.arguments.first())
        {
            return Ok(classify_on_init(script, arrow));
        }
    }

    Ok(ScriptItem::Call {
        text: statement_text,
    })
}

fn classify_define_metadata<'s>(
    file_name: &str,
    script: &'s str,
    call: &CallExpression,
) -> Result<Vec<MetadataEntry<'s>>, NgCompileError> {
    let invalid = |detail: &str| NgCompileError::InvalidDefineMetadata {
        file: file_name.to_string(),
        detail: detail.to_string(),
    };

    let object = match call.arguments.first() {
        Some(Argument::ObjectExpression(object)) if call.arguments.len() == 1 => object,
        _ => return Err(invalid("expected exactly one object literal argument")),
    };

    let mut entries = Vec::with_capacity(object.properties.len());
    for property in &object.properties {
        let ObjectPropertyKind::ObjectProperty(p) = property else {
            return Err(invalid("spread entries are not supported"));
        };
        if p.method || p.kind != PropertyKind::Init {
            return Err(invalid("method and accessor entries are not supported"));
        }
        let key = p
            .key
            .static_name()
            .ok_or_else(|| invalid("computed keys are not supported"))?;
        entries.push(MetadataEntry {
            key: key.to_string(),
            value: span_text(script, p.value.span()),
        });
    }

    Ok(entries)
}

fn classify_on_init<'s>(script: &'s str, arrow: &ArrowFunctionExpression) -> ScriptItem<'s> {
    let statements = arrow
        .body
        .statements
        .iter()
        .map(|stmt| {
            let text = span_text(script, stmt.span());
            if arrow.expression {
                terminated(text)
            } else {
                text.to_string()
            }
        })
        .collect();

    ScriptItem::OnInit {
        is_async: arrow.r#async,
        statements,
    }
}

/// Statement text with a trailing `;` unless it already ends a statement.
pub(crate) fn terminated(text: &str) -> String {
    let trimmed = text.trim_end();
    if trimmed.ends_with(';') || trimmed.ends_with('}') {
        trimmed.to_string()
    } else {
        format!("{};", trimmed)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// PROMOTION
// ═══════════════════════════════════════════════════════════════════════════════

/// Adds `protected name;`, re-declares the local in the constructor and
/// assigns it to the property. Functions are bound so `this` keeps pointing
/// at the instance when the property is passed around.
fn promote_declaration(target: &mut TargetFile, name: &str, redeclaration: String, bind: bool) {
    let class = &mut target.class;
    class.add_property(ClassProperty::declared(name));
    class.add_constructor_statement(redeclaration);
    class.add_constructor_statement(if bind {
        format!("this.{name} = {name}.bind(this);")
    } else {
        format!("this.{name} = {name};")
    });
}

/// Apply classified script items to the target in source order. Returns the
/// default imports of `.ng` modules, in order, for import aggregation.
pub fn promote(target: &mut TargetFile, items: &[ScriptItem<'_>]) -> Vec<String> {
    let mut ng_imports = Vec::new();

    for item in items {
        match item {
            ScriptItem::Import {
                text,
                default_import,
                from_ng_file,
            } => {
                if *from_ng_file {
                    ng_imports.push(default_import.unwrap_or_default().to_string());
                }
                debug!(file = %target.file_name, import = %text, "copying import");
                target.add_import(terminated(text));
            }
            ScriptItem::VariableDecl {
                keyword,
                name,
                declarator,
                is_function,
            } => {
                debug!(file = %target.file_name, name = %name, "promoting variable");
                promote_declaration(
                    target,
                    name,
                    format!("{keyword} {declarator};"),
                    *is_function,
                );
            }
            ScriptItem::FunctionDecl { name, text } => {
                debug!(file = %target.file_name, name = %name, "promoting function");
                promote_declaration(target, name, text.to_string(), true);
            }
            ScriptItem::DefineMetadata(entries) => {
                debug!(file = %target.file_name, entries = entries.len(), "merging metadata");
                merge_metadata(&mut target.class, entries);
            }
            ScriptItem::OnInit {
                is_async,
                statements,
            } => {
                debug!(file = %target.file_name, "promoting onInit hook");
                let modifier = if *is_async { "async " } else { "" };
                let body = if statements.is_empty() {
                    String::new()
                } else {
                    format!("\n{}\n", statements.join("\n"))
                };
                promote_declaration(
                    target,
                    ON_INIT,
                    format!("{modifier}function {ON_INIT}() {{{body}}}"),
                    true,
                );
                target.class.add_method(ClassMethod {
                    name: NG_ON_INIT.to_string(),
                    params: String::new(),
                    statements: vec![format!("this.{ON_INIT}();")],
                });
            }
            ScriptItem::Call { text } => {
                target.class.add_constructor_statement(terminated(text));
            }
            ScriptItem::Other { text } => {
                debug!(file = %target.file_name, statement = %text, "ignoring statement");
            }
        }
    }

    ng_imports
}
