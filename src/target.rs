//! The target file: an owned, mutable tree of the class being synthesized.
//!
//! The scaffold text is parsed with oxc once and lifted into this model. All
//! later rewrites (promotion, metadata merge, import aggregation) mutate the
//! model, and the serializer renders it back to text. The oxc arena that held
//! the scaffold is dropped as soon as lifting is done.

use indexmap::IndexMap;
use oxc_allocator::Allocator;
use oxc_ast::ast::{
    Argument, Class, ClassElement, Expression, ExportDefaultDeclarationKind, MethodDefinitionKind,
    ObjectPropertyKind, Statement, TSAccessibility,
};
use oxc_parser::Parser;
use oxc_span::{GetSpan, SourceType, Span};

use crate::error::NgCompileError;
use crate::scaffold::{NgKind, ENTITY_CLASS_NAME};

/// Source text covered by `span`.
pub(crate) fn span_text(source: &str, span: Span) -> &str {
    &source[span.start as usize..span.end as usize]
}

pub(crate) fn source_type() -> SourceType {
    SourceType::default()
        .with_typescript(true)
        .with_module(true)
}

// ═══════════════════════════════════════════════════════════════════════════════
// TREE TYPES
// ═══════════════════════════════════════════════════════════════════════════════

/// Decorator metadata, keyed by property name, holding each value's source
/// text. Insertion order is output order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecoratorMetadata {
    entries: IndexMap<String, String>,
}

impl DecoratorMetadata {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Overwrites in place when the key exists, appends otherwise.
    pub fn upsert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.entries.shift_remove(key)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Public,
    Protected,
    Private,
}

impl Scope {
    pub fn keyword(&self) -> Option<&'static str> {
        match self {
            Scope::Public => None,
            Scope::Protected => Some("protected"),
            Scope::Private => Some("private"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassProperty {
    pub scope: Scope,
    pub name: String,
    pub initializer: Option<String>,
}

impl ClassProperty {
    /// `protected name;`
    pub fn declared(name: impl Into<String>) -> Self {
        Self {
            scope: Scope::Protected,
            name: name.into(),
            initializer: None,
        }
    }

    /// `protected name = initializer;`
    pub fn initialized(name: impl Into<String>, initializer: impl Into<String>) -> Self {
        Self {
            scope: Scope::Protected,
            name: name.into(),
            initializer: Some(initializer.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassMethod {
    pub name: String,
    pub params: String,
    pub statements: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetClass {
    pub name: String,
    pub decorator: String,
    pub metadata: DecoratorMetadata,
    properties: Vec<ClassProperty>,
    constructor_body: Vec<String>,
    methods: Vec<ClassMethod>,
}

impl TargetClass {
    pub fn properties(&self) -> &[ClassProperty] {
        &self.properties
    }

    pub fn constructor_body(&self) -> &[String] {
        &self.constructor_body
    }

    pub fn methods(&self) -> &[ClassMethod] {
        &self.methods
    }

    pub fn add_property(&mut self, property: ClassProperty) {
        self.properties.push(property);
    }

    pub fn add_constructor_statement(&mut self, statement: impl Into<String>) {
        self.constructor_body.push(statement.into());
    }

    pub fn add_method(&mut self, method: ClassMethod) {
        self.methods.push(method);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetFile {
    pub file_name: String,
    pub kind: NgKind,
    imports: Vec<String>,
    pub class: TargetClass,
}

impl TargetFile {
    pub fn imports(&self) -> &[String] {
        &self.imports
    }

    /// New imports go after the existing ones.
    pub fn add_import(&mut self, import: impl Into<String>) {
        self.imports.push(import.into());
    }

    /// Parse scaffold text and lift it into an owned tree, checking that it
    /// has the shape every later rewrite relies on.
    pub fn from_scaffold(
        file_name: &str,
        scaffold: &str,
        kind: NgKind,
    ) -> Result<TargetFile, NgCompileError> {
        let allocator = Allocator::default();
        let ret = Parser::new(&allocator, scaffold, source_type()).parse();

        if ret.panicked || !ret.errors.is_empty() {
            let message = ret
                .errors
                .iter()
                .map(|e| e.to_string())
                .collect::<Vec<_>>()
                .join("; ");
            return Err(NgCompileError::MissingSourceFile {
                file: file_name.to_string(),
                message,
            });
        }

        let mut imports = Vec::new();
        let mut class = None;

        for stmt in &ret.program.body {
            match stmt {
                Statement::ImportDeclaration(import) => {
                    imports.push(span_text(scaffold, import.span).to_string());
                }
                Statement::ExportDefaultDeclaration(export) => {
                    if let ExportDefaultDeclarationKind::ClassDeclaration(decl) =
                        &export.declaration
                    {
                        if is_entity_class(decl) {
                            class = Some(lift_class(file_name, scaffold, decl, kind)?);
                        }
                    }
                }
                Statement::ClassDeclaration(decl) if is_entity_class(decl) => {
                    class = Some(lift_class(file_name, scaffold, decl, kind)?);
                }
                _ => {}
            }
        }

        let class = class.ok_or_else(|| NgCompileError::MissingClass {
            file: file_name.to_string(),
        })?;

        Ok(TargetFile {
            file_name: file_name.to_string(),
            kind,
            imports,
            class,
        })
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// LIFTING
// ═══════════════════════════════════════════════════════════════════════════════

fn is_entity_class(class: &Class) -> bool {
    class
        .id
        .as_ref()
        .map(|id| id.name.as_str() == ENTITY_CLASS_NAME)
        .unwrap_or(false)
}

fn lift_class(
    file_name: &str,
    source: &str,
    class: &Class,
    kind: NgKind,
) -> Result<TargetClass, NgCompileError> {
    let decorator_name = kind.decorator_name();

    let decorator_call = class
        .decorators
        .iter()
        .find_map(|decorator| match &decorator.expression {
            Expression::CallExpression(call) => match &call.callee {
                Expression::Identifier(ident) if ident.name.as_str() == decorator_name => {
                    Some(call)
                }
                _ => None,
            },
            _ => None,
        })
        .ok_or_else(|| NgCompileError::MissingDecorator {
            file: file_name.to_string(),
        })?;

    let invalid_arguments = || NgCompileError::InvalidMetadataArguments {
        file: file_name.to_string(),
    };

    let object = match decorator_call.arguments.first() {
        Some(Argument::ObjectExpression(object)) => object,
        _ => return Err(invalid_arguments()),
    };

    let mut metadata = DecoratorMetadata::default();
    for property in &object.properties {
        match property {
            ObjectPropertyKind::ObjectProperty(p) => {
                let key = p.key.static_name().ok_or_else(invalid_arguments)?;
                metadata.upsert(key.to_string(), span_text(source, p.value.span()));
            }
            ObjectPropertyKind::SpreadProperty(_) => return Err(invalid_arguments()),
        }
    }

    let mut properties = Vec::new();
    let mut methods = Vec::new();
    let mut constructor_body = None;

    for element in &class.body.body {
        match element {
            ClassElement::PropertyDefinition(p) => {
                let Some(name) = p.key.static_name() else {
                    continue;
                };
                let scope = match p.accessibility {
                    Some(TSAccessibility::Protected) => Scope::Protected,
                    Some(TSAccessibility::Private) => Scope::Private,
                    _ => Scope::Public,
                };
                properties.push(ClassProperty {
                    scope,
                    name: name.to_string(),
                    initializer: p
                        .value
                        .as_ref()
                        .map(|v| span_text(source, v.span()).to_string()),
                });
            }
            ClassElement::MethodDefinition(m) => {
                let statements = m.value.body.as_ref().map(|body| {
                    body.statements
                        .iter()
                        .map(|s| span_text(source, s.span()).to_string())
                        .collect::<Vec<_>>()
                });

                if m.kind == MethodDefinitionKind::Constructor {
                    let body = statements.ok_or_else(|| {
                        NgCompileError::InvalidConstructorBody {
                            file: file_name.to_string(),
                        }
                    })?;
                    constructor_body = Some(body);
                } else if let Some(name) = m.key.static_name() {
                    let params = span_text(source, m.value.params.span);
                    methods.push(ClassMethod {
                        name: name.to_string(),
                        params: strip_parens(params).to_string(),
                        statements: statements.unwrap_or_default(),
                    });
                }
            }
            _ => {}
        }
    }

    let constructor_body = constructor_body.ok_or_else(|| NgCompileError::InvalidConstructorBody {
        file: file_name.to_string(),
    })?;

    Ok(TargetClass {
        name: ENTITY_CLASS_NAME.to_string(),
        decorator: decorator_name.to_string(),
        metadata,
        properties,
        constructor_body,
        methods,
    })
}

pub(crate) fn strip_parens(params: &str) -> &str {
    params
        .strip_prefix('(')
        .and_then(|p| p.strip_suffix(')'))
        .unwrap_or(params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::names::names;
    use crate::scaffold::synthesize_scaffold;

    #[test]
    fn test_lifts_component_scaffold() {
        let scaffold = synthesize_scaffold(&names("card"), "<p>card</p>", "", NgKind::Component);
        let target = TargetFile::from_scaffold("card.ng", &scaffold, NgKind::Component).unwrap();

        assert_eq!(target.imports().len(), 1);
        assert_eq!(target.class.decorator, "Component");
        let keys: Vec<&str> = target.class.metadata.entries().map(|(k, _)| k).collect();
        assert_eq!(
            keys,
            vec!["standalone", "selector", "changeDetection", "template"]
        );
        assert_eq!(target.class.metadata.get("selector"), Some("'card,Card,CARD'"));
        assert!(target.class.constructor_body().is_empty());
        assert!(target.class.properties().is_empty());
        assert!(target.class.methods().is_empty());
    }

    #[test]
    fn test_missing_class_is_reported() {
        let err = TargetFile::from_scaffold("a.ng", "export default class Other {}", NgKind::Directive)
            .unwrap_err();
        assert!(matches!(err, NgCompileError::MissingClass { .. }));
    }

    #[test]
    fn test_missing_decorator_is_reported() {
        let source = "@Component({})\nexport default class AnalogNgEntity { constructor() {} }";
        let err = TargetFile::from_scaffold("a.ng", source, NgKind::Directive).unwrap_err();
        assert!(matches!(err, NgCompileError::MissingDecorator { .. }));
    }

    #[test]
    fn test_non_object_metadata_is_reported() {
        let source = "@Directive(meta)\nexport default class AnalogNgEntity { constructor() {} }";
        let err = TargetFile::from_scaffold("a.ng", source, NgKind::Directive).unwrap_err();
        assert!(matches!(err, NgCompileError::InvalidMetadataArguments { .. }));
    }

    #[test]
    fn test_missing_constructor_is_reported() {
        let source = "@Directive({})\nexport default class AnalogNgEntity {}";
        let err = TargetFile::from_scaffold("a.ng", source, NgKind::Directive).unwrap_err();
        assert!(matches!(err, NgCompileError::InvalidConstructorBody { .. }));
    }

    #[test]
    fn test_unparsable_scaffold_is_reported() {
        let err = TargetFile::from_scaffold("a.ng", "export default class {", NgKind::Directive)
            .unwrap_err();
        assert!(matches!(err, NgCompileError::MissingSourceFile { .. }));
    }

    #[test]
    fn test_metadata_upsert_keeps_position_and_remove_shifts() {
        let mut metadata = DecoratorMetadata::default();
        metadata.upsert("a", "1");
        metadata.upsert("b", "2");
        metadata.upsert("a", "3");
        assert_eq!(
            metadata.entries().collect::<Vec<_>>(),
            vec![("a", "3"), ("b", "2")]
        );
        assert_eq!(metadata.remove("a"), Some("3".to_string()));
        metadata.upsert("a", "4");
        assert_eq!(
            metadata.entries().collect::<Vec<_>>(),
            vec![("b", "2"), ("a", "4")]
        );
    }
}
