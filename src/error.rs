use serde::{Deserialize, Serialize};
use thiserror::Error;

// ═══════════════════════════════════════════════════════════════════════════════
// ERROR CODES
// ═══════════════════════════════════════════════════════════════════════════════

pub const ERR_MISSING_COMPONENT_NAME: &str = "NG-ERR-NAME";
pub const ERR_MISSING_SECTIONS: &str = "NG-ERR-SECTIONS";
pub const ERR_MISSING_SOURCE_FILE: &str = "NG-ERR-SOURCE-FILE";
pub const ERR_MISSING_CLASS: &str = "NG-ERR-CLASS";
pub const ERR_MISSING_DECORATOR: &str = "NG-ERR-DECORATOR";
pub const ERR_INVALID_METADATA_ARGUMENTS: &str = "NG-ERR-METADATA-ARGS";
pub const ERR_INVALID_CONSTRUCTOR_BODY: &str = "NG-ERR-CONSTRUCTOR";
pub const ERR_SCRIPT_SYNTAX: &str = "NG-ERR-SCRIPT-SYNTAX";
pub const ERR_UNSUPPORTED_DECLARATION: &str = "NG-ERR-DECLARATION";
pub const ERR_INVALID_DEFINE_METADATA: &str = "NG-ERR-DEFINE-METADATA";
pub const ERR_OUTPUT_SYNTAX: &str = "NG-ERR-OUTPUT-SYNTAX";

// ═══════════════════════════════════════════════════════════════════════════════
// COMPILE ERROR
// ═══════════════════════════════════════════════════════════════════════════════

/// Every way a single `.ng` compile can fail. Nothing is retried here; the
/// caller decides whether a failure breaks the build or skips the file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NgCompileError {
    #[error("[Analog] Missing component name {file}")]
    MissingComponentName { file: String },

    #[error("[Analog] Either <script> or <template> must exist in {file}")]
    MissingSections { file: String },

    #[error("[Analog] Missing source files {file}: {message}")]
    MissingSourceFile { file: String, message: String },

    #[error("[Analog] Missing class {file}")]
    MissingClass { file: String },

    #[error("[Analog] Missing metadata {file}")]
    MissingDecorator { file: String },

    #[error("[Analog] invalid metadata arguments {file}")]
    InvalidMetadataArguments { file: String },

    #[error("[Analog] invalid constructor body {file}")]
    InvalidConstructorBody { file: String },

    #[error("[Analog] Failed to parse <script> of {file}: {message}")]
    ScriptSyntax { file: String, message: String },

    #[error("[Analog] Unsupported declaration in {file}: {detail}")]
    UnsupportedDeclaration { file: String, detail: String },

    #[error("[Analog] Invalid defineMetadata call in {file}: {detail}")]
    InvalidDefineMetadata { file: String, detail: String },

    #[error("[Analog] Generated output for {file} does not parse: {message}")]
    OutputSyntax { file: String, message: String },
}

impl NgCompileError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingComponentName { .. } => ERR_MISSING_COMPONENT_NAME,
            Self::MissingSections { .. } => ERR_MISSING_SECTIONS,
            Self::MissingSourceFile { .. } => ERR_MISSING_SOURCE_FILE,
            Self::MissingClass { .. } => ERR_MISSING_CLASS,
            Self::MissingDecorator { .. } => ERR_MISSING_DECORATOR,
            Self::InvalidMetadataArguments { .. } => ERR_INVALID_METADATA_ARGUMENTS,
            Self::InvalidConstructorBody { .. } => ERR_INVALID_CONSTRUCTOR_BODY,
            Self::ScriptSyntax { .. } => ERR_SCRIPT_SYNTAX,
            Self::UnsupportedDeclaration { .. } => ERR_UNSUPPORTED_DECLARATION,
            Self::InvalidDefineMetadata { .. } => ERR_INVALID_DEFINE_METADATA,
            Self::OutputSyntax { .. } => ERR_OUTPUT_SYNTAX,
        }
    }

    /// The file the failing compile was invoked for.
    pub fn file(&self) -> &str {
        match self {
            Self::MissingComponentName { file }
            | Self::MissingSections { file }
            | Self::MissingSourceFile { file, .. }
            | Self::MissingClass { file }
            | Self::MissingDecorator { file }
            | Self::InvalidMetadataArguments { file }
            | Self::InvalidConstructorBody { file }
            | Self::ScriptSyntax { file, .. }
            | Self::UnsupportedDeclaration { file, .. }
            | Self::InvalidDefineMetadata { file, .. }
            | Self::OutputSyntax { file, .. } => file,
        }
    }

    pub fn to_diagnostic(&self) -> CompilerDiagnostic {
        CompilerDiagnostic {
            code: self.code().to_string(),
            message: self.to_string(),
            file: self.file().to_string(),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// DIAGNOSTIC (binding boundary)
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CompilerDiagnostic {
    pub code: String,
    pub message: String,
    pub file: String,
}
