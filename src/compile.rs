//! The `.ng` compile pipeline:
//! sections -> scaffold -> promotion (metadata merge, import aggregation) -> serialization.

#[cfg(feature = "napi")]
use napi_derive::napi;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, debug_span};

use crate::error::NgCompileError;
use crate::imports::aggregate_imports;
use crate::names::{component_identifier, names};
use crate::promote::{classify_script, promote};
use crate::scaffold::{synthesize_scaffold, NgKind};
use crate::sections::{extract_sections, RawComponentSource};
use crate::serialize::serialize;
use crate::target::TargetFile;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompileOptions {
    #[serde(default)]
    pub is_prod: bool,
}

pub fn compile(file_name: &str, content: &str, is_prod: bool) -> Result<String, NgCompileError> {
    compile_with_options(
        &RawComponentSource::new(file_name, content),
        &CompileOptions { is_prod },
    )
}

pub fn compile_with_options(
    source: &RawComponentSource,
    options: &CompileOptions,
) -> Result<String, NgCompileError> {
    let span = debug_span!("compile_ng", file = %source.file_name);
    let _enter = span.enter();

    let identifier = component_identifier(&source.file_name).ok_or_else(|| {
        NgCompileError::MissingComponentName {
            file: source.file_name.clone(),
        }
    })?;
    let names = names(identifier);

    let sections = extract_sections(source)?;
    let kind = NgKind::for_template(&sections.template);
    debug!(kind = kind.decorator_name(), "synthesizing scaffold");

    let scaffold = synthesize_scaffold(&names, &sections.template, &sections.style, kind);
    let mut target = TargetFile::from_scaffold(&source.file_name, &scaffold, kind)?;

    if !sections.script.is_empty() {
        let items = classify_script(&source.file_name, &sections.script)?;
        let ng_imports = promote(&mut target, &items);
        aggregate_imports(&mut target, &ng_imports);
    }

    serialize(&target, options.is_prod)
}

/// Compile independent files in parallel. Results keep the input order.
pub fn compile_batch(
    sources: &[RawComponentSource],
    options: &CompileOptions,
) -> Vec<Result<String, NgCompileError>> {
    debug!(files = sources.len(), "compiling batch");
    sources
        .par_iter()
        .map(|source| compile_with_options(source, options))
        .collect()
}

// ═══════════════════════════════════════════════════════════════════════════════
// NAPI EXPORTS
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(feature = "napi")]
fn to_napi_error(err: NgCompileError) -> napi::Error {
    let reason = serde_json::to_string(&err.to_diagnostic()).unwrap_or_else(|_| err.to_string());
    napi::Error::from_reason(reason)
}

#[cfg(feature = "napi")]
#[napi]
pub fn compile_ng_native(
    file_name: String,
    content: String,
    is_prod: Option<bool>,
) -> napi::Result<String> {
    compile(&file_name, &content, is_prod.unwrap_or(false)).map_err(to_napi_error)
}

#[cfg(feature = "napi")]
#[napi]
pub fn compile_ng_with_options_native(
    file_name: String,
    content: String,
    options: serde_json::Value,
) -> napi::Result<String> {
    let options: CompileOptions =
        serde_json::from_value(options).map_err(|e| napi::Error::from_reason(e.to_string()))?;
    compile_with_options(&RawComponentSource::new(file_name, content), &options)
        .map_err(to_napi_error)
}
