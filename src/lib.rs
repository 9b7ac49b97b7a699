//! # Analog `.ng` Compiler
//!
//! Turns a single-file component written in the `.ng` authoring format
//! (`<script lang="ts">`, `<template>`, `<style>`) into a standalone Angular
//! class.
//!
//! ## Rewrite Rules
//!
//! 1. **Kind**: a file with a template becomes a `@Component` (OnPush, inline
//!    template with styles prepended); a script-only file becomes a `@Directive`.
//!
//! 2. **Selector**: defaults to `file-name,ClassName,CONSTANT_NAME` derived from
//!    the file stem; `defineMetadata({ selector })` replaces it.
//!
//! 3. **Promotion**: every top-level `const`/`let`/`var`/`function` becomes a
//!    `protected` property assigned in the constructor. Functions are bound to
//!    the instance (`this.f = f.bind(this)`).
//!
//! 4. **Hooks**: `onInit(() => { ... })` is promoted like a function and
//!    called from a generated `ngOnInit()`.
//!
//! 5. **Imports**: script imports are copied as-is; default imports of other
//!    `.ng` files are added to the component's `imports` array.
//!
//! Every compile owns its own parse arenas, so files can be compiled in
//! parallel without coordination (see [`compile_batch`]).

mod compile;
mod error;
mod imports;
mod metadata;
mod names;
mod promote;
mod scaffold;
mod sections;
mod serialize;
mod target;


pub use compile::{compile, compile_batch, compile_with_options, CompileOptions};
#[cfg(feature = "napi")]
pub use compile::{compile_ng_native, compile_ng_with_options_native};
pub use error::{CompilerDiagnostic, NgCompileError};
pub use names::{names, NamingVariants};
pub use scaffold::NgKind;
pub use sections::{extract_sections, ExtractedSections, RawComponentSource};
