//! Traits for boundary emitters.

use crate::error::EmitError;
use crate::ir::RecordModel;
use crate::schema::SchemaGraph;
use std::path::PathBuf;

/// Emitter settings that do not affect the structural model.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmitOptions {
    /// Target package; files land in its directory.
    pub package: Option<String>,
}

impl EmitOptions {
    pub fn with_package(package: impl Into<String>) -> Self {
        Self {
            package: Some(package.into()),
        }
    }
}

/// One generated file, path relative to the output root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    pub contents: String,
}

/// Renders a resolved [`RecordModel`] into source files.
///
/// # Implementing Custom Emitters
///
/// ```ignore
/// use recordgen::{EmitOptions, Emitter, SourceFile, register_emitter};
///
/// struct KotlinEmitter;
///
/// impl Emitter for KotlinEmitter {
///     fn name(&self) -> &'static str { "kotlin" }
///     fn language(&self) -> &'static str { "kotlin" }
///     fn extension(&self) -> &'static str { "kt" }
///     fn emit(&self, graph, model, options) -> Result<Vec<SourceFile>, EmitError> { /* ... */ }
/// }
///
/// // Register before first use
/// register_emitter(&KotlinEmitter);
/// ```
pub trait Emitter: Send + Sync {
    /// Unique emitter identifier (e.g., "java", "json").
    fn name(&self) -> &'static str;

    /// Target language.
    fn language(&self) -> &'static str;

    /// File extension for generated files.
    fn extension(&self) -> &'static str;

    /// Render the model. `graph` is the one the model was resolved from.
    fn emit(
        &self,
        graph: &SchemaGraph,
        model: &RecordModel,
        options: &EmitOptions,
    ) -> Result<Vec<SourceFile>, EmitError>;
}
