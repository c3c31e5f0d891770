//! The resolved model as JSON.

use crate::error::EmitError;
use crate::ir::RecordModel;
use crate::schema::SchemaGraph;
use crate::traits::{EmitOptions, Emitter, SourceFile};
use std::path::PathBuf;

/// Static instance of the JSON emitter for registry.
pub static JSON_EMITTER: JsonEmitter = JsonEmitter;

/// Writes the whole model to `model.json`.
pub struct JsonEmitter;

impl Emitter for JsonEmitter {
    fn name(&self) -> &'static str {
        "json"
    }

    fn language(&self) -> &'static str {
        "json"
    }

    fn extension(&self) -> &'static str {
        "json"
    }

    fn emit(
        &self,
        _graph: &SchemaGraph,
        model: &RecordModel,
        _options: &EmitOptions,
    ) -> Result<Vec<SourceFile>, EmitError> {
        Ok(vec![SourceFile {
            path: PathBuf::from("model.json"),
            contents: generate_json(model)?,
        }])
    }
}

/// Pretty-printed model with a trailing newline.
pub fn generate_json(model: &RecordModel) -> Result<String, EmitError> {
    let mut json = serde_json::to_string_pretty(model)?;
    json.push('\n');
    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::GenerateOptions;
    use crate::resolve::resolve;
    use crate::schema::{ClassDecl, ModuleDecl, PropertySpec};

    #[test]
    fn model_survives_the_trip() {
        let graph = SchemaGraph::build(vec![ModuleDecl::new("M").class(
            ClassDecl::final_class("Point").property(PropertySpec::new("x", "Int?")),
        )])
        .unwrap();
        let model = resolve(&graph, &GenerateOptions::records().with_withers()).unwrap();

        let files = JSON_EMITTER
            .emit(&graph, &model, &EmitOptions::default())
            .unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].path, PathBuf::from("model.json"));

        let back: RecordModel = serde_json::from_str(&files[0].contents).unwrap();
        assert_eq!(back, model);
    }
}
