//! Immutable record object models from class-hierarchy schemas.
//!
//! `recordgen` takes a schema written as a single-inheritance class hierarchy
//! (final, open and abstract classes grouped in modules) and decomposes it
//! into interfaces and records: data carriers that cannot be extended and
//! only implement interfaces. Inherited properties are flattened into each
//! record, substitutability is carried by the interfaces, and an optional
//! copy-with protocol (`Wither`) gives every record a way to derive changed
//! copies of itself.
//!
//! # Architecture
//!
//! ```text
//! Input               Graph             Resolution                 Output
//! ─────────────     ─────────────     ──────────────────────     ─────────────
//! JSON schema ─┐                      ┌─> flatten (components)    ┌─> Java sources
//!              ├─> SchemaGraph ──────>│   docs (DocBlock)  ──────>│
//! ModuleDecl  ─┘   (schema/)          └─> wither (Memento)        └─> JSON model
//!                                         = RecordModel (ir.rs)
//! ```
//!
//! # Example
//!
//! ```
//! use recordgen::{GenerateOptions, generate, input};
//!
//! let schema = serde_json::json!({
//!     "modules": [{
//!         "name": "Shapes",
//!         "classes": [
//!             { "name": "Shape", "kind": "abstract",
//!               "properties": [{ "name": "label", "type": "String" }] },
//!             { "name": "Circle", "extends": "Shape",
//!               "properties": [{ "name": "radius", "type": "Float" }] }
//!         ]
//!     }]
//! });
//!
//! let graph = input::parse_schema(&schema).unwrap();
//! let model = generate(&graph, &GenerateOptions::records()).unwrap().unwrap();
//!
//! let circle = model.record("Circle").unwrap();
//! assert_eq!(circle.implements, ["Shape"]);
//! assert_eq!(circle.components.len(), 2);
//! ```
//!
//! # Feature Flags
//!
//! Emitter flags (use `backend-*` prefix):
//! - `backend-java` - Java interfaces, records and the `Wither` contract
//! - `backend-json` - the resolved model as JSON

pub mod docs;
pub mod error;
pub mod flatten;
pub mod input;
pub mod ir;
pub mod naming;
pub mod options;
pub mod output;
pub mod registry;
pub mod resolve;
pub mod schema;
pub mod traits;
pub mod wither;

pub use error::{ConfigError, EmitError, Error, SchemaError};
pub use input::{ParseError, parse_schema, parse_schema_str};
pub use ir::RecordModel;
pub use options::GenerateOptions;
pub use resolve::resolve;
pub use schema::SchemaGraph;

// Re-export traits
pub use traits::{EmitOptions, Emitter, SourceFile};

// Re-export registry functions
pub use registry::{emitter_names, emitters, get_emitter, register_emitter};

#[cfg(feature = "backend-java")]
pub use output::java::JavaEmitter;

#[cfg(feature = "backend-json")]
pub use output::json::JsonEmitter;

/// Run the decomposition for `graph`.
///
/// Options are validated before anything is resolved. Returns `Ok(None)`
/// when records are disabled, leaving the caller on its non-record path.
pub fn generate(graph: &SchemaGraph, options: &GenerateOptions) -> Result<Option<RecordModel>, Error> {
    options.validate()?;
    if !options.enable_records {
        tracing::debug!("records disabled, skipping decomposition");
        return Ok(None);
    }
    Ok(Some(resolve(graph, options)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ClassDecl, ModuleDecl, PropertySpec};

    fn graph() -> SchemaGraph {
        SchemaGraph::build(vec![ModuleDecl::new("M").class(
            ClassDecl::final_class("Point")
                .property(PropertySpec::new("x", "Int"))
                .property(PropertySpec::new("y", "Int")),
        )])
        .unwrap()
    }

    #[test]
    fn disabled_records_skip_generation() {
        assert!(generate(&graph(), &GenerateOptions::default()).unwrap().is_none());
    }

    #[test]
    fn options_are_validated_first() {
        let options = GenerateOptions {
            enable_withers: true,
            ..Default::default()
        };
        let err = generate(&graph(), &options).unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::RequiresRecords { option: "enable_withers" })
        ));

        let options = GenerateOptions::records().with_nullability_marker("not a name");
        assert!(matches!(
            generate(&graph(), &options),
            Err(Error::Config(ConfigError::MalformedMarker { .. }))
        ));
    }

    #[test]
    fn enabled_records_produce_a_model() {
        let model = generate(&graph(), &GenerateOptions::records())
            .unwrap()
            .unwrap();
        assert!(model.record("Point").is_some());
        assert!(model.record("M").is_some());
    }
}
