//! Error types.
//!
//! Every core failure is fatal for the whole generation run: no partial
//! model is ever returned alongside an error.

use crate::schema::TypeParseError;

/// The input schema violates a structural rule.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("class `{name}` is declared more than once")]
    DuplicateClass { name: String },

    #[error("class `{class}` extends undeclared class `{superclass}`")]
    UnknownSuperclass { class: String, superclass: String },

    #[error("class `{class}` extends final class `{superclass}`")]
    FinalSuperclass { class: String, superclass: String },

    #[error("cyclic ancestry: {}", .cycle.join(" -> "))]
    CyclicAncestry { cycle: Vec<String> },

    #[error(
        "property `{property}` of `{redeclared_in}` duplicates the one declared in `{declared_in}`"
    )]
    DuplicateProperty {
        property: String,
        declared_in: String,
        redeclared_in: String,
    },

    #[error("property `{class}.{property}` has invalid type: {source}")]
    InvalidType {
        class: String,
        property: String,
        #[source]
        source: TypeParseError,
    },

    #[error("property `{class}.{property}` refers to undeclared class `{referenced}`")]
    UnknownType {
        class: String,
        property: String,
        referenced: String,
    },
}

/// Generation options are malformed or contradict each other.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("nullability marker `{marker}` is not a fully-qualified annotation name")]
    MalformedMarker { marker: String },

    #[error("naming convention {field} `{value}` is not a valid identifier fragment")]
    MalformedNaming { field: &'static str, value: String },

    #[error("`{option}` requires records to be enabled")]
    RequiresRecords { option: &'static str },
}

/// A boundary emitter failed to render the model.
#[derive(Debug, thiserror::Error)]
pub enum EmitError {
    #[error("formatting failed")]
    Format(#[from] std::fmt::Error),

    #[error("serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Any failure of a generation run.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Emit(#[from] EmitError),
}
