//! The copy-with protocol.
//!
//! Records stay immutable; changing one means staging its values in a
//! mutable `Memento`, letting a caller-supplied procedure edit the stage,
//! and finalizing the stage into a fresh record. One generic contract,
//! `Wither<R, S>`, is shared by every record (`R` the record, `S` its
//! memento). [`runtime`] carries the same protocol over dynamic values.

pub mod runtime;

use crate::flatten::FlatProperty;
use crate::naming::WITHER_CONTRACT;
use crate::options::GenerateOptions;
use crate::schema::TypeRef;
use serde::{Deserialize, Serialize};

/// Name of the staging type nested in each record.
pub const MEMENTO: &str = "Memento";

/// Public entry point on each record.
pub const ENTRY_POINT: &str = "with";

/// Private operation building a record from the stage.
pub const FINALIZE: &str = "build";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Private,
}

/// The shared generic contract `Wither<R, S>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WitherContract {
    pub name: String,
    /// Record type parameter.
    pub record_param: String,
    /// Staging type parameter.
    pub staging_param: String,
    pub method: String,
    /// Annotation placed on both type parameters, the record bound, the
    /// return type, the procedure parameter and its type argument.
    pub nullability_marker: String,
}

/// Staging type of one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MementoDescriptor {
    pub name: String,
    pub record: String,
    /// One mutable field per record component, same names and types.
    pub fields: Vec<StagingField>,
    /// Copies every field from an existing record.
    pub constructor: Visibility,
    pub finalize: String,
    pub finalize_visibility: Visibility,
    pub entry_point: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StagingField {
    pub name: String,
    pub ty: TypeRef,
    pub nullable: bool,
}

/// The contract for a run, with the configured nullability marker.
pub fn contract(options: &GenerateOptions) -> WitherContract {
    WitherContract {
        name: WITHER_CONTRACT.to_string(),
        record_param: "R".to_string(),
        staging_param: "S".to_string(),
        method: ENTRY_POINT.to_string(),
        nullability_marker: options.nullability_marker().to_string(),
    }
}

/// The staging type for a record with the given components.
pub fn memento_for(record: &str, components: &[FlatProperty]) -> MementoDescriptor {
    MementoDescriptor {
        name: MEMENTO.to_string(),
        record: record.to_string(),
        fields: components
            .iter()
            .map(|c| StagingField {
                name: c.name.clone(),
                ty: c.ty.clone(),
                nullable: c.nullable,
            })
            .collect(),
        constructor: Visibility::Private,
        finalize: FINALIZE.to_string(),
        finalize_visibility: Visibility::Private,
        entry_point: ENTRY_POINT.to_string(),
    }
}

impl MementoDescriptor {
    /// `Record.Memento`.
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.record, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ClassId;

    #[test]
    fn memento_mirrors_components() {
        let components = vec![
            FlatProperty {
                name: "one".into(),
                ty: TypeRef::Int,
                nullable: false,
                doc: Some("ignored here".into()),
                declared_in: ClassId::default(),
            },
            FlatProperty {
                name: "two".into(),
                ty: TypeRef::String,
                nullable: true,
                doc: None,
                declared_in: ClassId::default(),
            },
        ];
        let memento = memento_for("Pair", &components);
        assert_eq!(memento.qualified_name(), "Pair.Memento");
        assert_eq!(memento.constructor, Visibility::Private);
        assert_eq!(memento.finalize_visibility, Visibility::Private);
        let fields: Vec<_> = memento.fields.iter().map(|f| (f.name.as_str(), f.nullable)).collect();
        assert_eq!(fields, [("one", false), ("two", true)]);
    }

    #[test]
    fn empty_record_still_gets_a_memento() {
        let memento = memento_for("Unit", &[]);
        assert!(memento.fields.is_empty());
        assert_eq!(memento.entry_point, "with");
    }

    #[test]
    fn contract_uses_configured_marker() {
        let default = contract(&GenerateOptions::records());
        assert_eq!(default.nullability_marker, crate::options::DEFAULT_NULLABILITY_MARKER);
        let custom = contract(&GenerateOptions::records().with_nullability_marker("a.b.C"));
        assert_eq!(custom.nullability_marker, "a.b.C");
        assert_eq!(custom.name, "Wither");
    }
}
