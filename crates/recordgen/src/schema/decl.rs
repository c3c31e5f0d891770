//! Declarations: the unvalidated shape of a schema as written.
//!
//! These deserialize straight from a schema document and double as a
//! programmatic builder. [`SchemaGraph::build`](super::SchemaGraph::build)
//! validates them into the immutable graph.

use super::ClassKind;
use serde::{Deserialize, Serialize};

/// A whole schema document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchemaDocument {
    #[serde(default)]
    pub modules: Vec<ModuleDecl>,
}

/// A module: an implicit class that also namespaces the classes inside it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleDecl {
    pub name: String,
    #[serde(default)]
    pub kind: ClassKind,
    /// Name of the module this module extends.
    #[serde(default)]
    pub extends: Option<String>,
    #[serde(default)]
    pub doc: Option<String>,
    #[serde(default)]
    pub properties: Vec<PropertySpec>,
    #[serde(default)]
    pub classes: Vec<ClassDecl>,
}

/// A class declared inside a module.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassDecl {
    pub name: String,
    #[serde(default)]
    pub kind: ClassKind,
    /// Superclass name, module-local (`Shape`) or qualified (`Geometry.Shape`).
    #[serde(default)]
    pub extends: Option<String>,
    #[serde(default)]
    pub doc: Option<String>,
    #[serde(default)]
    pub properties: Vec<PropertySpec>,
}

/// A declared property with its type still in expression form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertySpec {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    /// Equivalent to a trailing `?` on the type expression.
    #[serde(default)]
    pub nullable: bool,
    #[serde(default)]
    pub doc: Option<String>,
}

impl SchemaDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn module(mut self, module: ModuleDecl) -> Self {
        self.modules.push(module);
        self
    }
}

impl ModuleDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ClassKind::Final,
            extends: None,
            doc: None,
            properties: Vec::new(),
            classes: Vec::new(),
        }
    }

    pub fn kind(mut self, kind: ClassKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn extends(mut self, module: impl Into<String>) -> Self {
        self.extends = Some(module.into());
        self
    }

    pub fn with_docs(mut self, docs: impl Into<String>) -> Self {
        self.doc = Some(docs.into());
        self
    }

    pub fn property(mut self, property: PropertySpec) -> Self {
        self.properties.push(property);
        self
    }

    pub fn class(mut self, class: ClassDecl) -> Self {
        self.classes.push(class);
        self
    }
}

impl ClassDecl {
    pub fn new(name: impl Into<String>, kind: ClassKind) -> Self {
        Self {
            name: name.into(),
            kind,
            extends: None,
            doc: None,
            properties: Vec::new(),
        }
    }

    pub fn final_class(name: impl Into<String>) -> Self {
        Self::new(name, ClassKind::Final)
    }

    pub fn open(name: impl Into<String>) -> Self {
        Self::new(name, ClassKind::Open)
    }

    pub fn abstract_class(name: impl Into<String>) -> Self {
        Self::new(name, ClassKind::Abstract)
    }

    pub fn extends(mut self, superclass: impl Into<String>) -> Self {
        self.extends = Some(superclass.into());
        self
    }

    pub fn with_docs(mut self, docs: impl Into<String>) -> Self {
        self.doc = Some(docs.into());
        self
    }

    pub fn property(mut self, property: PropertySpec) -> Self {
        self.properties.push(property);
        self
    }
}

impl PropertySpec {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            nullable: false,
            doc: None,
        }
    }

    pub fn with_docs(mut self, docs: impl Into<String>) -> Self {
        self.doc = Some(docs.into());
        self
    }
}
