//! Structural output of a generation run.
//!
//! Emitters consume a [`RecordModel`]; nothing here is tied to a target
//! language. Every name a descriptor mentions (extends target, implemented
//! interface, class-typed component) belongs to a descriptor in the same
//! model.

use crate::docs::DocBlock;
use crate::flatten::FlatProperty;
use crate::schema::{ClassId, PropertyDecl, TypeRef};
use crate::wither::{MementoDescriptor, WitherContract};
use serde::{Deserialize, Serialize};

/// All resolved classes plus the shared contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordModel {
    /// Indexed by [`ClassId::index`].
    pub classes: Vec<ResolvedClass>,
    /// Present exactly once when withers are enabled.
    pub wither: Option<WitherContract>,
}

/// What one schema class turned into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedClass {
    pub class: ClassId,
    pub qualified_name: String,
    pub interface: Option<InterfaceDescriptor>,
    pub record: Option<RecordDescriptor>,
    /// Interfaces of the whole chain, root ancestor first, own last.
    pub contracts: Vec<String>,
    /// Flattened properties, kept for classes without a record too so
    /// descendants can extend them.
    pub properties: Vec<FlatProperty>,
}

/// A capability contract: accessors only, no storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceDescriptor {
    pub name: String,
    pub extends: Option<String>,
    /// One accessor per own property, in declaration order.
    pub methods: Vec<AccessorSignature>,
    pub doc: Option<String>,
}

/// An abstract accessor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessorSignature {
    pub name: String,
    pub ty: TypeRef,
    pub nullable: bool,
    pub doc: Option<String>,
}

/// An immutable, field-complete data carrier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordDescriptor {
    pub name: String,
    pub components: Vec<FlatProperty>,
    pub implements: Vec<String>,
    pub memento: Option<MementoDescriptor>,
    pub doc: DocBlock,
    pub decorations: Vec<Decoration>,
}

/// An opaque annotation attached after structural generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decoration {
    /// Fully-qualified annotation name.
    pub annotation: String,
}

impl From<&PropertyDecl> for AccessorSignature {
    fn from(property: &PropertyDecl) -> Self {
        Self {
            name: property.name.clone(),
            ty: property.ty.clone(),
            nullable: property.nullable,
            doc: property.doc.clone(),
        }
    }
}

impl Decoration {
    pub fn new(annotation: impl Into<String>) -> Self {
        Self {
            annotation: annotation.into(),
        }
    }
}

impl RecordDescriptor {
    pub fn component(&self, name: &str) -> Option<&FlatProperty> {
        self.components.iter().find(|c| c.name == name)
    }
}

impl RecordModel {
    pub fn get(&self, id: ClassId) -> &ResolvedClass {
        &self.classes[id.index()]
    }

    pub fn interfaces(&self) -> impl Iterator<Item = &InterfaceDescriptor> + '_ {
        self.classes.iter().filter_map(|c| c.interface.as_ref())
    }

    pub fn records(&self) -> impl Iterator<Item = &RecordDescriptor> + '_ {
        self.classes.iter().filter_map(|c| c.record.as_ref())
    }

    pub fn interface(&self, name: &str) -> Option<&InterfaceDescriptor> {
        self.interfaces().find(|i| i.name == name)
    }

    pub fn record(&self, name: &str) -> Option<&RecordDescriptor> {
        self.records().find(|r| r.name == name)
    }

    /// The generated type standing for class `id` in property types: its
    /// interface when it has one, so any subclass value fits, else its record.
    pub fn type_name(&self, id: ClassId) -> Option<&str> {
        let resolved = self.get(id);
        resolved
            .interface
            .as_ref()
            .map(|i| i.name.as_str())
            .or_else(|| resolved.record.as_ref().map(|r| r.name.as_str()))
    }

    /// Interfaces reached by following `extends` from the interface of `id`,
    /// starting with that interface itself.
    pub fn extends_chain(&self, id: ClassId) -> Vec<&str> {
        let mut chain = Vec::new();
        let mut current = self.get(id).interface.as_ref();
        while let Some(interface) = current {
            chain.push(interface.name.as_str());
            current = interface
                .extends
                .as_deref()
                .and_then(|parent| self.interface(parent));
        }
        chain
    }
}
