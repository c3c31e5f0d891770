//! Generated type names.
//!
//! Every interface and record lives in one flat generated namespace.
//! Names derive from the class name, its kind, and whether it is a module:
//!
//! | class                | interface        | record                     |
//! |----------------------|------------------|----------------------------|
//! | `open Foo`           | `IFoo`           | `Foo`                      |
//! | `abstract Foo`       | `Foo`            | -                          |
//! | `final Foo`          | -                | `Foo`                      |
//! | module `M` (open)    | `M`              | `MImpl`                    |
//! | module `M` (final)   | -                | `M`                        |
//!
//! Allocation claims module names first, then class names, each group in
//! declaration order. A name that is already taken gets the smallest free
//! numeric suffix starting at 2, so an abstract class `Foo` inside module
//! `Foo` ends up as interface `Foo2`. The names in [`RESERVED`] are always
//! taken: the copy-with contract and its staging type, plus the platform
//! types generated sources refer to by simple name.

use crate::error::ConfigError;
use crate::schema::{ClassNode, SchemaGraph};
use crate::wither::MEMENTO;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Name of the shared copy-with contract.
pub const WITHER_CONTRACT: &str = "Wither";

/// Names no generated interface or record may take. A schema class with one
/// of these names would shadow it across the generated package.
pub const RESERVED: &[&str] = &[
    WITHER_CONTRACT,
    MEMENTO,
    "Record",
    "Object",
    "String",
    "Boolean",
    "Long",
    "Double",
    "Override",
    "List",
    "Set",
    "Map",
    "Consumer",
];

/// Configurable parts of the naming rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamingConvention {
    /// Marks the interface of an `open` non-module class.
    pub interface_prefix: String,
    /// Appended to the record of a module that also has an interface.
    pub module_record_suffix: String,
}

impl Default for NamingConvention {
    fn default() -> Self {
        Self {
            interface_prefix: "I".into(),
            module_record_suffix: "Impl".into(),
        }
    }
}

impl NamingConvention {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.interface_prefix.chars().all(is_ident_char)
            || self
                .interface_prefix
                .chars()
                .next()
                .is_some_and(|c| c.is_ascii_digit())
        {
            return Err(ConfigError::MalformedNaming {
                field: "interface_prefix",
                value: self.interface_prefix.clone(),
            });
        }
        if self.module_record_suffix.is_empty()
            || !self.module_record_suffix.chars().all(is_ident_char)
        {
            return Err(ConfigError::MalformedNaming {
                field: "module_record_suffix",
                value: self.module_record_suffix.clone(),
            });
        }
        Ok(())
    }

    fn interface_base(&self, class: &ClassNode) -> Option<String> {
        if !class.kind.has_interface() {
            return None;
        }
        if class.is_module || !class.kind.has_record() {
            Some(class.name.clone())
        } else {
            Some(format!("{}{}", self.interface_prefix, class.name))
        }
    }

    fn record_base(&self, class: &ClassNode) -> Option<String> {
        if !class.kind.has_record() {
            return None;
        }
        if class.is_module && class.kind.has_interface() {
            Some(format!("{}{}", class.name, self.module_record_suffix))
        } else {
            Some(class.name.clone())
        }
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

/// Names allocated to one class.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllocatedNames {
    pub interface: Option<String>,
    pub record: Option<String>,
}

/// Allocate names for every class, indexed by [`ClassId::index`](crate::schema::ClassId::index).
pub fn allocate(graph: &SchemaGraph, convention: &NamingConvention) -> Vec<AllocatedNames> {
    let mut taken: HashSet<String> = RESERVED.iter().map(|name| name.to_string()).collect();
    let mut names = vec![AllocatedNames::default(); graph.len()];

    let modules = graph.classes().iter().filter(|c| c.is_module);
    let classes = graph.classes().iter().filter(|c| !c.is_module);
    for class in modules.chain(classes) {
        let slot = &mut names[class.id.index()];
        slot.interface = convention
            .interface_base(class)
            .map(|base| claim(&mut taken, base, &class.qualified_name));
        slot.record = convention
            .record_base(class)
            .map(|base| claim(&mut taken, base, &class.qualified_name));
    }

    names
}

fn claim(taken: &mut HashSet<String>, base: String, owner: &str) -> String {
    if taken.insert(base.clone()) {
        return base;
    }
    let mut n = 2u32;
    loop {
        let candidate = format!("{base}{n}");
        if taken.insert(candidate.clone()) {
            tracing::debug!(%owner, %base, %candidate, "name taken; disambiguated");
            return candidate;
        }
        n += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ClassDecl, ClassKind, ModuleDecl};

    fn names_of(graph: &SchemaGraph, names: &[AllocatedNames], class: &str) -> AllocatedNames {
        names[graph.lookup(class).unwrap().index()].clone()
    }

    #[test]
    fn names_follow_kind() {
        let graph = SchemaGraph::build(vec![
            ModuleDecl::new("Shapes")
                .class(ClassDecl::abstract_class("Shape"))
                .class(ClassDecl::open("Polygon").extends("Shape"))
                .class(ClassDecl::final_class("Square").extends("Polygon")),
        ])
        .unwrap();
        let names = allocate(&graph, &NamingConvention::default());

        let shape = names_of(&graph, &names, "Shapes.Shape");
        assert_eq!(shape.interface.as_deref(), Some("Shape"));
        assert_eq!(shape.record, None);

        let polygon = names_of(&graph, &names, "Shapes.Polygon");
        assert_eq!(polygon.interface.as_deref(), Some("IPolygon"));
        assert_eq!(polygon.record.as_deref(), Some("Polygon"));

        let square = names_of(&graph, &names, "Shapes.Square");
        assert_eq!(square.interface, None);
        assert_eq!(square.record.as_deref(), Some("Square"));

        let module = names_of(&graph, &names, "Shapes");
        assert_eq!(module.interface, None);
        assert_eq!(module.record.as_deref(), Some("Shapes"));
    }

    #[test]
    fn open_module_gets_suffixed_record() {
        let graph =
            SchemaGraph::build(vec![ModuleDecl::new("Base").kind(ClassKind::Open)]).unwrap();
        let names = allocate(&graph, &NamingConvention::default());
        let module = names_of(&graph, &names, "Base");
        assert_eq!(module.interface.as_deref(), Some("Base"));
        assert_eq!(module.record.as_deref(), Some("BaseImpl"));
    }

    #[test]
    fn module_wins_collisions() {
        let graph = SchemaGraph::build(vec![
            ModuleDecl::new("Foo").class(ClassDecl::abstract_class("Foo")),
            ModuleDecl::new("Other")
                .class(ClassDecl::final_class("Wither"))
                .class(ClassDecl::final_class("Foo")),
        ])
        .unwrap();
        let names = allocate(&graph, &NamingConvention::default());

        assert_eq!(names_of(&graph, &names, "Foo").record.as_deref(), Some("Foo"));
        assert_eq!(
            names_of(&graph, &names, "Foo.Foo").interface.as_deref(),
            Some("Foo2")
        );
        assert_eq!(
            names_of(&graph, &names, "Other.Foo").record.as_deref(),
            Some("Foo3")
        );
        assert_eq!(
            names_of(&graph, &names, "Other.Wither").record.as_deref(),
            Some("Wither2")
        );
    }

    #[test]
    fn reserved_names_are_suffixed() {
        let graph = SchemaGraph::build(vec![
            ModuleDecl::new("Kit")
                .class(ClassDecl::final_class("Memento"))
                .class(ClassDecl::open("Record"))
                .class(ClassDecl::abstract_class("List"))
                .class(ClassDecl::final_class("Pair")),
        ])
        .unwrap();
        let names = allocate(&graph, &NamingConvention::default());

        assert_eq!(
            names_of(&graph, &names, "Kit.Memento").record.as_deref(),
            Some("Memento2")
        );
        let record = names_of(&graph, &names, "Kit.Record");
        assert_eq!(record.interface.as_deref(), Some("IRecord"));
        assert_eq!(record.record.as_deref(), Some("Record2"));
        assert_eq!(
            names_of(&graph, &names, "Kit.List").interface.as_deref(),
            Some("List2")
        );
        assert_eq!(
            names_of(&graph, &names, "Kit.Pair").record.as_deref(),
            Some("Pair")
        );
    }

    #[test]
    fn validates_convention() {
        assert!(NamingConvention::default().validate().is_ok());
        let bad_suffix = NamingConvention {
            module_record_suffix: String::new(),
            ..Default::default()
        };
        assert!(matches!(
            bad_suffix.validate(),
            Err(ConfigError::MalformedNaming { field: "module_record_suffix", .. })
        ));
        let bad_prefix = NamingConvention {
            interface_prefix: "1-".into(),
            ..Default::default()
        };
        assert!(bad_prefix.validate().is_err());
    }
}
