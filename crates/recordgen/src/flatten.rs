//! Property flattening.
//!
//! A record cannot inherit fields, so it restates every ancestor's
//! properties. The flattened sequence is the chain's own properties
//! concatenated root ancestor first, leaf last, in declaration order.

use crate::error::SchemaError;
use crate::schema::{ClassId, ClassNode, SchemaGraph, TypeRef};
use serde::{Deserialize, Serialize};

/// A property in a flattened sequence, remembering where it was declared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatProperty {
    pub name: String,
    pub ty: TypeRef,
    pub nullable: bool,
    pub doc: Option<String>,
    pub declared_in: ClassId,
}

/// Flatten the full chain of `id`.
pub fn flatten(graph: &SchemaGraph, id: ClassId) -> Result<Vec<FlatProperty>, SchemaError> {
    graph
        .chain(id)
        .into_iter()
        .try_fold(Vec::new(), |inherited, level| {
            extend(graph, &inherited, graph.get(level))
        })
}

/// Append `class`'s own properties to its superclass's flattened sequence.
///
/// The resolver calls this with the memoized sequence of the superclass so
/// each class is flattened exactly once.
pub fn extend(
    graph: &SchemaGraph,
    inherited: &[FlatProperty],
    class: &ClassNode,
) -> Result<Vec<FlatProperty>, SchemaError> {
    let mut flat = Vec::with_capacity(inherited.len() + class.own_properties.len());
    flat.extend_from_slice(inherited);

    for property in &class.own_properties {
        if let Some(existing) = flat.iter().find(|p| p.name == property.name) {
            return Err(SchemaError::DuplicateProperty {
                property: property.name.clone(),
                declared_in: graph.get(existing.declared_in).qualified_name.clone(),
                redeclared_in: class.qualified_name.clone(),
            });
        }
        flat.push(FlatProperty {
            name: property.name.clone(),
            ty: property.ty.clone(),
            nullable: property.nullable,
            doc: property.doc.clone(),
            declared_in: class.id,
        });
    }

    Ok(flat)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ClassDecl, ModuleDecl, PropertySpec};

    fn names(props: &[FlatProperty]) -> Vec<&str> {
        props.iter().map(|p| p.name.as_str()).collect()
    }

    #[test]
    fn chain_flattens_root_first() {
        let graph = SchemaGraph::build(vec![
            ModuleDecl::new("M")
                .class(ClassDecl::open("Foo").property(PropertySpec::new("one", "Int")))
                .class(ClassDecl::open("None").extends("Foo"))
                .class(
                    ClassDecl::open("Bar")
                        .extends("None")
                        .property(PropertySpec::new("two", "String")),
                )
                .class(
                    ClassDecl::final_class("Baz")
                        .extends("Bar")
                        .property(PropertySpec::new("three", "Boolean")),
                ),
        ])
        .unwrap();

        let baz = graph.lookup("M.Baz").unwrap();
        let flat = flatten(&graph, baz).unwrap();
        assert_eq!(names(&flat), ["one", "two", "three"]);
        assert_eq!(flat[0].declared_in, graph.lookup("M.Foo").unwrap());
        assert_eq!(flat[2].declared_in, baz);
    }

    #[test]
    fn declaration_order_is_preserved() {
        let graph = SchemaGraph::build(vec![
            ModuleDecl::new("M").class(
                ClassDecl::final_class("A")
                    .property(PropertySpec::new("zeta", "Int"))
                    .property(PropertySpec::new("alpha", "Int"))
                    .property(PropertySpec::new("mid", "Int")),
            ),
        ])
        .unwrap();
        let flat = flatten(&graph, graph.lookup("M.A").unwrap()).unwrap();
        assert_eq!(names(&flat), ["zeta", "alpha", "mid"]);
    }

    #[test]
    fn inherited_duplicate_names_both_classes() {
        let graph = SchemaGraph::build(vec![
            ModuleDecl::new("M")
                .class(ClassDecl::abstract_class("Base").property(PropertySpec::new("id", "Int")))
                .class(ClassDecl::open("Mid").extends("Base"))
                .class(
                    ClassDecl::final_class("Leaf")
                        .extends("Mid")
                        .property(PropertySpec::new("id", "String")),
                ),
        ])
        .unwrap();

        let err = flatten(&graph, graph.lookup("M.Leaf").unwrap()).unwrap_err();
        assert_eq!(
            err,
            SchemaError::DuplicateProperty {
                property: "id".into(),
                declared_in: "M.Base".into(),
                redeclared_in: "M.Leaf".into(),
            }
        );
    }

    #[test]
    fn own_duplicate_is_rejected() {
        let graph = SchemaGraph::build(vec![
            ModuleDecl::new("M").class(
                ClassDecl::final_class("A")
                    .property(PropertySpec::new("x", "Int"))
                    .property(PropertySpec::new("x", "Int")),
            ),
        ])
        .unwrap();
        let err = flatten(&graph, graph.lookup("M.A").unwrap()).unwrap_err();
        assert!(matches!(
            err,
            SchemaError::DuplicateProperty { ref declared_in, ref redeclared_in, .. }
                if declared_in == "M.A" && redeclared_in == "M.A"
        ));
    }
}
