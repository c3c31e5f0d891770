//! The input class hierarchy.
//!
//! A [`SchemaGraph`] is built once from declarations and is read-only from
//! then on. Building validates everything the resolver relies on: names
//! resolve, ancestry is acyclic, nothing extends a final class, and every
//! property type parses. It also precomputes inheritance depth levels so
//! consumers can walk the hierarchy ancestors-first.

mod decl;
mod types;

pub use decl::{ClassDecl, ModuleDecl, PropertySpec, SchemaDocument};
pub use types::{ParsedType, TypeExpr, TypeParseError, TypeRef, parse_type};

use crate::error::SchemaError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Identity of a class within one [`SchemaGraph`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassId(u32);

impl ClassId {
    pub fn index(self) -> usize {
        self.0 as usize
    }

    fn from_index(index: usize) -> Self {
        Self(index as u32)
    }
}

/// The three class kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassKind {
    /// Concrete and non-extensible.
    #[default]
    Final,
    /// Concrete and extensible.
    Open,
    /// Extensible but never instantiated.
    Abstract,
}

impl ClassKind {
    /// Whether the class materializes a capability contract (interface).
    pub fn has_interface(self) -> bool {
        matches!(self, ClassKind::Open | ClassKind::Abstract)
    }

    /// Whether the class materializes a data carrier (record).
    pub fn has_record(self) -> bool {
        matches!(self, ClassKind::Open | ClassKind::Final)
    }
}

/// One declared property, validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyDecl {
    pub name: String,
    pub ty: TypeRef,
    pub nullable: bool,
    pub doc: Option<String>,
}

/// One schema class or module.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassNode {
    pub id: ClassId,
    /// Simple name, unique within its namespace.
    pub name: String,
    /// `Module.Class`, or the module name for a module.
    pub qualified_name: String,
    /// Name of the enclosing module.
    pub namespace: String,
    pub is_module: bool,
    pub kind: ClassKind,
    pub superclass: Option<ClassId>,
    pub own_properties: Vec<PropertyDecl>,
    pub doc: Option<String>,
    /// Number of ancestors.
    pub depth: usize,
}

/// The validated, immutable class hierarchy.
#[derive(Debug, Clone)]
pub struct SchemaGraph {
    classes: Vec<ClassNode>,
    by_name: HashMap<String, ClassId>,
    levels: Vec<Vec<ClassId>>,
}

/// A class whose superclass and property types are still names.
struct Pending {
    name: String,
    qualified_name: String,
    namespace: String,
    is_module: bool,
    kind: ClassKind,
    extends: Option<String>,
    properties: Vec<PropertySpec>,
    doc: Option<String>,
}

impl SchemaGraph {
    /// Validate declarations into a graph.
    ///
    /// Classes receive identities in declaration order: each module first,
    /// followed by the classes it contains.
    #[tracing::instrument(level = "debug", skip_all, fields(modules = modules.len()))]
    pub fn build(modules: Vec<ModuleDecl>) -> Result<Self, SchemaError> {
        let pending = collect(modules);

        let mut by_name = HashMap::with_capacity(pending.len());
        for (index, p) in pending.iter().enumerate() {
            if by_name
                .insert(p.qualified_name.clone(), ClassId::from_index(index))
                .is_some()
            {
                return Err(SchemaError::DuplicateClass {
                    name: p.qualified_name.clone(),
                });
            }
        }

        let lookup = |namespace: &str, name: &str| -> Option<ClassId> {
            by_name
                .get(&format!("{namespace}.{name}"))
                .or_else(|| by_name.get(name))
                .copied()
        };

        let mut superclasses = Vec::with_capacity(pending.len());
        for p in &pending {
            let superclass = match &p.extends {
                None => None,
                Some(name) => Some(lookup(&p.namespace, name).ok_or_else(|| {
                    SchemaError::UnknownSuperclass {
                        class: p.qualified_name.clone(),
                        superclass: name.clone(),
                    }
                })?),
            };
            superclasses.push(superclass);
        }

        let depths = compute_depths(&pending, &superclasses)?;

        for (p, superclass) in pending.iter().zip(&superclasses) {
            if let Some(parent) = superclass {
                let parent = &pending[parent.index()];
                if parent.kind == ClassKind::Final {
                    return Err(SchemaError::FinalSuperclass {
                        class: p.qualified_name.clone(),
                        superclass: parent.qualified_name.clone(),
                    });
                }
            }
        }

        let mut classes = Vec::with_capacity(pending.len());
        for (index, p) in pending.into_iter().enumerate() {
            let mut own_properties = Vec::with_capacity(p.properties.len());
            for spec in p.properties {
                let parsed = parse_type(&spec.ty).map_err(|source| SchemaError::InvalidType {
                    class: p.qualified_name.clone(),
                    property: spec.name.clone(),
                    source,
                })?;
                let ty = parsed.ty.try_map_class(&mut |name: String| {
                    lookup(&p.namespace, &name).ok_or_else(|| SchemaError::UnknownType {
                        class: p.qualified_name.clone(),
                        property: spec.name.clone(),
                        referenced: name,
                    })
                })?;
                own_properties.push(PropertyDecl {
                    name: spec.name,
                    ty,
                    nullable: parsed.nullable || spec.nullable,
                    doc: spec.doc,
                });
            }

            classes.push(ClassNode {
                id: ClassId::from_index(index),
                name: p.name,
                qualified_name: p.qualified_name,
                namespace: p.namespace,
                is_module: p.is_module,
                kind: p.kind,
                superclass: superclasses[index],
                own_properties,
                doc: p.doc,
                depth: depths[index],
            });
        }

        let mut levels: Vec<Vec<ClassId>> = Vec::new();
        for class in &classes {
            if levels.len() <= class.depth {
                levels.resize_with(class.depth + 1, Vec::new);
            }
            levels[class.depth].push(class.id);
        }

        tracing::debug!(
            classes = classes.len(),
            levels = levels.len(),
            "schema graph built"
        );

        Ok(Self {
            classes,
            by_name,
            levels,
        })
    }

    /// Build a graph straight from a schema document.
    pub fn from_document(document: SchemaDocument) -> Result<Self, SchemaError> {
        Self::build(document.modules)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// All classes, indexed by [`ClassId::index`].
    pub fn classes(&self) -> &[ClassNode] {
        &self.classes
    }

    pub fn get(&self, id: ClassId) -> &ClassNode {
        &self.classes[id.index()]
    }

    /// Find a class by qualified name (`Module.Class` or `Module`).
    pub fn lookup(&self, qualified_name: &str) -> Option<ClassId> {
        self.by_name.get(qualified_name).copied()
    }

    /// Ancestors of `id`, nearest first, excluding `id` itself.
    pub fn ancestors(&self, id: ClassId) -> impl Iterator<Item = &ClassNode> + '_ {
        std::iter::successors(self.get(id).superclass, |&current| {
            self.get(current).superclass
        })
        .map(|ancestor| self.get(ancestor))
    }

    /// The full inheritance chain of `id`, root ancestor first, `id` last.
    pub fn chain(&self, id: ClassId) -> Vec<ClassId> {
        let mut chain: Vec<ClassId> = self.ancestors(id).map(|c| c.id).collect();
        chain.reverse();
        chain.push(id);
        chain
    }

    /// Classes grouped by depth. Every class's ancestors sit in earlier levels.
    pub fn levels(&self) -> &[Vec<ClassId>] {
        &self.levels
    }
}

fn collect(modules: Vec<ModuleDecl>) -> Vec<Pending> {
    let mut pending = Vec::new();
    for module in modules {
        pending.push(Pending {
            name: module.name.clone(),
            qualified_name: module.name.clone(),
            namespace: module.name.clone(),
            is_module: true,
            kind: module.kind,
            extends: module.extends,
            properties: module.properties,
            doc: module.doc,
        });
        for class in module.classes {
            pending.push(Pending {
                qualified_name: format!("{}.{}", module.name, class.name),
                name: class.name,
                namespace: module.name.clone(),
                is_module: false,
                kind: class.kind,
                extends: class.extends,
                properties: class.properties,
                doc: class.doc,
            });
        }
    }
    pending
}

/// Depth of every class, rejecting cyclic ancestry.
fn compute_depths(
    pending: &[Pending],
    superclasses: &[Option<ClassId>],
) -> Result<Vec<usize>, SchemaError> {
    let mut depths: Vec<Option<usize>> = vec![None; pending.len()];

    for start in 0..pending.len() {
        let mut path: Vec<usize> = Vec::new();
        let mut current = Some(start);
        while let Some(index) = current {
            if depths[index].is_some() {
                break;
            }
            if let Some(pos) = path.iter().position(|&seen| seen == index) {
                let mut cycle: Vec<String> = path[pos..]
                    .iter()
                    .map(|&i| pending[i].qualified_name.clone())
                    .collect();
                cycle.push(pending[index].qualified_name.clone());
                return Err(SchemaError::CyclicAncestry { cycle });
            }
            path.push(index);
            current = superclasses[index].map(ClassId::index);
        }

        let mut depth = current
            .and_then(|known| depths[known])
            .map_or(0, |d| d + 1);
        for index in path.into_iter().rev() {
            depths[index] = Some(depth);
            depth += 1;
        }
    }

    Ok(depths.into_iter().map(|d| d.unwrap_or(0)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(name: &str, ty: &str) -> PropertySpec {
        PropertySpec::new(name, ty)
    }

    #[test]
    fn builds_levels_ancestors_first() {
        let graph = SchemaGraph::build(vec![
            ModuleDecl::new("M")
                .class(ClassDecl::final_class("Leaf").extends("Mid"))
                .class(ClassDecl::open("Mid").extends("Root"))
                .class(ClassDecl::abstract_class("Root")),
        ])
        .unwrap();

        let leaf = graph.lookup("M.Leaf").unwrap();
        let mid = graph.lookup("M.Mid").unwrap();
        let root = graph.lookup("M.Root").unwrap();
        let module = graph.lookup("M").unwrap();

        assert_eq!(graph.get(leaf).depth, 2);
        assert_eq!(graph.levels()[0], vec![module, root]);
        assert_eq!(graph.levels()[1], vec![mid]);
        assert_eq!(graph.levels()[2], vec![leaf]);
        assert_eq!(graph.chain(leaf), vec![root, mid, leaf]);
        let names: Vec<_> = graph.ancestors(leaf).map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Mid", "Root"]);
    }

    #[test]
    fn resolves_qualified_and_local_references() {
        let graph = SchemaGraph::build(vec![
            ModuleDecl::new("Geo").class(ClassDecl::abstract_class("Shape")),
            ModuleDecl::new("Draw")
                .class(ClassDecl::final_class("Circle").extends("Geo.Shape"))
                .class(
                    ClassDecl::final_class("Canvas")
                        .property(spec("shapes", "List<Geo.Shape>"))
                        .property(spec("focus", "Circle?")),
                ),
        ])
        .unwrap();

        let canvas = graph.get(graph.lookup("Draw.Canvas").unwrap());
        let shape = graph.lookup("Geo.Shape").unwrap();
        let circle = graph.lookup("Draw.Circle").unwrap();
        assert_eq!(
            canvas.own_properties[0].ty,
            TypeRef::List(Box::new(TypeRef::Class(shape)))
        );
        assert_eq!(canvas.own_properties[1].ty, TypeRef::Class(circle));
        assert!(canvas.own_properties[1].nullable);
        assert_eq!(graph.get(circle).superclass, Some(shape));
    }

    #[test]
    fn rejects_cycles() {
        let err = SchemaGraph::build(vec![
            ModuleDecl::new("M")
                .class(ClassDecl::open("A").extends("B"))
                .class(ClassDecl::open("B").extends("A")),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            SchemaError::CyclicAncestry {
                cycle: vec!["M.A".into(), "M.B".into(), "M.A".into()]
            }
        );
    }

    #[test]
    fn rejects_missing_superclass() {
        let err = SchemaGraph::build(vec![
            ModuleDecl::new("M").class(ClassDecl::final_class("A").extends("Nope")),
        ])
        .unwrap_err();
        assert!(matches!(err, SchemaError::UnknownSuperclass { .. }));
    }

    #[test]
    fn rejects_extending_final() {
        let err = SchemaGraph::build(vec![
            ModuleDecl::new("M")
                .class(ClassDecl::final_class("A"))
                .class(ClassDecl::final_class("B").extends("A")),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            SchemaError::FinalSuperclass {
                class: "M.B".into(),
                superclass: "M.A".into()
            }
        );
    }

    #[test]
    fn rejects_duplicate_classes() {
        let err = SchemaGraph::build(vec![
            ModuleDecl::new("M")
                .class(ClassDecl::final_class("A"))
                .class(ClassDecl::open("A")),
        ])
        .unwrap_err();
        assert_eq!(err, SchemaError::DuplicateClass { name: "M.A".into() });
    }

    #[test]
    fn rejects_unknown_and_malformed_types() {
        let unknown = SchemaGraph::build(vec![
            ModuleDecl::new("M").class(ClassDecl::final_class("A").property(spec("x", "Ghost"))),
        ])
        .unwrap_err();
        assert!(matches!(unknown, SchemaError::UnknownType { ref referenced, .. } if referenced == "Ghost"));

        let malformed = SchemaGraph::build(vec![
            ModuleDecl::new("M").class(ClassDecl::final_class("A").property(spec("x", "List<"))),
        ])
        .unwrap_err();
        assert!(matches!(malformed, SchemaError::InvalidType { .. }));
    }
}
