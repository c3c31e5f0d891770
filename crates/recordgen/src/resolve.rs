//! Hierarchy resolution: the interface/record decomposition.
//!
//! Walks the graph one depth level at a time. Classes within a level only
//! depend on classes in earlier levels, so a level resolves in parallel and
//! the end of the level is the join barrier. Each class is resolved exactly
//! once; descendants read their superclass's memoized result.

use crate::docs;
use crate::error::SchemaError;
use crate::flatten;
use crate::ir::{Decoration, InterfaceDescriptor, RecordDescriptor, RecordModel, ResolvedClass};
use crate::naming::{self, AllocatedNames};
use crate::options::{BUILDER_ANNOTATION, GenerateOptions};
use crate::schema::{ClassId, SchemaGraph};
use crate::wither;
use rayon::prelude::*;

/// Resolve every class of `graph`.
///
/// When several classes fail, the error of the lowest class identity in the
/// shallowest failing level is returned, independent of scheduling.
#[tracing::instrument(level = "debug", skip_all, fields(classes = graph.len()))]
pub fn resolve(graph: &SchemaGraph, options: &GenerateOptions) -> Result<RecordModel, SchemaError> {
    let names = naming::allocate(graph, &options.naming);
    let resolver = HierarchyResolver {
        graph,
        names: &names,
        options,
    };

    let mut memo: Vec<Option<ResolvedClass>> = (0..graph.len()).map(|_| None).collect();
    for (depth, level) in graph.levels().iter().enumerate() {
        let results: Vec<Result<ResolvedClass, SchemaError>> = level
            .par_iter()
            .map(|&id| resolver.resolve_class(id, &memo))
            .collect();
        for result in results {
            let resolved = result?;
            let index = resolved.class.index();
            memo[index] = Some(resolved);
        }
        tracing::trace!(depth, classes = level.len(), "level resolved");
    }

    let classes: Vec<ResolvedClass> = memo.into_iter().flatten().collect();
    debug_assert_eq!(classes.len(), graph.len());

    Ok(RecordModel {
        classes,
        wither: options.enable_withers.then(|| wither::contract(options)),
    })
}

struct HierarchyResolver<'a> {
    graph: &'a SchemaGraph,
    names: &'a [AllocatedNames],
    options: &'a GenerateOptions,
}

impl HierarchyResolver<'_> {
    fn resolve_class(
        &self,
        id: ClassId,
        memo: &[Option<ResolvedClass>],
    ) -> Result<ResolvedClass, SchemaError> {
        let class = self.graph.get(id);
        let parent = class
            .superclass
            .and_then(|superclass| memo[superclass.index()].as_ref());
        debug_assert!(
            class.superclass.is_none() || parent.is_some(),
            "superclass of {} not resolved first",
            class.qualified_name
        );

        let inherited = parent.map_or(&[][..], |p| p.properties.as_slice());
        let properties = flatten::extend(self.graph, inherited, class)?;

        let names = &self.names[id.index()];
        let mut contracts = parent.map(|p| p.contracts.clone()).unwrap_or_default();

        let interface = names.interface.clone().map(|name| InterfaceDescriptor {
            extends: parent
                .and_then(|p| p.interface.as_ref())
                .map(|i| i.name.clone()),
            methods: class.own_properties.iter().map(Into::into).collect(),
            doc: docs::normalize(class.doc.as_deref()),
            name,
        });
        if let Some(interface) = &interface {
            contracts.push(interface.name.clone());
        }

        let record = names.record.clone().map(|name| RecordDescriptor {
            memento: self
                .options
                .enable_withers
                .then(|| wither::memento_for(&name, &properties)),
            doc: docs::merge(class, &properties),
            decorations: if self.options.enable_builder_annotation {
                vec![Decoration::new(BUILDER_ANNOTATION)]
            } else {
                Vec::new()
            },
            implements: contracts.clone(),
            components: properties.clone(),
            name,
        });

        tracing::trace!(
            class = %class.qualified_name,
            interface = interface.as_ref().map(|i| i.name.as_str()),
            record = record.as_ref().map(|r| r.name.as_str()),
            "class resolved"
        );

        Ok(ResolvedClass {
            class: id,
            qualified_name: class.qualified_name.clone(),
            interface,
            record,
            contracts,
            properties,
        })
    }
}
