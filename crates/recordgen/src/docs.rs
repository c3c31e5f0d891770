//! Documentation merging.
//!
//! A record restates inherited properties, so its documentation has to
//! gather them as well: the class doc leads, followed by one parameter entry
//! per documented component in component order.

use crate::flatten::FlatProperty;
use crate::schema::ClassNode;
use serde::{Deserialize, Serialize};

/// Aggregate documentation for a record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocBlock {
    pub lead: Option<String>,
    pub params: Vec<ParamDoc>,
}

/// One parameter-style entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamDoc {
    pub name: String,
    pub text: String,
}

/// Merge a class doc with the docs of its flattened properties.
pub fn merge(class: &ClassNode, flattened: &[FlatProperty]) -> DocBlock {
    DocBlock {
        lead: normalize(class.doc.as_deref()),
        params: flattened
            .iter()
            .filter_map(|p| {
                normalize(p.doc.as_deref()).map(|text| ParamDoc {
                    name: p.name.clone(),
                    text,
                })
            })
            .collect(),
    }
}

/// Blank docs count as absent.
pub(crate) fn normalize(doc: Option<&str>) -> Option<String> {
    doc.map(str::trim)
        .filter(|d| !d.is_empty())
        .map(String::from)
}

impl DocBlock {
    pub fn is_empty(&self) -> bool {
        self.lead.is_none() && self.params.is_empty()
    }

    /// Render as a Javadoc comment, each line prefixed with `indent`.
    pub fn to_javadoc(&self, indent: &str) -> Option<String> {
        if self.is_empty() {
            return None;
        }
        let mut body: Vec<String> = Vec::new();
        if let Some(lead) = &self.lead {
            body.extend(lead.lines().map(|l| l.trim_end().to_string()));
        }
        if !self.params.is_empty() {
            if self.lead.is_some() {
                body.push(String::new());
            }
            for param in &self.params {
                let mut lines = param.text.lines();
                let first = lines.next().unwrap_or_default();
                body.push(format!("@param {} {}", param.name, first.trim_end()));
                // Continuation lines hang under the description.
                let hang = " ".repeat("@param ".len() + param.name.len() + 1);
                body.extend(lines.map(|l| {
                    let l = l.trim();
                    if l.is_empty() {
                        String::new()
                    } else {
                        format!("{hang}{l}")
                    }
                }));
            }
        }
        Some(javadoc(&body, indent))
    }
}

/// Wrap pre-split lines in a `/** ... */` block.
pub(crate) fn javadoc(lines: &[String], indent: &str) -> String {
    let mut out = format!("{indent}/**\n");
    for line in lines {
        if line.is_empty() {
            out.push_str(&format!("{indent} *\n"));
        } else {
            out.push_str(&format!("{indent} * {line}\n"));
        }
    }
    out.push_str(&format!("{indent} */\n"));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flatten::flatten;
    use crate::schema::{ClassDecl, ModuleDecl, PropertySpec, SchemaGraph};

    fn graph() -> SchemaGraph {
        SchemaGraph::build(vec![
            ModuleDecl::new("M")
                .class(
                    ClassDecl::abstract_class("Base")
                        .property(PropertySpec::new("id", "Int").with_docs("Stable identifier.")),
                )
                .class(
                    ClassDecl::final_class("Item")
                        .extends("Base")
                        .with_docs("An item.")
                        .property(PropertySpec::new("label", "String"))
                        .property(PropertySpec::new("note", "String?").with_docs("   ")),
                ),
        ])
        .unwrap()
    }

    #[test]
    fn merges_inherited_docs_and_skips_undocumented() {
        let graph = graph();
        let item = graph.lookup("M.Item").unwrap();
        let block = merge(graph.get(item), &flatten(&graph, item).unwrap());
        assert_eq!(block.lead.as_deref(), Some("An item."));
        assert_eq!(
            block.params,
            vec![ParamDoc {
                name: "id".into(),
                text: "Stable identifier.".into()
            }]
        );
    }

    #[test]
    fn renders_javadoc() {
        let block = DocBlock {
            lead: Some("A point.\nIn two dimensions.".into()),
            params: vec![
                ParamDoc {
                    name: "x".into(),
                    text: "Horizontal.".into(),
                },
                ParamDoc {
                    name: "y".into(),
                    text: "Vertical,\nupwards.".into(),
                },
            ],
        };
        let expected = "/**\n * A point.\n * In two dimensions.\n *\n * @param x Horizontal.\n * @param y Vertical,\n *          upwards.\n */\n";
        assert_eq!(block.to_javadoc("").unwrap(), expected);
    }

    #[test]
    fn empty_block_renders_nothing() {
        assert!(DocBlock::default().to_javadoc("  ").is_none());
    }
}
