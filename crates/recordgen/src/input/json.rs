//! JSON schema documents.
//!
//! ```json
//! {
//!   "modules": [{
//!     "name": "Geometry",
//!     "kind": "final",
//!     "properties": [{ "name": "origin", "type": "Point?" }],
//!     "classes": [
//!       { "name": "Shape", "kind": "abstract", "doc": "Anything drawable." },
//!       { "name": "Point", "properties": [{ "name": "x", "type": "Float" }] }
//!     ]
//!   }]
//! }
//! ```

use crate::error::SchemaError;
use crate::schema::{SchemaDocument, SchemaGraph};
use serde::Deserialize;
use serde_json::Value;

/// A schema document that could not be read.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("malformed schema document: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// Parse a JSON schema document into a validated graph.
pub fn parse_schema(input: &Value) -> Result<SchemaGraph, ParseError> {
    let document = SchemaDocument::deserialize(input)?;
    tracing::debug!(modules = document.modules.len(), "schema document read");
    Ok(SchemaGraph::from_document(document)?)
}

/// Parse JSON schema text into a validated graph.
pub fn parse_schema_str(input: &str) -> Result<SchemaGraph, ParseError> {
    let value: Value = serde_json::from_str(input)?;
    parse_schema(&value)
}
