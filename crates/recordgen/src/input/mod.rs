//! Schema input.
//!
//! Reads a schema document and validates it into a [`SchemaGraph`](crate::schema::SchemaGraph).

mod json;

pub use json::{ParseError, parse_schema, parse_schema_str};
