//! Boundary emitters.
//!
//! Each emitter takes a resolved [`RecordModel`](crate::ir::RecordModel) and
//! produces source files. All emitters implement the
//! [`Emitter`](crate::traits::Emitter) trait for uniform access via the
//! registry.

// Java
#[cfg(feature = "backend-java")]
pub mod java;

#[cfg(feature = "backend-java")]
pub use java::{JavaEmitter, generate_java};

// JSON model dump
#[cfg(feature = "backend-json")]
pub mod json;

#[cfg(feature = "backend-json")]
pub use json::{JsonEmitter, generate_json};
