//! The copy-with protocol over dynamic values.
//!
//! [`RecordValue`] is an immutable instance of a [`RecordDescriptor`];
//! [`Memento`] is its staging type. Neither the copy constructor nor the
//! finalize step is public: the only way to a changed record is
//! [`Wither::with`], which never touches the receiver.
//!
//! ```
//! use recordgen::wither::runtime::{RecordValue, Value, Wither};
//! # use recordgen::{GenerateOptions, SchemaGraph, resolve};
//! # use recordgen::schema::{ModuleDecl, ClassDecl, PropertySpec};
//! # let graph = SchemaGraph::build(vec![ModuleDecl::new("M").class(
//! #     ClassDecl::final_class("Pair")
//! #         .property(PropertySpec::new("one", "Int"))
//! #         .property(PropertySpec::new("two", "String")),
//! # )]).unwrap();
//! # let model = resolve(&graph, &GenerateOptions::records().with_withers()).unwrap();
//! # let descriptor = std::sync::Arc::new(model.record("Pair").unwrap().clone());
//! let pair = RecordValue::new(descriptor, vec![Value::Int(1), Value::from("a")]).unwrap();
//! let changed = pair.with(|m| {
//!     m.set("two", "b").unwrap();
//! });
//! assert_eq!(changed.get("two"), Some(&Value::from("b")));
//! assert_eq!(pair.get("two"), Some(&Value::from("a")));
//! ```

use crate::ir::RecordDescriptor;
use crate::schema::TypeRef;
use std::sync::Arc;

/// Produce a new value from `self` and a mutation of staging type `S`.
pub trait Wither<S>: Sized {
    fn with(&self, mutate: impl FnOnce(&mut S)) -> Self;
}

/// A dynamic component value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Boolean(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<Value>),
    Map(Vec<(Value, Value)>),
    Record(Arc<RecordValue>),
}

/// A value rejected by a record or memento.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValueError {
    #[error("`{record}` has no component `{component}`")]
    UnknownComponent { record: String, component: String },

    #[error("`{record}` takes {expected} component(s), got {found}")]
    Arity {
        record: String,
        expected: usize,
        found: usize,
    },

    #[error("`{record}.{component}` does not accept {found:?}")]
    Mismatch {
        record: String,
        component: String,
        found: Value,
    },
}

/// An immutable instance of a generated record.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordValue {
    descriptor: Arc<RecordDescriptor>,
    values: Vec<Value>,
}

/// Staging type of a [`RecordValue`].
#[derive(Debug)]
pub struct Memento {
    descriptor: Arc<RecordDescriptor>,
    values: Vec<Value>,
}

impl RecordValue {
    /// Build a record from component values in component order.
    pub fn new(descriptor: Arc<RecordDescriptor>, values: Vec<Value>) -> Result<Self, ValueError> {
        if values.len() != descriptor.components.len() {
            return Err(ValueError::Arity {
                record: descriptor.name.clone(),
                expected: descriptor.components.len(),
                found: values.len(),
            });
        }
        for (component, value) in descriptor.components.iter().zip(&values) {
            if !conforms(value, &component.ty, component.nullable) {
                return Err(ValueError::Mismatch {
                    record: descriptor.name.clone(),
                    component: component.name.clone(),
                    found: value.clone(),
                });
            }
        }
        Ok(Self { descriptor, values })
    }

    pub fn descriptor(&self) -> &RecordDescriptor {
        &self.descriptor
    }

    pub fn get(&self, component: &str) -> Option<&Value> {
        position(&self.descriptor, component).map(|i| &self.values[i])
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }
}

impl Wither<Memento> for RecordValue {
    fn with(&self, mutate: impl FnOnce(&mut Memento)) -> Self {
        let mut memento = Memento::copy_of(self);
        mutate(&mut memento);
        memento.finish()
    }
}

impl Memento {
    fn copy_of(record: &RecordValue) -> Self {
        Self {
            descriptor: Arc::clone(&record.descriptor),
            values: record.values.clone(),
        }
    }

    /// Values are checked on the way in, so finishing cannot fail.
    fn finish(self) -> RecordValue {
        RecordValue {
            descriptor: self.descriptor,
            values: self.values,
        }
    }

    /// Stage a new value for `component`.
    pub fn set(
        &mut self,
        component: &str,
        value: impl Into<Value>,
    ) -> Result<&mut Self, ValueError> {
        let value = value.into();
        let index =
            position(&self.descriptor, component).ok_or_else(|| ValueError::UnknownComponent {
                record: self.descriptor.name.clone(),
                component: component.to_string(),
            })?;
        let spec = &self.descriptor.components[index];
        if !conforms(&value, &spec.ty, spec.nullable) {
            return Err(ValueError::Mismatch {
                record: self.descriptor.name.clone(),
                component: component.to_string(),
                found: value,
            });
        }
        self.values[index] = value;
        Ok(self)
    }

    /// Currently staged value of `component`.
    pub fn get(&self, component: &str) -> Option<&Value> {
        position(&self.descriptor, component).map(|i| &self.values[i])
    }
}

fn position(descriptor: &RecordDescriptor, component: &str) -> Option<usize> {
    descriptor.components.iter().position(|c| c.name == component)
}

/// Whether `value` fits a component of type `ty`.
///
/// Class-typed components accept any record; subtyping is the resolver's
/// concern, not the value layer's.
fn conforms(value: &Value, ty: &TypeRef, nullable: bool) -> bool {
    match (value, ty) {
        (Value::Null, TypeRef::Nullable(_) | TypeRef::Any) => true,
        (Value::Null, _) => nullable,
        (_, TypeRef::Nullable(inner)) => conforms(value, inner, false),
        (_, TypeRef::Any) => true,
        (Value::Boolean(_), TypeRef::Boolean)
        | (Value::Int(_), TypeRef::Int)
        | (Value::Float(_), TypeRef::Float)
        | (Value::String(_), TypeRef::String)
        | (Value::Record(_), TypeRef::Class(_)) => true,
        (Value::List(items), TypeRef::List(element) | TypeRef::Set(element)) => {
            items.iter().all(|item| conforms(item, element, false))
        }
        (Value::Map(entries), TypeRef::Map { key, value }) => entries
            .iter()
            .all(|(k, v)| conforms(k, key, false) && conforms(v, value, false)),
        _ => false,
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<RecordValue> for Value {
    fn from(value: RecordValue) -> Self {
        Value::Record(Arc::new(value))
    }
}
