//! Property type references and the type expression parser.
//!
//! Schemas spell property types as short expressions (`List<String?>`,
//! `Map<String, Shapes.Circle>`). Parsing yields a [`TypeExpr`] whose class
//! references are still names; [`SchemaGraph::build`](super::SchemaGraph::build)
//! resolves those names into a [`TypeRef`] over class identities.

use super::ClassId;
use serde::{Deserialize, Serialize};

/// A semantic type reference, generic over how class references are held.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeRef<C = ClassId> {
    // Primitives
    Boolean,
    Int,
    Float,
    String,

    // Containers
    List(Box<TypeRef<C>>),
    Set(Box<TypeRef<C>>),
    Map {
        key: Box<TypeRef<C>>,
        value: Box<TypeRef<C>>,
    },

    /// Nested nullability (`List<String?>`). Top-level nullability lives on
    /// the property itself.
    Nullable(Box<TypeRef<C>>),

    /// Nominal reference to another schema class.
    Class(C),

    // Escape hatch
    Any,
}

/// A type reference whose class references are unresolved names.
pub type TypeExpr = TypeRef<String>;

impl<C> TypeRef<C> {
    /// Rewrite every class reference, failing on the first one `f` rejects.
    pub fn try_map_class<D, E>(
        self,
        f: &mut impl FnMut(C) -> Result<D, E>,
    ) -> Result<TypeRef<D>, E> {
        Ok(match self {
            TypeRef::Boolean => TypeRef::Boolean,
            TypeRef::Int => TypeRef::Int,
            TypeRef::Float => TypeRef::Float,
            TypeRef::String => TypeRef::String,
            TypeRef::Any => TypeRef::Any,
            TypeRef::List(inner) => TypeRef::List(Box::new(inner.try_map_class(f)?)),
            TypeRef::Set(inner) => TypeRef::Set(Box::new(inner.try_map_class(f)?)),
            TypeRef::Map { key, value } => TypeRef::Map {
                key: Box::new(key.try_map_class(f)?),
                value: Box::new(value.try_map_class(f)?),
            },
            TypeRef::Nullable(inner) => TypeRef::Nullable(Box::new(inner.try_map_class(f)?)),
            TypeRef::Class(c) => TypeRef::Class(f(c)?),
        })
    }

    /// Visit every class reference, outermost first.
    pub fn for_each_class(&self, f: &mut impl FnMut(&C)) {
        match self {
            TypeRef::List(inner) | TypeRef::Set(inner) | TypeRef::Nullable(inner) => {
                inner.for_each_class(f)
            }
            TypeRef::Map { key, value } => {
                key.for_each_class(f);
                value.for_each_class(f);
            }
            TypeRef::Class(c) => f(c),
            TypeRef::Boolean | TypeRef::Int | TypeRef::Float | TypeRef::String | TypeRef::Any => {}
        }
    }
}

/// Error produced while parsing a type expression.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TypeParseError {
    #[error("empty type expression")]
    Empty,

    #[error("unexpected {found} at offset {offset} in `{input}`")]
    Unexpected {
        input: String,
        offset: usize,
        found: String,
    },

    #[error("`{name}` takes {expected} type argument(s), got {found}")]
    Arity {
        name: String,
        expected: usize,
        found: usize,
    },
}

/// A parsed property type: the type itself plus top-level nullability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedType {
    pub ty: TypeExpr,
    pub nullable: bool,
}

/// Parse a type expression such as `Map<String, List<Int?>>?`.
pub fn parse_type(input: &str) -> Result<ParsedType, TypeParseError> {
    if input.trim().is_empty() {
        return Err(TypeParseError::Empty);
    }
    let mut parser = TypeParser { input, pos: 0 };
    let ty = parser.parse_type()?;
    parser.skip_ws();
    if parser.pos < input.len() {
        return Err(parser.unexpected());
    }
    Ok(match ty {
        TypeRef::Nullable(inner) => ParsedType {
            ty: *inner,
            nullable: true,
        },
        ty => ParsedType {
            ty,
            nullable: false,
        },
    })
}

struct TypeParser<'a> {
    input: &'a str,
    pos: usize,
}

impl TypeParser<'_> {
    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn skip_ws(&mut self) {
        while let Some(c) = self.peek() {
            if !c.is_whitespace() {
                break;
            }
            self.pos += c.len_utf8();
        }
    }

    fn eat(&mut self, expected: char) -> bool {
        self.skip_ws();
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn unexpected(&self) -> TypeParseError {
        TypeParseError::Unexpected {
            input: self.input.to_string(),
            offset: self.pos,
            found: match self.peek() {
                Some(c) => format!("`{c}`"),
                None => "end of input".to_string(),
            },
        }
    }

    fn parse_type(&mut self) -> Result<TypeExpr, TypeParseError> {
        let name = self.parse_name()?;
        let mut args = Vec::new();
        if self.eat('<') {
            loop {
                args.push(self.parse_type()?);
                if self.eat(',') {
                    continue;
                }
                if self.eat('>') {
                    break;
                }
                return Err(self.unexpected());
            }
        }
        let ty = build(name, args)?;
        if self.eat('?') {
            Ok(TypeRef::Nullable(Box::new(ty)))
        } else {
            Ok(ty)
        }
    }

    /// A dotted identifier path (`Circle`, `Shapes.Circle`).
    fn parse_name(&mut self) -> Result<String, TypeParseError> {
        self.skip_ws();
        let start = self.pos;
        loop {
            let segment_start = self.pos;
            while let Some(c) = self.peek() {
                let ok = if self.pos == segment_start {
                    c.is_alphabetic() || c == '_'
                } else {
                    c.is_alphanumeric() || c == '_'
                };
                if !ok {
                    break;
                }
                self.pos += c.len_utf8();
            }
            if self.pos == segment_start {
                return Err(self.unexpected());
            }
            if self.peek() == Some('.') {
                self.pos += 1;
            } else {
                break;
            }
        }
        Ok(self.input[start..self.pos].to_string())
    }
}

fn build(name: String, mut args: Vec<TypeExpr>) -> Result<TypeExpr, TypeParseError> {
    let expected = match name.as_str() {
        "List" | "Set" => 1,
        "Map" => 2,
        _ => 0,
    };
    if args.len() != expected {
        return Err(TypeParseError::Arity {
            name,
            expected,
            found: args.len(),
        });
    }
    Ok(match name.as_str() {
        "Boolean" => TypeRef::Boolean,
        "Int" => TypeRef::Int,
        "Float" => TypeRef::Float,
        "String" => TypeRef::String,
        "Any" => TypeRef::Any,
        "List" => TypeRef::List(Box::new(args.remove(0))),
        "Set" => TypeRef::Set(Box::new(args.remove(0))),
        "Map" => {
            let value = args.remove(1);
            let key = args.remove(0);
            TypeRef::Map {
                key: Box::new(key),
                value: Box::new(value),
            }
        }
        _ => TypeRef::Class(name),
    })
}
