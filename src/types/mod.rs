//! Column type model and the descriptor resolver.
//!
//! The server advertises each column's type as text such as
//! `Array(Nullable(DateTime64(3, 'UTC')))`. [`resolve`] turns that text into a
//! [`TypeNode`] using the constructors known to a [`TypeRegistry`].

mod lexer;
mod registry;
mod resolver;

use std::fmt;

pub use lexer::{Token, TokenKind, tokenize};
pub use registry::{
    GLOBAL_TYPE_REGISTRY, ParamShape, TypeRegistry, TypeRegistryBuilder, TypeStrategy,
};
pub use resolver::{ResolutionErrorKind, TypeResolutionError, resolve};


/// A resolved column type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeNode {
    Base(String),
    Nullable(Box<TypeNode>),
    Array(Box<TypeNode>),
    Tuple(Vec<TypeNode>),
    Parameterized { name: String, params: Vec<TypeParam> },
}

/// An argument of a parameterized type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeParam {
    Number(i64),
    Str(String),
    EnumEntry { name: String, value: i64 },
    Type(TypeNode),
}

/// The syntactic kind of a [`TypeParam`], used to describe expected argument shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamKind {
    Number,
    Str,
    EnumEntry,
    Type,
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ParamKind::Number => "number",
            ParamKind::Str => "string",
            ParamKind::EnumEntry => "enum entry",
            ParamKind::Type => "type",
        };
        f.write_str(s)
    }
}

impl TypeParam {
    pub fn kind(&self) -> ParamKind {
        match self {
            TypeParam::Number(_) => ParamKind::Number,
            TypeParam::Str(_) => ParamKind::Str,
            TypeParam::EnumEntry { .. } => ParamKind::EnumEntry,
            TypeParam::Type(_) => ParamKind::Type,
        }
    }
}

impl TypeNode {
    pub fn base(name: impl Into<String>) -> Self {
        TypeNode::Base(name.into())
    }

    pub fn nullable(inner: TypeNode) -> Self {
        TypeNode::Nullable(Box::new(inner))
    }

    pub fn array(element: TypeNode) -> Self {
        TypeNode::Array(Box::new(element))
    }

    /// Constructor name as it appears in the descriptor
    pub fn name(&self) -> &str {
        match self {
            TypeNode::Base(name) | TypeNode::Parameterized { name, .. } => name,
            TypeNode::Nullable(_) => "Nullable",
            TypeNode::Array(_) => "Array",
            TypeNode::Tuple(_) => "Tuple",
        }
    }

    pub fn is_nullable(&self) -> bool {
        matches!(self, TypeNode::Nullable(_))
    }
}

fn write_list<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    f.write_str("(")?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    f.write_str(")")
}

fn write_quoted(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    f.write_str("'")?;
    for c in s.chars() {
        if c == '\'' || c == '\\' {
            f.write_str("\\")?;
        }
        write!(f, "{c}")?;
    }
    f.write_str("'")
}

/// Renders the canonical descriptor text
impl fmt::Display for TypeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeNode::Base(name) => f.write_str(name),
            TypeNode::Nullable(inner) => write!(f, "Nullable({inner})"),
            TypeNode::Array(element) => write!(f, "Array({element})"),
            TypeNode::Tuple(elements) => {
                f.write_str("Tuple")?;
                write_list(f, elements)
            }
            TypeNode::Parameterized { name, params } => {
                f.write_str(name)?;
                write_list(f, params)
            }
        }
    }
}

impl fmt::Display for TypeParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeParam::Number(n) => write!(f, "{n}"),
            TypeParam::Str(s) => write_quoted(f, s),
            TypeParam::EnumEntry { name, value } => {
                write_quoted(f, name)?;
                write!(f, " = {value}")
            }
            TypeParam::Type(ty) => write!(f, "{ty}"),
        }
    }
}
