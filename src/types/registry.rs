use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

use super::ParamKind;

/// Shared instance of [`TypeRegistry::builtin`]
pub static GLOBAL_TYPE_REGISTRY: LazyLock<Arc<TypeRegistry>> =
    LazyLock::new(|| Arc::new(TypeRegistry::builtin()));

/// Expected arguments of a parameterized constructor
///
/// Arguments are matched positionally: first `required`, then `optional`,
/// then any number of `repeat`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamShape {
    pub required: &'static [ParamKind],
    pub optional: &'static [ParamKind],
    pub repeat: Option<ParamKind>,
}

impl ParamShape {
    pub const fn exact(required: &'static [ParamKind]) -> Self {
        Self {
            required,
            optional: &[],
            repeat: None,
        }
    }

    pub fn min(&self) -> usize {
        self.required.len()
    }

    /// `None` when the argument list is unbounded
    pub fn max(&self) -> Option<usize> {
        match self.repeat {
            Some(_) => None,
            None => Some(self.required.len() + self.optional.len()),
        }
    }

    /// Kind expected at argument position `index`
    pub fn kind_at(&self, index: usize) -> Option<ParamKind> {
        self.required
            .iter()
            .chain(self.optional)
            .nth(index)
            .copied()
            .or(self.repeat)
    }
}

/// How a registered constructor is resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeStrategy {
    /// Leaf type, takes no arguments
    Base,
    /// Exactly one type argument
    Nullable,
    /// Exactly one type argument
    Array,
    /// One or more type arguments
    Tuple,
    Parameterized(ParamShape),
}

/// Mapping from constructor name to its [`TypeStrategy`]
///
/// Built once and never mutated; share it behind an `Arc`.
#[derive(Debug, Clone)]
pub struct TypeRegistry {
    entries: HashMap<String, TypeStrategy>,
}

impl TypeRegistry {
    pub fn builder() -> TypeRegistryBuilder {
        TypeRegistryBuilder::default()
    }

    /// Types this client knows how to materialize
    pub fn builtin() -> Self {
        use ParamKind::{EnumEntry, Number, Str, Type};

        let mut builder = Self::builder();
        for name in [
            "Int8", "Int16", "Int32", "Int64", "Int128", "Int256", "UInt8", "UInt16", "UInt32",
            "UInt64", "UInt128", "UInt256", "Float32", "Float64", "BFloat16", "Bool", "String",
            "UUID", "Date", "Date32", "IPv4", "IPv6", "Nothing", "JSON",
        ] {
            builder = builder.base(name);
        }

        let enum_shape = ParamShape {
            required: &[EnumEntry],
            optional: &[],
            repeat: Some(EnumEntry),
        };

        builder
            .strategy("Nullable", TypeStrategy::Nullable)
            .strategy("Array", TypeStrategy::Array)
            .strategy("Tuple", TypeStrategy::Tuple)
            .parameterized("FixedString", ParamShape::exact(&[Number]))
            .parameterized(
                "DateTime",
                ParamShape {
                    required: &[],
                    optional: &[Str],
                    repeat: None,
                },
            )
            .parameterized(
                "DateTime64",
                ParamShape {
                    required: &[Number],
                    optional: &[Str],
                    repeat: None,
                },
            )
            .parameterized("Decimal", ParamShape::exact(&[Number, Number]))
            .parameterized("Decimal32", ParamShape::exact(&[Number]))
            .parameterized("Decimal64", ParamShape::exact(&[Number]))
            .parameterized("Decimal128", ParamShape::exact(&[Number]))
            .parameterized("Decimal256", ParamShape::exact(&[Number]))
            .parameterized("Enum8", enum_shape)
            .parameterized("Enum16", enum_shape)
            .parameterized("LowCardinality", ParamShape::exact(&[Type]))
            .parameterized("Map", ParamShape::exact(&[Type, Type]))
            .build()
    }

    pub fn get(&self, name: &str) -> Option<TypeStrategy> {
        self.entries.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Collects entries for a [`TypeRegistry`]; later registrations replace earlier ones
#[derive(Debug, Default)]
pub struct TypeRegistryBuilder {
    entries: HashMap<String, TypeStrategy>,
}

impl TypeRegistryBuilder {
    pub fn base(self, name: impl Into<String>) -> Self {
        self.strategy(name, TypeStrategy::Base)
    }

    pub fn parameterized(self, name: impl Into<String>, shape: ParamShape) -> Self {
        self.strategy(name, TypeStrategy::Parameterized(shape))
    }

    pub fn strategy(mut self, name: impl Into<String>, strategy: TypeStrategy) -> Self {
        self.entries.insert(name.into(), strategy);
        self
    }

    pub fn build(self) -> TypeRegistry {
        TypeRegistry {
            entries: self.entries,
        }
    }
}
