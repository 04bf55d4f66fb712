//! # TypeSpec — Field Declarations Before Normalization
//!
//! A declaration front-end names each field's type with a [`TypeSpec`]:
//! a ready-made [`Field`], a builtin type, a class, a container of specs,
//! or, by mistake, a plain value. [`TypeSpec::normalize`] resolves the
//! shorthand forms to descriptors and rejects plain values.

use std::any::Any;

use typd_core::{ClassId, ValidationError, ValidationResult, Value};

use crate::composite::{AnyOfField, ArrayField, MapField};
use crate::enumeration::{EnumDef, EnumField};
use crate::field::Field;
use crate::number::NumberField;
use crate::string::StringField;
use crate::temporal::{DateField, DateTimeField};

/// The declared type of one field.
#[derive(Debug, Clone)]
pub enum TypeSpec {
    /// An explicit descriptor, used as-is.
    Field(Field),
    /// Builtin integer.
    Int,
    /// Builtin float.
    Float,
    /// Builtin string.
    Str,
    /// Builtin boolean.
    Bool,
    /// `None` used as a type: accepts only `None`.
    Nothing,
    /// Instances of a class.
    Class(ClassId),
    /// Sequence of a spec.
    List(Box<TypeSpec>),
    /// Mapping from one spec to another.
    Map(Box<TypeSpec>, Box<TypeSpec>),
    /// First matching of several specs.
    AnyOf(Vec<TypeSpec>),
    /// A spec or `None`.
    Optional(Box<TypeSpec>),
    /// A plain value where a type was expected. Never valid.
    Literal(Value),
}

impl TypeSpec {
    /// Instances of Rust type `T`.
    pub fn of<T: Any>() -> Self {
        Self::Class(ClassId::of::<T>())
    }

    /// Sequence of `items`.
    pub fn list(items: impl Into<TypeSpec>) -> Self {
        Self::List(Box::new(items.into()))
    }

    /// Mapping from `key` to `value`.
    pub fn map(key: impl Into<TypeSpec>, value: impl Into<TypeSpec>) -> Self {
        Self::Map(Box::new(key.into()), Box::new(value.into()))
    }

    /// `inner` or `None`.
    pub fn optional(inner: impl Into<TypeSpec>) -> Self {
        Self::Optional(Box::new(inner.into()))
    }

    /// First of `options` that accepts the value.
    pub fn any_of<I, T>(options: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<TypeSpec>,
    {
        Self::AnyOf(options.into_iter().map(Into::into).collect())
    }

    /// A plain value used as a type.
    pub fn literal(value: impl Into<Value>) -> Self {
        Self::Literal(value.into())
    }

    /// Resolve to a field descriptor.
    ///
    /// # Errors
    ///
    /// [`ValidationError::UnsupportedFieldType`] if the spec, or any spec
    /// nested in it, is a [`TypeSpec::Literal`].
    pub fn normalize(self) -> ValidationResult<Field> {
        Ok(match self {
            Self::Field(field) => field,
            Self::Int => Field::integer(),
            Self::Float => Field::float(),
            Self::Str => Field::string(),
            Self::Bool => Field::boolean(),
            Self::Nothing => Field::none(),
            Self::Class(class) => Field::class(class),
            Self::List(items) => Field::array(items.normalize()?),
            Self::Map(key, value) => Field::map(key.normalize()?, value.normalize()?),
            Self::AnyOf(options) => Field::any_of(
                options
                    .into_iter()
                    .map(TypeSpec::normalize)
                    .collect::<ValidationResult<Vec<_>>>()?,
            ),
            Self::Optional(inner) => Field::optional(inner.normalize()?),
            Self::Literal(value) => {
                let value = match value {
                    Value::Str(s) => s,
                    other => other.to_string(),
                };
                return Err(ValidationError::UnsupportedFieldType { value });
            }
        })
    }
}

impl From<Field> for TypeSpec {
    fn from(field: Field) -> Self {
        Self::Field(field)
    }
}

impl From<ClassId> for TypeSpec {
    fn from(class: ClassId) -> Self {
        Self::Class(class)
    }
}

impl From<EnumDef> for TypeSpec {
    fn from(def: EnumDef) -> Self {
        Self::Field(Field::enumeration(def))
    }
}

macro_rules! into_spec {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for TypeSpec {
                fn from(f: $ty) -> Self {
                    Self::Field(f.into())
                }
            }
        )*
    };
}

into_spec!(
    NumberField,
    StringField,
    DateField,
    DateTimeField,
    EnumField,
    ArrayField,
    MapField,
    AnyOfField,
);
