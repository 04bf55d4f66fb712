//! # Field — The Closed Set of Descriptors
//!
//! [`Field`] pairs a [`FieldKind`] with an optional default value. All
//! dispatch happens by matching on the kind tag; there is no runtime
//! inspection of values beyond their `Value` variant and, for objects,
//! their class token.

use std::any::Any;

use typd_core::{ClassId, ValidationError, ValidationResult, Value};

use crate::composite::{AnyOfField, ArrayField, MapField};
use crate::enumeration::{EnumDef, EnumField};
use crate::number::NumberField;
use crate::string::StringField;
use crate::temporal::{DateField, DateTimeField};

/// The validation rule of a field.
#[derive(Debug, Clone)]
pub enum FieldKind {
    /// Integer, float, number or decimal.
    Number(NumberField),
    /// Text.
    String(StringField),
    /// `true` / `false`.
    Boolean,
    /// Calendar date.
    Date(DateField),
    /// Date and time.
    DateTime(DateTimeField),
    /// Member of a declared enumeration.
    Enum(EnumField),
    /// Accepts only `None`.
    Null,
    /// Instances of exactly one class.
    Class(ClassId),
    /// Sequence of one element field.
    Array(ArrayField),
    /// Mapping from a key field to a value field.
    Map(MapField),
    /// First matching of several fields.
    AnyOf(AnyOfField),
}

/// A field descriptor: a validation rule plus an optional default.
#[derive(Debug, Clone)]
pub struct Field {
    kind: FieldKind,
    default: Option<Value>,
}

impl Field {
    /// Wrap a kind without a default.
    pub fn new(kind: FieldKind) -> Self {
        Self {
            kind,
            default: None,
        }
    }

    /// Unconstrained integer field.
    pub fn integer() -> Self {
        NumberField::integer().into()
    }

    /// Integer field accepting only values greater than zero.
    pub fn positive_int() -> Self {
        NumberField::positive_int().into()
    }

    /// Unconstrained float field.
    pub fn float() -> Self {
        NumberField::float().into()
    }

    /// Unconstrained number field (integers or floats).
    pub fn number() -> Self {
        NumberField::number().into()
    }

    /// Unconstrained decimal field.
    pub fn decimal() -> Self {
        NumberField::decimal().into()
    }

    /// Unconstrained string field.
    pub fn string() -> Self {
        StringField::new().into()
    }

    /// Boolean field.
    pub fn boolean() -> Self {
        Self::new(FieldKind::Boolean)
    }

    /// Date field with the default format.
    pub fn date() -> Self {
        DateField::new().into()
    }

    /// Date-time field with the default format.
    pub fn date_time() -> Self {
        DateTimeField::new().into()
    }

    /// Field accepting members of `def`.
    pub fn enumeration(def: EnumDef) -> Self {
        EnumField::new(def).into()
    }

    /// Field accepting only `None`.
    pub fn none() -> Self {
        Self::new(FieldKind::Null)
    }

    /// Field accepting only objects of class `class`.
    pub fn class(class: ClassId) -> Self {
        Self::new(FieldKind::Class(class))
    }

    /// Field accepting only objects of Rust type `T`.
    pub fn of<T: Any>() -> Self {
        Self::class(ClassId::of::<T>())
    }

    /// Sequence of `items`.
    pub fn array(items: impl Into<Field>) -> Self {
        ArrayField::new(items).into()
    }

    /// Mapping from `key` to `value`.
    pub fn map(key: impl Into<Field>, value: impl Into<Field>) -> Self {
        MapField::new(key, value).into()
    }

    /// First of `options` that accepts the value.
    pub fn any_of(options: impl IntoIterator<Item = Field>) -> Self {
        AnyOfField::new(options).into()
    }

    /// `inner`, or `None`.
    pub fn optional(inner: impl Into<Field>) -> Self {
        Self::any_of([inner.into(), Self::none()])
    }

    /// Attach a default used when the field is not supplied.
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// The default value, if any.
    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// The validation rule.
    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    /// Whether `None` passes validation.
    pub fn accepts_none(&self) -> bool {
        match &self.kind {
            FieldKind::Null => true,
            FieldKind::AnyOf(any) => any.options().iter().any(Field::accepts_none),
            _ => false,
        }
    }

    /// What the field expects, as used in `Expected ...` messages.
    pub fn describe(&self) -> String {
        match &self.kind {
            FieldKind::Number(_) => "a number".to_string(),
            FieldKind::String(_) => "a string".to_string(),
            FieldKind::Boolean => "a boolean".to_string(),
            FieldKind::Date(_) => "a date".to_string(),
            FieldKind::DateTime(_) => "a datetime".to_string(),
            FieldKind::Enum(e) => format!("a member of {}", e.def().name()),
            FieldKind::Null => "None".to_string(),
            FieldKind::Class(class) => class.to_string(),
            FieldKind::Array(_) => "a list".to_string(),
            FieldKind::Map(_) => "a map".to_string(),
            FieldKind::AnyOf(_) => "one of the field options".to_string(),
        }
    }

    /// Validate `value` for the field labelled `name`, returning the value
    /// to store.
    ///
    /// # Errors
    ///
    /// A type error for the wrong runtime shape (including `None` where it
    /// is not accepted), a value error for a violated constraint. Messages
    /// are prefixed with `name`.
    pub fn validate(&self, name: &str, value: Value) -> ValidationResult<Value> {
        match &self.kind {
            FieldKind::Number(f) => f.validate(name, value),
            FieldKind::String(f) => f.validate(name, value),
            FieldKind::Boolean => match value {
                Value::Bool(_) => Ok(value),
                other => Err(type_mismatch(name, "a boolean", &other)),
            },
            FieldKind::Date(f) => f.validate(name, value),
            FieldKind::DateTime(f) => f.validate(name, value),
            FieldKind::Enum(f) => f.validate(name, value),
            FieldKind::Null => match value {
                Value::None => Ok(value),
                other => Err(type_mismatch(name, "None", &other)),
            },
            FieldKind::Class(class) => {
                if value.as_object().is_some_and(|o| o.is_instance_of(class)) {
                    Ok(value)
                } else {
                    Err(type_mismatch(name, &class.to_string(), &value))
                }
            }
            FieldKind::Array(f) => f.validate(name, value),
            FieldKind::Map(f) => f.validate(name, value),
            FieldKind::AnyOf(f) => f.validate(name, value),
        }
    }

    /// Check the declaration itself: constraint parameters are coherent and
    /// the default, if any, passes validation.
    pub fn check(&self, name: &str) -> ValidationResult<()> {
        match &self.kind {
            FieldKind::Number(f) => f.check(name)?,
            FieldKind::String(f) => f.check(name)?,
            FieldKind::Date(f) => f.check(name)?,
            FieldKind::DateTime(f) => f.check(name)?,
            FieldKind::Enum(f) => f.check(name)?,
            FieldKind::Array(f) => f.check(name)?,
            FieldKind::Map(f) => f.check(name)?,
            FieldKind::AnyOf(f) => f.check(name)?,
            FieldKind::Boolean | FieldKind::Null | FieldKind::Class(_) => {}
        }
        if let Some(default) = &self.default {
            self.validate(name, default.clone())?;
        }
        Ok(())
    }
}

/// Type error for a value of the wrong shape.
///
/// `None` renders as `Got None; Expected ...`; anything else as
/// `Expected ...; Got <value>`.
pub(crate) fn type_mismatch(name: &str, expected: &str, got: &Value) -> ValidationError {
    if got.is_none() {
        ValidationError::invalid_type(name, format!("Got None; Expected {expected}"))
    } else {
        ValidationError::invalid_type(name, format!("Expected {expected}; Got {got}"))
    }
}

macro_rules! into_field {
    ($($ty:ident => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Field {
                fn from(f: $ty) -> Self {
                    Field::new(FieldKind::$variant(f))
                }
            }
        )*
    };
}

into_field! {
    NumberField => Number,
    StringField => String,
    DateField => Date,
    DateTimeField => DateTime,
    EnumField => Enum,
    ArrayField => Array,
    MapField => Map,
    AnyOfField => AnyOf,
}
