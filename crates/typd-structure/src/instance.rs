//! # Structure Instances
//!
//! An [`Instance`] is a set of field values that has passed its schema.
//! Every way of producing or changing one goes through validation:
//!
//! - [`Instance::new`] binds the arguments, validates every supplied
//!   value, then resolves missing fields against defaults and the
//!   required list, and registers the instance if its schema is unique. A
//!   failure at any step produces no instance and registers nothing.
//! - [`Instance::set_field`] validates one value and checks uniqueness of
//!   the instance as it would be afterwards. On failure the field keeps
//!   its previous value.
//! - [`Instance::clone_with_overrides`] runs the full construction
//!   protocol on the current values plus the overrides.

use std::fmt;
use std::sync::Arc;

use typd_core::{
    sha256_fingerprint, CanonicalBytes, Fingerprint, ValidationError, ValidationResult, Value,
};

use crate::registry::UniquenessRegistry;
use crate::schema::Schema;

static ABSENT: Value = Value::None;

/// A validated structure instance.
#[derive(Debug, Clone)]
pub struct Instance {
    schema: Arc<Schema>,
    values: Vec<Option<Value>>,
}

impl Instance {
    /// Construct an instance of `schema` from named values.
    ///
    /// # Errors
    ///
    /// In order:
    ///
    /// - [`ValidationError::UnexpectedArgument`] for a name the schema does
    ///   not declare.
    /// - The field's error for a supplied value it rejects, including a
    ///   `None` given to a required field.
    /// - [`ValidationError::MissingRequired`] for a required field with
    ///   neither a value nor a default.
    /// - [`ValidationError::NotUnique`] if the schema is unique and an
    ///   equal instance was already constructed.
    pub fn new<I, K>(schema: &Arc<Schema>, args: I) -> ValidationResult<Self>
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        let mut supplied: Vec<Option<Value>> = vec![None; schema.len()];
        for (name, value) in args {
            let name = name.into();
            let Some(index) = schema.position(&name) else {
                return Err(ValidationError::UnexpectedArgument {
                    schema: schema.name().to_string(),
                    name,
                });
            };
            supplied[index] = Some(value);
        }

        let mut values = Vec::with_capacity(supplied.len());
        for (index, slot) in supplied.into_iter().enumerate() {
            values.push(slot.map(|value| schema.admit(index, value)).transpose()?);
        }

        for (index, slot) in values.iter_mut().enumerate() {
            if slot.is_some() {
                continue;
            }
            let (name, field) = schema.field_at(index);
            match field.default_value() {
                Some(default) => *slot = Some(field.validate(name, default.clone())?),
                None if schema.is_required(name) => {
                    return Err(ValidationError::MissingRequired {
                        schema: schema.name().to_string(),
                        name: name.to_string(),
                    });
                }
                None => {}
            }
        }

        let instance = Self {
            schema: Arc::clone(schema),
            values,
        };
        instance.register()?;
        tracing::trace!(schema = %schema.name(), "instance constructed");
        Ok(instance)
    }

    /// The instance's schema.
    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// The value of field `name`; `None` if the field is unset.
    ///
    /// # Errors
    ///
    /// [`ValidationError::UnknownField`] if the schema has no such field.
    pub fn get(&self, name: &str) -> ValidationResult<&Value> {
        let index = self.index_of(name)?;
        Ok(self.value_at(index))
    }

    /// Whether field `name` holds a value, including an explicit `None`.
    pub fn is_set(&self, name: &str) -> bool {
        self.schema
            .position(name)
            .is_some_and(|index| self.values[index].is_some())
    }

    /// Validate `value` and assign it to field `name`.
    ///
    /// # Errors
    ///
    /// [`ValidationError::UnknownField`], the field's own error, or
    /// [`ValidationError::NotUnique`] if the instance would then equal an
    /// already registered one. The field is unchanged on error.
    pub fn set_field(&mut self, name: &str, value: Value) -> ValidationResult<()> {
        let index = self.index_of(name)?;
        let value = self.schema.admit(index, value)?;
        if self.values[index].as_ref() == Some(&value) {
            return Ok(());
        }

        if self.schema.is_unique() {
            let mut prospective = self.values.clone();
            prospective[index] = Some(value.clone());
            check_unique(&self.schema, &prospective)?;
        }
        self.values[index] = Some(value);
        tracing::trace!(schema = %self.schema.name(), field = name, "field updated");
        Ok(())
    }

    /// A new instance with the current values, replaced by `overrides`.
    ///
    /// Object payloads are shared with `self`, not copied.
    ///
    /// # Errors
    ///
    /// Any error of [`Instance::new`].
    pub fn clone_with_overrides<I, K>(&self, overrides: I) -> ValidationResult<Self>
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        let mut args: Vec<(String, Value)> = self
            .set_values()
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect();
        for (name, value) in overrides {
            let name = name.into();
            match args.iter_mut().find(|(n, _)| *n == name) {
                Some((_, slot)) => *slot = value,
                None => args.push((name, value)),
            }
        }
        Self::new(&self.schema, args)
    }

    /// Re-validate every stored value against its field.
    ///
    /// # Errors
    ///
    /// The first field error encountered.
    pub fn revalidate(&self) -> ValidationResult<()> {
        for (index, value) in self.values.iter().enumerate() {
            if let Some(value) = value {
                self.schema.admit(index, value.clone())?;
            }
        }
        Ok(())
    }

    /// Wrap the instance as a value, classed by its schema.
    pub fn into_value(self) -> Value {
        let class = self.schema.class_id();
        Value::Object(typd_core::Object::with_class(class, self))
    }

    /// The instance wrapped in `value`, if it holds one.
    pub fn from_value(value: &Value) -> Option<&Instance> {
        value.as_object()?.downcast_ref::<Instance>()
    }

    /// Canonical fingerprint of all field values, unset ones as `None`.
    pub fn fingerprint(&self) -> Fingerprint {
        fingerprint_of(&self.schema, &self.values)
    }

    fn index_of(&self, name: &str) -> ValidationResult<usize> {
        self.schema
            .position(name)
            .ok_or_else(|| ValidationError::UnknownField {
                schema: self.schema.name().to_string(),
                name: name.to_string(),
            })
    }

    fn value_at(&self, index: usize) -> &Value {
        self.values[index].as_ref().unwrap_or(&ABSENT)
    }

    fn set_values(&self) -> impl Iterator<Item = (&str, &Value)> {
        set_values(&self.schema, &self.values)
    }

    fn register(&self) -> ValidationResult<()> {
        if self.schema.is_unique() {
            check_unique(&self.schema, &self.values)?;
        }
        Ok(())
    }
}

fn set_values<'a>(
    schema: &'a Schema,
    values: &'a [Option<Value>],
) -> impl Iterator<Item = (&'a str, &'a Value)> {
    schema
        .fields()
        .zip(values)
        .filter_map(|((name, _), value)| value.as_ref().map(|v| (name, v)))
}

/// Every declared field takes part; unset ones count as `None`, as they do
/// for equality.
fn fingerprint_of(schema: &Schema, values: &[Option<Value>]) -> Fingerprint {
    let fields = schema
        .fields()
        .zip(values)
        .map(|((name, _), value)| (name, value.as_ref().unwrap_or(&ABSENT)));
    sha256_fingerprint(&CanonicalBytes::from_fields(fields))
}

fn check_unique(schema: &Schema, values: &[Option<Value>]) -> ValidationResult<()> {
    UniquenessRegistry::global()
        .check_and_register(
            schema.id(),
            fingerprint_of(schema, values),
            schema.unique_capacity(),
        )
        .map_err(|_| ValidationError::NotUnique {
            schema: schema.name().to_string(),
            instance: Rendering { schema, values }.to_string(),
        })
}

/// `<Instance of Name. Properties: a = 1, s = 'xxx'>`, sorted by name.
struct Rendering<'a> {
    schema: &'a Schema,
    values: &'a [Option<Value>],
}

impl fmt::Display for Rendering<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut props: Vec<(&str, &Value)> = set_values(self.schema, self.values).collect();
        props.sort_by(|a, b| a.0.cmp(b.0));

        write!(f, "<Instance of {}. Properties: ", self.schema.name())?;
        for (i, (name, value)) in props.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{name} = {value}")?;
        }
        f.write_str(">")
    }
}

impl fmt::Display for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendering = Rendering {
            schema: &self.schema,
            values: &self.values,
        };
        fmt::Display::fmt(&rendering, f)
    }
}

impl PartialEq for Instance {
    fn eq(&self, other: &Self) -> bool {
        self.schema.id() == other.schema.id()
            && (0..self.values.len()).all(|i| self.value_at(i) == other.value_at(i))
    }
}

impl From<Instance> for Value {
    fn from(instance: Instance) -> Self {
        instance.into_value()
    }
}
