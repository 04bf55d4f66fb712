//! # Numeric Fields
//!
//! One descriptor covers the four numeric kinds. Bounds are held as `f64`
//! and apply to whichever numeric variant the kind accepts.
//!
//! | Kind | Accepts | Stores |
//! |------|---------|--------|
//! | `Integer` | `Int` | `Int` |
//! | `Float` | `Int`, `Float` | `Float` |
//! | `Number` | `Int`, `Float` | as given |
//! | `Decimal` | `Int`, `Float`, numeric `Str` | `Int` as given, otherwise `Float` |

use typd_core::{ValidationError, ValidationResult, Value};

use crate::field::type_mismatch;

/// Which values a numeric field accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberKind {
    /// Integers only.
    Integer,
    /// Floats; integers are widened.
    Float,
    /// Integers or floats.
    Number,
    /// Integers, floats, or numeric text.
    Decimal,
}

/// Constraints of a numeric field.
#[derive(Debug, Clone, PartialEq)]
pub struct NumberField {
    kind: NumberKind,
    minimum: Option<f64>,
    maximum: Option<f64>,
    exclusive_minimum: Option<f64>,
    exclusive_maximum: Option<f64>,
    multiple_of: Option<f64>,
}

impl NumberField {
    fn of_kind(kind: NumberKind) -> Self {
        Self {
            kind,
            minimum: None,
            maximum: None,
            exclusive_minimum: None,
            exclusive_maximum: None,
            multiple_of: None,
        }
    }

    /// Integer field.
    pub fn integer() -> Self {
        Self::of_kind(NumberKind::Integer)
    }

    /// Integer field accepting only values greater than zero.
    pub fn positive_int() -> Self {
        Self::integer().exclusive_minimum(0)
    }

    /// Float field.
    pub fn float() -> Self {
        Self::of_kind(NumberKind::Float)
    }

    /// Integer-or-float field.
    pub fn number() -> Self {
        Self::of_kind(NumberKind::Number)
    }

    /// Decimal field.
    pub fn decimal() -> Self {
        Self::of_kind(NumberKind::Decimal)
    }

    /// Inclusive lower bound.
    pub fn minimum(mut self, bound: impl Into<f64>) -> Self {
        self.minimum = Some(bound.into());
        self
    }

    /// Inclusive upper bound.
    pub fn maximum(mut self, bound: impl Into<f64>) -> Self {
        self.maximum = Some(bound.into());
        self
    }

    /// Exclusive lower bound.
    pub fn exclusive_minimum(mut self, bound: impl Into<f64>) -> Self {
        self.exclusive_minimum = Some(bound.into());
        self
    }

    /// Exclusive upper bound.
    pub fn exclusive_maximum(mut self, bound: impl Into<f64>) -> Self {
        self.exclusive_maximum = Some(bound.into());
        self
    }

    /// Values must be a whole multiple of `factor`.
    pub fn multiple_of(mut self, factor: impl Into<f64>) -> Self {
        self.multiple_of = Some(factor.into());
        self
    }

    /// The numeric kind.
    pub fn kind(&self) -> NumberKind {
        self.kind
    }

    pub(crate) fn check(&self, name: &str) -> ValidationResult<()> {
        if let Some(factor) = self.multiple_of {
            if !(factor.is_finite() && factor > 0.0) {
                return Err(ValidationError::invalid_declaration(
                    name,
                    format!("multiple_of must be a positive number, got {factor}"),
                ));
            }
        }
        if let (Some(min), Some(max)) = (self.minimum, self.maximum) {
            if min > max {
                return Err(ValidationError::invalid_declaration(
                    name,
                    format!("minimum {min} is greater than maximum {max}"),
                ));
            }
        }
        Ok(())
    }

    pub(crate) fn validate(&self, name: &str, value: Value) -> ValidationResult<Value> {
        let value = self.coerce(name, value)?;
        let Some(x) = value.as_f64() else {
            return Err(type_mismatch(name, "a number", &value));
        };

        if let Some(min) = self.minimum {
            if x < min {
                return Err(bound_error(name, "Expected a minimum of", min, &value));
            }
        }
        if let Some(max) = self.maximum {
            if x > max {
                return Err(bound_error(name, "Expected a maximum of", max, &value));
            }
        }
        if let Some(min) = self.exclusive_minimum {
            if x <= min {
                return Err(bound_error(name, "Expected a value greater than", min, &value));
            }
        }
        if let Some(max) = self.exclusive_maximum {
            if x >= max {
                return Err(bound_error(name, "Expected a value less than", max, &value));
            }
        }
        if let Some(factor) = self.multiple_of {
            if !is_multiple(&value, factor) {
                return Err(bound_error(name, "Expected a multiple of", factor, &value));
            }
        }
        Ok(value)
    }

    fn coerce(&self, name: &str, value: Value) -> ValidationResult<Value> {
        match (self.kind, value) {
            (NumberKind::Integer, v @ Value::Int(_)) => Ok(v),
            (NumberKind::Integer, other) => Err(type_mismatch(name, "a number", &other)),
            (NumberKind::Float, Value::Int(i)) => Ok(Value::Float(i as f64)),
            (NumberKind::Float, v @ Value::Float(_)) => Ok(v),
            (NumberKind::Number | NumberKind::Decimal, v @ (Value::Int(_) | Value::Float(_))) => {
                Ok(v)
            }
            (NumberKind::Decimal, Value::Str(s)) => match s.trim().parse::<f64>() {
                Ok(x) if x.is_finite() => Ok(Value::Float(x)),
                _ => Err(ValidationError::invalid_value(
                    name,
                    format!("Got '{s}'; Expected a decimal number"),
                )),
            },
            (_, other) => Err(type_mismatch(name, "a number", &other)),
        }
    }
}

fn bound_error(name: &str, what: &str, bound: f64, value: &Value) -> ValidationError {
    ValidationError::invalid_value(name, format!("{what} {bound}; Got {value}"))
}

fn is_multiple(value: &Value, factor: f64) -> bool {
    match value {
        Value::Int(i) if factor >= 1.0 && factor.fract() == 0.0 && factor <= i64::MAX as f64 => {
            i % (factor as i64) == 0
        }
        other => other
            .as_f64()
            .map(|x| factor != 0.0 && (x / factor).fract() == 0.0)
            .unwrap_or(false),
    }
}
