//! # Composite Fields
//!
//! Sequence, mapping and one-of combinators. Containers validate every
//! element with the element field and store the validated elements, so an
//! element field that normalizes (a `Float` field widening an `Int`, an
//! enum field resolving a member name) normalizes inside containers too.
//!
//! Element failures are relabelled: the `i`-th item of `points` reports as
//! `points_i`, map keys as `points_key`, map values as `points_value`.

use typd_core::{ValidationError, ValidationResult, Value, ValueMap};

use crate::field::{type_mismatch, Field};

/// Sequence of values sharing one element field.
#[derive(Debug, Clone)]
pub struct ArrayField {
    items: Box<Field>,
    min_items: Option<usize>,
    max_items: Option<usize>,
    unique_items: bool,
}

impl ArrayField {
    /// Sequence of `items`.
    pub fn new(items: impl Into<Field>) -> Self {
        Self {
            items: Box::new(items.into()),
            min_items: None,
            max_items: None,
            unique_items: false,
        }
    }

    /// Minimum number of elements.
    pub fn min_items(mut self, n: usize) -> Self {
        self.min_items = Some(n);
        self
    }

    /// Maximum number of elements.
    pub fn max_items(mut self, n: usize) -> Self {
        self.max_items = Some(n);
        self
    }

    /// Reject sequences containing equal elements.
    pub fn unique_items(mut self) -> Self {
        self.unique_items = true;
        self
    }

    /// The element field.
    pub fn items(&self) -> &Field {
        &self.items
    }

    pub(crate) fn check(&self, name: &str) -> ValidationResult<()> {
        if let (Some(min), Some(max)) = (self.min_items, self.max_items) {
            if min > max {
                return Err(ValidationError::invalid_declaration(
                    name,
                    format!("min_items {min} is greater than max_items {max}"),
                ));
            }
        }
        self.items.check(&format!("{name}_items"))
    }

    pub(crate) fn validate(&self, name: &str, value: Value) -> ValidationResult<Value> {
        let Value::List(items) = value else {
            return Err(type_mismatch(name, "a list", &value));
        };

        if let Some(min) = self.min_items {
            if items.len() < min {
                return Err(ValidationError::invalid_value(
                    name,
                    format!("Expected length of at least {min}; Got {}", Value::List(items)),
                ));
            }
        }
        if let Some(max) = self.max_items {
            if items.len() > max {
                return Err(ValidationError::invalid_value(
                    name,
                    format!("Expected length of at most {max}; Got {}", Value::List(items)),
                ));
            }
        }

        let mut validated = Vec::with_capacity(items.len());
        for (i, item) in items.into_iter().enumerate() {
            validated.push(self.items.validate(&format!("{name}_{i}"), item)?);
        }

        if self.unique_items {
            let duplicated = validated
                .iter()
                .enumerate()
                .any(|(i, v)| validated[..i].contains(v));
            if duplicated {
                return Err(ValidationError::invalid_value(
                    name,
                    format!("Expected unique items; Got {}", Value::List(validated)),
                ));
            }
        }
        Ok(Value::List(validated))
    }
}

/// Mapping whose keys and values each share one field.
#[derive(Debug, Clone)]
pub struct MapField {
    key: Box<Field>,
    value: Box<Field>,
    max_items: Option<usize>,
}

impl MapField {
    /// Mapping from `key` to `value`.
    pub fn new(key: impl Into<Field>, value: impl Into<Field>) -> Self {
        Self {
            key: Box::new(key.into()),
            value: Box::new(value.into()),
            max_items: None,
        }
    }

    /// Maximum number of entries.
    pub fn max_items(mut self, n: usize) -> Self {
        self.max_items = Some(n);
        self
    }

    /// The key field.
    pub fn key(&self) -> &Field {
        &self.key
    }

    /// The value field.
    pub fn value(&self) -> &Field {
        &self.value
    }

    pub(crate) fn check(&self, name: &str) -> ValidationResult<()> {
        self.key.check(&format!("{name}_key"))?;
        self.value.check(&format!("{name}_value"))
    }

    pub(crate) fn validate(&self, name: &str, value: Value) -> ValidationResult<Value> {
        let Value::Map(entries) = value else {
            return Err(type_mismatch(name, "a map", &value));
        };

        if let Some(max) = self.max_items {
            if entries.len() > max {
                return Err(ValidationError::invalid_value(
                    name,
                    format!("Expected length of at most {max}; Got {}", Value::Map(entries)),
                ));
            }
        }

        let key_label = format!("{name}_key");
        let value_label = format!("{name}_value");
        let mut validated = ValueMap::new();
        for (k, v) in entries {
            let k = self.key.validate(&key_label, k)?;
            let v = self.value.validate(&value_label, v)?;
            if validated.contains_key(&k) {
                return Err(ValidationError::invalid_value(
                    &key_label,
                    format!("Got {k}; duplicate key after validation"),
                ));
            }
            validated.insert(k, v);
        }
        Ok(Value::Map(validated))
    }
}

/// Union of fields; the first option that accepts a value wins.
#[derive(Debug, Clone)]
pub struct AnyOfField {
    options: Vec<Field>,
}

impl AnyOfField {
    /// Union of `options`, tried in order.
    pub fn new(options: impl IntoIterator<Item = Field>) -> Self {
        Self {
            options: options.into_iter().collect(),
        }
    }

    /// The options in declaration order.
    pub fn options(&self) -> &[Field] {
        &self.options
    }

    pub(crate) fn check(&self, name: &str) -> ValidationResult<()> {
        if self.options.is_empty() {
            return Err(ValidationError::invalid_declaration(
                name,
                "a union needs at least one field option",
            ));
        }
        self.options.iter().try_for_each(|option| option.check(name))
    }

    pub(crate) fn validate(&self, name: &str, value: Value) -> ValidationResult<Value> {
        for option in &self.options {
            if let Ok(validated) = option.validate(name, value.clone()) {
                return Ok(validated);
            }
        }
        Err(ValidationError::NoMatchingOption {
            field: name.to_string(),
            value: value.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::number::NumberField;

    fn ints(xs: &[i64]) -> Value {
        Value::List(xs.iter().copied().map(Value::Int).collect())
    }

    #[test]
    fn array_validates_each_element() {
        let f = ArrayField::new(Field::integer());
        assert_eq!(f.validate("xs", ints(&[1, 2, 3])).unwrap(), ints(&[1, 2, 3]));

        let bad = Value::List(vec![Value::Int(1), Value::from("two")]);
        let err = f.validate("xs", bad).unwrap_err();
        assert_eq!(err.field(), Some("xs_1"));
        assert_eq!(err.to_string(), "xs_1: Expected a number; Got 'two'");
    }

    #[test]
    fn array_elements_are_normalized() {
        let f = ArrayField::new(Field::float());
        assert_eq!(
            f.validate("xs", ints(&[1])).unwrap(),
            Value::List(vec![Value::Float(1.0)])
        );
    }

    #[test]
    fn array_length_bounds() {
        let f = ArrayField::new(Field::integer()).min_items(1).max_items(2);
        let err = f.validate("xs", ints(&[])).unwrap_err();
        assert_eq!(err.to_string(), "xs: Expected length of at least 1; Got []");
        let err = f.validate("xs", ints(&[1, 2, 3])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "xs: Expected length of at most 2; Got [1, 2, 3]"
        );
        assert!(err.is_value_error());
        assert!(ArrayField::new(Field::integer())
            .min_items(3)
            .max_items(1)
            .check("xs")
            .is_err());
    }

    #[test]
    fn array_unique_items() {
        let f = ArrayField::new(Field::integer()).unique_items();
        assert!(f.validate("xs", ints(&[1, 2])).is_ok());
        assert!(f.validate("xs", ints(&[1, 2, 1])).is_err());
    }

    #[test]
    fn array_rejects_non_lists() {
        let err = ArrayField::new(Field::integer())
            .validate("xs", Value::Int(1))
            .unwrap_err();
        assert_eq!(err.to_string(), "xs: Expected a list; Got 1");
    }

    #[test]
    fn map_labels_keys_and_values() {
        let f = MapField::new(Field::string(), NumberField::integer().minimum(0));
        let good: ValueMap = [(Value::from("a"), Value::Int(1))].into_iter().collect();
        assert!(f.validate("counts", Value::Map(good)).is_ok());

        let bad_key: ValueMap = [(Value::Int(1), Value::Int(1))].into_iter().collect();
        let err = f.validate("counts", Value::Map(bad_key)).unwrap_err();
        assert_eq!(err.field(), Some("counts_key"));

        let bad_value: ValueMap = [(Value::from("a"), Value::Int(-1))].into_iter().collect();
        let err = f.validate("counts", Value::Map(bad_value)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "counts_value: Expected a minimum of 0; Got -1"
        );
    }

    #[test]
    fn map_keys_that_collide_once_normalized_are_refused() {
        let f = MapField::new(Field::float(), Field::string());
        let raw: ValueMap = [
            (Value::Int(1), Value::from("a")),
            (Value::Float(1.0), Value::from("b")),
        ]
        .into_iter()
        .collect();
        assert_eq!(raw.len(), 2);

        let err = f.validate("m", Value::Map(raw)).unwrap_err();
        assert_eq!(err.field(), Some("m_key"));
        assert!(err.is_value_error());
        assert_eq!(err.to_string(), "m_key: Got 1.0; duplicate key after validation");
    }

    #[test]
    fn any_of_takes_first_match() {
        let f = AnyOfField::new([Field::float(), Field::integer()]);
        assert_eq!(f.validate("x", Value::Int(2)).unwrap(), Value::Float(2.0));
        let f = AnyOfField::new([Field::integer(), Field::float()]);
        assert_eq!(f.validate("x", Value::Int(2)).unwrap(), Value::Int(2));
    }

    #[test]
    fn any_of_without_match() {
        let f = AnyOfField::new([Field::integer(), Field::boolean()]);
        let err = f.validate("x", Value::from("s")).unwrap_err();
        assert_eq!(err.to_string(), "x: 's' Did not match any field option");
        assert!(AnyOfField::new([]).check("x").is_err());
    }
}
