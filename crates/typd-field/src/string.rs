//! # String Fields
//!
//! Length bounds count characters, not bytes. A pattern is matched from the
//! start of the string and may stop anywhere: `[A-Z]+` accepts `"AB1"`,
//! while `[A-Z]+$` does not.

use regex::Regex;
use typd_core::{ValidationError, ValidationResult, Value};

use crate::field::type_mismatch;

#[derive(Debug, Clone)]
struct Pattern {
    source: String,
    regex: Regex,
}

/// Constraints of a string field.
#[derive(Debug, Clone, Default)]
pub struct StringField {
    min_length: Option<usize>,
    max_length: Option<usize>,
    pattern: Option<Pattern>,
}

impl StringField {
    /// Unconstrained string field.
    pub fn new() -> Self {
        Self::default()
    }

    /// Minimum number of characters.
    pub fn min_length(mut self, len: usize) -> Self {
        self.min_length = Some(len);
        self
    }

    /// Maximum number of characters.
    pub fn max_length(mut self, len: usize) -> Self {
        self.max_length = Some(len);
        self
    }

    /// Require the string to match `pattern` from its start.
    ///
    /// # Errors
    ///
    /// A declaration error if `pattern` is not a valid regular expression.
    pub fn pattern(mut self, pattern: &str) -> ValidationResult<Self> {
        let regex = Regex::new(&format!("^(?:{pattern})")).map_err(|e| {
            ValidationError::invalid_declaration(
                "pattern",
                format!("invalid regular expression {pattern:?}: {e}"),
            )
        })?;
        self.pattern = Some(Pattern {
            source: pattern.to_string(),
            regex,
        });
        Ok(self)
    }

    /// The declared pattern, if any.
    pub fn pattern_source(&self) -> Option<&str> {
        self.pattern.as_ref().map(|p| p.source.as_str())
    }

    pub(crate) fn check(&self, name: &str) -> ValidationResult<()> {
        if let (Some(min), Some(max)) = (self.min_length, self.max_length) {
            if min > max {
                return Err(ValidationError::invalid_declaration(
                    name,
                    format!("min_length {min} is greater than max_length {max}"),
                ));
            }
        }
        Ok(())
    }

    pub(crate) fn validate(&self, name: &str, value: Value) -> ValidationResult<Value> {
        let Value::Str(s) = &value else {
            return Err(type_mismatch(name, "a string", &value));
        };
        let len = s.chars().count();

        if let Some(max) = self.max_length {
            if len > max {
                return Err(ValidationError::invalid_value(
                    name,
                    format!("Expected a maximum length of {max}; Got {value}"),
                ));
            }
        }
        if let Some(min) = self.min_length {
            if len < min {
                return Err(ValidationError::invalid_value(
                    name,
                    format!("Expected a minimum length of {min}; Got {value}"),
                ));
            }
        }
        if let Some(pattern) = &self.pattern {
            if !pattern.regex.is_match(s) {
                return Err(ValidationError::invalid_value(
                    name,
                    format!(
                        "Got {value}; Does not match regular expression: {}",
                        pattern.source
                    ),
                ));
            }
        }
        Ok(value)
    }
}
