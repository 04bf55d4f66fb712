//! # Date and Date-Time Fields
//!
//! Both fields accept their native value, or text parsed with a list of
//! `chrono` format strings. Formats are tried in declaration order and the
//! first one that parses wins. When none parses, the error reports the
//! first format's failure.

use chrono::format::ParseResult;
use chrono::{NaiveDate, NaiveDateTime};
use typd_core::{ValidationError, ValidationResult, Value};

use crate::field::type_mismatch;

/// Format used by [`DateField::new`].
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Format used by [`DateTimeField::new`].
pub const DEFAULT_DATE_TIME_FORMAT: &str = "%m/%d/%y %H:%M:%S";

/// Date field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateField {
    formats: Vec<String>,
}

impl DateField {
    /// Date field accepting [`DEFAULT_DATE_FORMAT`].
    pub fn new() -> Self {
        Self {
            formats: vec![DEFAULT_DATE_FORMAT.to_string()],
        }
    }

    /// Date field accepting exactly `formats`, tried in order.
    pub fn with_formats<I, S>(formats: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            formats: formats.into_iter().map(Into::into).collect(),
        }
    }

    /// Accepted formats.
    pub fn formats(&self) -> &[String] {
        &self.formats
    }

    pub(crate) fn check(&self, name: &str) -> ValidationResult<()> {
        check_formats(name, &self.formats)
    }

    pub(crate) fn validate(&self, name: &str, value: Value) -> ValidationResult<Value> {
        match value {
            Value::Date(_) => Ok(value),
            Value::Str(ref s) => parse_first(name, &self.formats, s, NaiveDate::parse_from_str)
                .map(Value::Date),
            other => Err(type_mismatch(name, "a date", &other)),
        }
    }
}

impl Default for DateField {
    fn default() -> Self {
        Self::new()
    }
}

/// Date-time field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateTimeField {
    formats: Vec<String>,
}

impl DateTimeField {
    /// Date-time field accepting [`DEFAULT_DATE_TIME_FORMAT`].
    pub fn new() -> Self {
        Self {
            formats: vec![DEFAULT_DATE_TIME_FORMAT.to_string()],
        }
    }

    /// Date-time field accepting exactly `formats`, tried in order.
    pub fn with_formats<I, S>(formats: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            formats: formats.into_iter().map(Into::into).collect(),
        }
    }

    /// Accepted formats.
    pub fn formats(&self) -> &[String] {
        &self.formats
    }

    pub(crate) fn check(&self, name: &str) -> ValidationResult<()> {
        check_formats(name, &self.formats)
    }

    pub(crate) fn validate(&self, name: &str, value: Value) -> ValidationResult<Value> {
        match value {
            Value::DateTime(_) => Ok(value),
            Value::Str(ref s) => {
                parse_first(name, &self.formats, s, NaiveDateTime::parse_from_str)
                    .map(Value::DateTime)
            }
            other => Err(type_mismatch(name, "a datetime", &other)),
        }
    }
}

impl Default for DateTimeField {
    fn default() -> Self {
        Self::new()
    }
}

fn check_formats(name: &str, formats: &[String]) -> ValidationResult<()> {
    if formats.is_empty() {
        return Err(ValidationError::invalid_declaration(
            name,
            "at least one date format is required",
        ));
    }
    Ok(())
}

fn parse_first<T>(
    name: &str,
    formats: &[String],
    text: &str,
    parse: fn(&str, &str) -> ParseResult<T>,
) -> ValidationResult<T> {
    let mut first_failure = None;
    for format in formats {
        match parse(text, format) {
            Ok(parsed) => return Ok(parsed),
            Err(e) => {
                first_failure.get_or_insert((format.as_str(), e));
            }
        }
    }
    let reason = match first_failure {
        Some((format, e)) => format!("Could not parse as {format}: {e}"),
        None => "no date format declared".to_string(),
    };
    Err(ValidationError::invalid_value(
        name,
        format!("Got '{text}'; {reason}"),
    ))
}
