//! # Error Types — Field-Qualified Validation Errors
//!
//! Defines the single error type of the typd workspace. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - There are exactly two error kinds ([`ErrorKind`]): a *type* error for
//!   the wrong runtime shape (including an illegal `None`, a missing or
//!   unexpected argument, and declaration problems) and a *value* error for
//!   a value of the right shape that violates a constraint.
//! - The rendered message is part of the contract: callers match on
//!   substrings such as `"i: Got None; Expected a number"`.
//! - Field-level variants carry the field label separately so containers
//!   can relabel element failures (`points_value`, `items_3`).

use thiserror::Error;

/// The two kinds of validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Wrong runtime shape, illegal `None`, or a malformed declaration.
    Type,
    /// Right shape, but a constraint is violated.
    Value,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Type => f.write_str("TypeError"),
            Self::Value => f.write_str("ValueError"),
        }
    }
}

/// Error raised by field validation, structure declaration, construction
/// and mutation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// A value had the wrong runtime type for its field.
    #[error("{field}: {message}")]
    InvalidType {
        /// Label of the failing field.
        field: String,
        /// Detail, e.g. `Got None; Expected a number`.
        message: String,
    },

    /// A value of the right type violated a constraint.
    #[error("{field}: {message}")]
    InvalidValue {
        /// Label of the failing field.
        field: String,
        /// Detail, e.g. `Expected a maximum of 6; Got 7`.
        message: String,
    },

    /// No option of a union accepted the value.
    #[error("{field}: {value} Did not match any field option")]
    NoMatchingOption {
        /// Label of the failing field.
        field: String,
        /// Rendering of the rejected value.
        value: String,
    },

    /// A required field was absent from a construction.
    #[error("{schema}: missing a required argument: '{name}'")]
    MissingRequired {
        /// Structure name.
        schema: String,
        /// The missing field.
        name: String,
    },

    /// A construction supplied a name the structure does not declare.
    #[error("{schema}: got an unexpected keyword argument '{name}'")]
    UnexpectedArgument {
        /// Structure name.
        schema: String,
        /// The undeclared name.
        name: String,
    },

    /// Field access or assignment named an undeclared field.
    #[error("{schema}: has no field '{name}'")]
    UnknownField {
        /// Structure name.
        schema: String,
        /// The undeclared name.
        name: String,
    },

    /// A unique structure saw the same field values twice.
    #[error("Instance copy in {schema}, which is defined as unique. Instance is {instance}")]
    NotUnique {
        /// Structure name.
        schema: String,
        /// Rendering of the colliding instance.
        instance: String,
    },

    /// A structure tried to extend a sealed structure.
    #[error("Tried to extend {parent}, which is a FinalStructure. This is forbidden")]
    SealedParent {
        /// Name of the sealed parent.
        parent: String,
    },

    /// A declaration used a plain value where a field type was expected.
    #[error("Unsupported field type in definition: '{value}'")]
    UnsupportedFieldType {
        /// The offending declaration value, rendered without quotes.
        value: String,
    },

    /// A declaration is malformed (bad pattern, unknown required name, ...).
    #[error("{schema}: {reason}")]
    InvalidDeclaration {
        /// Structure (or field) the declaration belongs to.
        schema: String,
        /// What is wrong with it.
        reason: String,
    },
}

impl ValidationError {
    /// Type error for `field` with the given detail.
    pub fn invalid_type(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidType {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Value error for `field` with the given detail.
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Declaration error.
    pub fn invalid_declaration(schema: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidDeclaration {
            schema: schema.into(),
            reason: reason.into(),
        }
    }

    /// Returns whether this is a type error or a value error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidValue { .. } | Self::NoMatchingOption { .. } | Self::NotUnique { .. } => {
                ErrorKind::Value
            }
            Self::InvalidType { .. }
            | Self::MissingRequired { .. }
            | Self::UnexpectedArgument { .. }
            | Self::UnknownField { .. }
            | Self::SealedParent { .. }
            | Self::UnsupportedFieldType { .. }
            | Self::InvalidDeclaration { .. } => ErrorKind::Type,
        }
    }

    /// Whether this is a type error.
    pub fn is_type_error(&self) -> bool {
        self.kind() == ErrorKind::Type
    }

    /// Whether this is a value error.
    pub fn is_value_error(&self) -> bool {
        self.kind() == ErrorKind::Value
    }

    /// The field label of a field-level error.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::InvalidType { field, .. }
            | Self::InvalidValue { field, .. }
            | Self::NoMatchingOption { field, .. } => Some(field),
            _ => None,
        }
    }

    /// Rewrites the field label of a field-level error; other variants are
    /// returned unchanged.
    pub fn relabel(self, label: impl Into<String>) -> Self {
        match self {
            Self::InvalidType { message, .. } => Self::InvalidType {
                field: label.into(),
                message,
            },
            Self::InvalidValue { message, .. } => Self::InvalidValue {
                field: label.into(),
                message,
            },
            Self::NoMatchingOption { value, .. } => Self::NoMatchingOption {
                field: label.into(),
                value,
            },
            other => other,
        }
    }
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;
