//! # typd-field — Field Descriptors
//!
//! A [`Field`] is a self-contained validation rule for one value: its kind
//! (number, string, date, enum, class, container, union, ...), the kind's
//! constraint parameters, and an optional default value.
//!
//! ## Scalar Descriptors
//!
//! - [`NumberField`]: integer, float, number and decimal kinds with
//!   inclusive/exclusive bounds and `multiple_of`.
//! - [`StringField`]: length bounds and a regular expression matched from
//!   the start of the string.
//! - [`DateField`] / [`DateTimeField`]: native values, or text parsed with
//!   one or more accepted formats.
//! - [`EnumField`]: members of a declared [`EnumDef`].
//! - Boolean, null, and arbitrary-class fields.
//!
//! ## Combinators (`composite`)
//!
//! [`ArrayField`] (sequence-of), [`MapField`] (mapping), [`AnyOfField`]
//! (one-of-N, tried in declaration order) and [`Field::optional`].
//!
//! ## Declarations (`spec`)
//!
//! [`TypeSpec`] is what a declaration front-end hands over for each field.
//! [`TypeSpec::normalize`] turns it into a [`Field`], rejecting plain
//! values used where a type was expected.
//!
//! ## Crate Policy
//!
//! - Depends only on `typd-core` internally.
//! - Validation is pure: descriptors are never mutated by validating.

pub mod composite;
pub mod enumeration;
pub mod field;
pub mod number;
pub mod spec;
pub mod string;
pub mod temporal;

pub use composite::{AnyOfField, ArrayField, MapField};
pub use enumeration::{EnumDef, EnumField};
pub use field::{Field, FieldKind};
pub use number::{NumberField, NumberKind};
pub use spec::TypeSpec;
pub use string::StringField;
pub use temporal::{DateField, DateTimeField, DEFAULT_DATE_FORMAT, DEFAULT_DATE_TIME_FORMAT};
