//! # typd-core — Foundational Types for typd
//!
//! This crate is the leaf of the typd workspace. It defines the runtime
//! values that flow through field validation and structure construction,
//! and the error type every other crate reports with. It depends on
//! nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **One closed value model.** [`Value`] is the only representation a
//!    field ever sees. Scalars, dates, enum members, lists, maps and opaque
//!    class instances are all variants; dispatch is by `match`, never by
//!    runtime duck-typing.
//!
//! 2. **Opaque classes are identity-checked.** An [`Object`] carries a
//!    [`ClassId`] token and an equality check captured at construction.
//!    Fields that accept arbitrary classes compare tokens and nothing else.
//!
//! 3. **Fingerprints flow through `CanonicalBytes`.** Uniqueness checks hash
//!    only the canonical encoding produced by [`CanonicalBytes::from_fields`],
//!    so two equal instances always produce the same [`Fingerprint`].
//!
//! 4. **Two error kinds.** Every [`ValidationError`] is either a type error
//!    or a value error ([`ErrorKind`]), with a field-qualified message whose
//!    text is part of the public contract.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `typd-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod canonical;
pub mod digest;
pub mod error;
pub mod identity;
pub mod object;
pub mod value;

// Re-export primary types for ergonomic imports.
pub use canonical::CanonicalBytes;
pub use digest::{sha256_fingerprint, Fingerprint};
pub use error::{ErrorKind, ValidationError, ValidationResult};
pub use identity::StructureId;
pub use object::{ClassId, ClassKey, Object};
pub use value::{EnumMember, Value, ValueMap};
