//! # typd-structure — Structures
//!
//! Named record types built from typd fields, and the instances that
//! satisfy them.
//!
//! ## Modules
//!
//! - [`schema`]: [`SchemaBuilder`] normalizes a declaration (inheritance,
//!   sealing, required/optional resolution, flag resolution) into an
//!   immutable [`Schema`].
//! - [`instance`]: [`Instance`] construction, field access, validated
//!   mutation, cloning with overrides, equality and rendering.
//! - [`registry`]: the process-wide [`UniquenessRegistry`] behind unique
//!   structures.
//!
//! ## Example
//!
//! ```
//! use typd_core::Value;
//! use typd_field::TypeSpec;
//! use typd_structure::Schema;
//!
//! let foo = Schema::builder("Foo")
//!     .field("i", TypeSpec::Int)
//!     .field("s", TypeSpec::optional(TypeSpec::Str))
//!     .build()
//!     .unwrap();
//! let instance = foo.construct([("i", Value::Int(5))]).unwrap();
//! assert_eq!(instance.get("s").unwrap(), &Value::None);
//! ```
//!
//! ## Crate Policy
//!
//! - Logs through `tracing`; never installs a subscriber.
//! - The uniqueness registry is the only state shared between calls.

pub mod instance;
pub mod registry;
pub mod schema;

pub use instance::Instance;
pub use registry::{
    DuplicateInstance, RegistryConfig, UniquenessRegistry, MAX_INSTANCES_TO_VERIFY_UNIQUENESS,
};
pub use schema::{Schema, SchemaBuilder, SchemaFlags};
