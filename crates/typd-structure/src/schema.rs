//! # Structure Schemas
//!
//! A [`Schema`] is the normalized declaration of one structure: its ordered
//! fields, the required/optional split, and its flags. Schemas are built
//! once through [`SchemaBuilder`] and are immutable afterwards; they are
//! shared as `Arc<Schema>` by every instance and child schema.
//!
//! ## Normalization
//!
//! [`SchemaBuilder::build`] performs, in order:
//!
//! 1. Refuse a sealed parent.
//! 2. Normalize every declared [`TypeSpec`] to a [`Field`].
//! 3. Merge with the parent's fields. A redeclared name keeps the parent's
//!    position and takes the child's descriptor; new names append.
//! 4. Resolve flags. `ignore_none` and the explicit required/optional
//!    lists inherit from the parent unless set; `sealed` and `unique` do
//!    not inherit.
//! 5. Split required from optional over the merged fields. An explicit
//!    required list is taken as-is. Otherwise a field is required unless
//!    it is listed optional, accepts `None`, or has a default.
//! 6. Check every field declaration, including its default.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use typd_core::{ClassId, StructureId, ValidationError, ValidationResult, Value};
use typd_field::{Field, TypeSpec};

use crate::instance::Instance;

/// Structure-level flags, loadable from configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaFlags {
    /// Store an explicit `None` for a non-required field without validating.
    pub ignore_none: bool,
    /// Forbid extending the structure.
    pub sealed: bool,
    /// Refuse a second instance with the same field values.
    pub unique: bool,
    /// Per-structure uniqueness capacity; the registry default if unset.
    pub unique_capacity: Option<usize>,
}

/// Declares a structure.
#[derive(Debug)]
pub struct SchemaBuilder {
    name: String,
    parent: Option<Arc<Schema>>,
    declared: Vec<(String, TypeSpec)>,
    required: Option<Vec<String>>,
    optional: Option<Vec<String>>,
    ignore_none: Option<bool>,
    sealed: bool,
    unique: bool,
    unique_capacity: Option<usize>,
}

impl SchemaBuilder {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            declared: Vec::new(),
            required: None,
            optional: None,
            ignore_none: None,
            sealed: false,
            unique: false,
            unique_capacity: None,
        }
    }

    /// Declare field `name`. Declaration order is kept.
    pub fn field(mut self, name: impl Into<String>, spec: impl Into<TypeSpec>) -> Self {
        let name = name.into();
        let spec = spec.into();
        match self.declared.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => *slot = spec,
            None => self.declared.push((name, spec)),
        }
        self
    }

    /// Extend `parent`.
    pub fn extends(mut self, parent: &Arc<Schema>) -> Self {
        self.parent = Some(Arc::clone(parent));
        self
    }

    /// Exactly these fields are required. May be empty.
    pub fn required<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// These fields are optional.
    pub fn optional<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.optional = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Set the ignore-none flag.
    pub fn ignore_none(mut self, ignore: bool) -> Self {
        self.ignore_none = Some(ignore);
        self
    }

    /// Forbid extending the structure.
    pub fn sealed(mut self) -> Self {
        self.sealed = true;
        self
    }

    /// Refuse duplicate instances.
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Stop checking uniqueness after `capacity` instances.
    pub fn unique_capacity(mut self, capacity: usize) -> Self {
        self.unique_capacity = Some(capacity);
        self
    }

    /// Apply a full flag set, replacing any flags set so far.
    pub fn flags(mut self, flags: SchemaFlags) -> Self {
        self.ignore_none = Some(flags.ignore_none);
        self.sealed = flags.sealed;
        self.unique = flags.unique;
        self.unique_capacity = flags.unique_capacity;
        self
    }

    /// Normalize the declaration into a schema.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::SealedParent`] if the parent is sealed.
    /// - [`ValidationError::UnsupportedFieldType`] if a field was declared
    ///   with a plain value.
    /// - [`ValidationError::InvalidDeclaration`] for required/optional names
    ///   that are not fields, or incoherent field parameters.
    /// - Any field error raised by validating a default.
    pub fn build(self) -> ValidationResult<Arc<Schema>> {
        if let Some(parent) = self.parent.as_ref().filter(|p| p.sealed) {
            return Err(ValidationError::SealedParent {
                parent: parent.name.clone(),
            });
        }

        let mut fields: Vec<(String, Field)> = self
            .parent
            .as_ref()
            .map(|p| p.fields.clone())
            .unwrap_or_default();
        for (name, spec) in self.declared {
            let field = spec.normalize()?;
            match fields.iter_mut().find(|(n, _)| *n == name) {
                Some((_, slot)) => *slot = field,
                None => fields.push((name, field)),
            }
        }

        let parent = self.parent.as_deref();
        let ignore_none = self
            .ignore_none
            .or(parent.map(|p| p.ignore_none))
            .unwrap_or(false);
        let explicit_required = self
            .required
            .or_else(|| parent.and_then(|p| p.explicit_required.clone()));
        let explicit_optional = self
            .optional
            .or_else(|| parent.and_then(|p| p.explicit_optional.clone()));

        for (list, names) in [
            ("required", &explicit_required),
            ("optional", &explicit_optional),
        ] {
            for name in names.iter().flatten() {
                if !fields.iter().any(|(n, _)| n == name) {
                    return Err(ValidationError::invalid_declaration(
                        &self.name,
                        format!("'{name}' is listed as {list} but is not a declared field"),
                    ));
                }
            }
        }

        let (required, optional): (Vec<_>, Vec<_>) =
            fields.iter().partition(|(name, field)| match &explicit_required {
                Some(listed) => listed.contains(name),
                None => {
                    !explicit_optional.iter().flatten().any(|n| n == name)
                        && !field.accepts_none()
                        && field.default_value().is_none()
                }
            });
        let required: Vec<String> = required.into_iter().map(|(n, _)| n.clone()).collect();
        let optional: Vec<String> = optional.into_iter().map(|(n, _)| n.clone()).collect();

        for (name, field) in &fields {
            field.check(name)?;
        }

        let schema = Schema {
            id: StructureId::new(),
            name: self.name,
            fields,
            required,
            optional,
            explicit_required,
            explicit_optional,
            ignore_none,
            sealed: self.sealed,
            unique: self.unique,
            unique_capacity: self.unique_capacity,
            parent: self.parent,
        };
        tracing::debug!(
            schema = %schema.name,
            id = %schema.id,
            fields = schema.fields.len(),
            required = schema.required.len(),
            "structure schema built"
        );
        Ok(Arc::new(schema))
    }
}

/// A normalized structure declaration.
#[derive(Debug)]
pub struct Schema {
    id: StructureId,
    name: String,
    fields: Vec<(String, Field)>,
    required: Vec<String>,
    optional: Vec<String>,
    explicit_required: Option<Vec<String>>,
    explicit_optional: Option<Vec<String>>,
    ignore_none: bool,
    sealed: bool,
    unique: bool,
    unique_capacity: Option<usize>,
    parent: Option<Arc<Schema>>,
}

impl Schema {
    /// Start declaring structure `name`.
    pub fn builder(name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder::new(name)
    }

    /// Build an instance; see [`Instance::new`].
    pub fn construct<I, K>(self: &Arc<Self>, args: I) -> ValidationResult<Instance>
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        Instance::new(self, args)
    }

    /// Identity of the structure.
    pub fn id(&self) -> StructureId {
        self.id
    }

    /// Structure name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fields in declaration order, inherited fields first.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Field)> {
        self.fields.iter().map(|(n, f)| (n.as_str(), f))
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the structure declares no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The field called `name`.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.position(name).map(|i| &self.fields[i].1)
    }

    /// All fields keyed by name.
    pub fn get_all_fields_by_name(&self) -> BTreeMap<&str, &Field> {
        self.fields().collect()
    }

    /// Required field names, in declaration order.
    pub fn required(&self) -> &[String] {
        &self.required
    }

    /// Optional field names, in declaration order.
    pub fn optional(&self) -> &[String] {
        &self.optional
    }

    /// Whether `name` is a required field.
    pub fn is_required(&self, name: &str) -> bool {
        self.required.iter().any(|n| n == name)
    }

    /// Whether explicit `None` skips validation on non-required fields.
    pub fn ignore_none(&self) -> bool {
        self.ignore_none
    }

    /// Whether the structure may not be extended.
    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    /// Whether duplicate instances are refused.
    pub fn is_unique(&self) -> bool {
        self.unique
    }

    /// Uniqueness capacity declared by the structure.
    pub fn unique_capacity(&self) -> Option<usize> {
        self.unique_capacity
    }

    /// The extended structure.
    pub fn parent(&self) -> Option<&Arc<Schema>> {
        self.parent.as_ref()
    }

    /// Class token carried by instances wrapped as values.
    pub fn class_id(&self) -> ClassId {
        ClassId::structure(self.id, &self.name)
    }

    /// A field accepting instances of this structure.
    pub fn as_field(&self) -> Field {
        Field::class(self.class_id())
    }

    pub(crate) fn position(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|(n, _)| n == name)
    }

    pub(crate) fn field_at(&self, index: usize) -> (&str, &Field) {
        let (name, field) = &self.fields[index];
        (name.as_str(), field)
    }

    /// Validate `value` for the field at `index`, honoring `ignore_none`.
    pub(crate) fn admit(&self, index: usize, value: Value) -> ValidationResult<Value> {
        let (name, field) = self.field_at(index);
        if value.is_none() && self.ignore_none && !self.is_required(name) {
            return Ok(value);
        }
        field.validate(name, value)
    }
}

impl From<&Schema> for TypeSpec {
    fn from(schema: &Schema) -> Self {
        TypeSpec::Class(schema.class_id())
    }
}
