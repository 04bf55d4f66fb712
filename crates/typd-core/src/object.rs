//! # Opaque Class Instances
//!
//! Fields may hold instances of arbitrary caller-defined classes that typd
//! knows nothing about. An [`Object`] wraps such an instance behind an
//! `Arc`, tagged with the [`ClassId`] of its runtime class and the equality
//! and rendering functions of that class, captured when the object is made.
//!
//! Class fields validate by comparing the token only. There is no
//! structural inspection of the payload and no subtype widening.

use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::identity::StructureId;

/// What a [`ClassId`] is keyed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassKey {
    /// A Rust type.
    Type(TypeId),
    /// A typd structure schema.
    Structure(StructureId),
}

/// Identity token of a runtime class.
///
/// Equality and hashing consider only the key; the name is for messages.
#[derive(Debug, Clone)]
pub struct ClassId {
    key: ClassKey,
    name: Arc<str>,
}

impl ClassId {
    /// The class of Rust type `T`.
    pub fn of<T: Any>() -> Self {
        Self {
            key: ClassKey::Type(TypeId::of::<T>()),
            name: Arc::from(std::any::type_name::<T>()),
        }
    }

    /// The class of instances of the structure `id`, named `name`.
    pub fn structure(id: StructureId, name: &str) -> Self {
        Self {
            key: ClassKey::Structure(id),
            name: Arc::from(name),
        }
    }

    /// The identity key.
    pub fn key(&self) -> ClassKey {
        self.key
    }

    /// The class name used in messages.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl PartialEq for ClassId {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for ClassId {}

impl Hash for ClassId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<class '{}'>", self.name)
    }
}

type Payload = dyn Any + Send + Sync;

/// A shared instance of an arbitrary class.
///
/// Cloning an `Object` shares the payload. Two objects are equal when their
/// classes match and the class' own `PartialEq` says the payloads are equal.
#[derive(Clone)]
pub struct Object {
    class: ClassId,
    payload: Arc<Payload>,
    eq: fn(&dyn Any, &dyn Any) -> bool,
    render: fn(&dyn Any, &mut fmt::Formatter<'_>) -> fmt::Result,
}

impl Object {
    /// Wrap `value`, classed by its Rust type and rendered with `Debug`.
    pub fn new<T>(value: T) -> Self
    where
        T: Any + Send + Sync + PartialEq + fmt::Debug,
    {
        Self {
            class: ClassId::of::<T>(),
            payload: Arc::new(value),
            eq: eq_as::<T>,
            render: debug_as::<T>,
        }
    }

    /// Wrap `value` under an explicit class token, rendered with `Display`.
    ///
    /// Used for values whose class is not their Rust type, such as
    /// structure instances, whose class is their schema.
    pub fn with_class<T>(class: ClassId, value: T) -> Self
    where
        T: Any + Send + Sync + PartialEq + fmt::Display,
    {
        Self {
            class,
            payload: Arc::new(value),
            eq: eq_as::<T>,
            render: display_as::<T>,
        }
    }

    /// The runtime class of the payload.
    pub fn class(&self) -> &ClassId {
        &self.class
    }

    /// Whether the payload's class is exactly `class`.
    pub fn is_instance_of(&self, class: &ClassId) -> bool {
        &self.class == class
    }

    /// Borrow the payload as `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.payload.downcast_ref::<T>()
    }

    /// Whether both objects share the same payload allocation.
    pub fn shares_payload(&self, other: &Object) -> bool {
        std::ptr::eq(
            Arc::as_ptr(&self.payload) as *const u8,
            Arc::as_ptr(&other.payload) as *const u8,
        )
    }
}

impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        self.class == other.class && (self.eq)(payload_ref(self), payload_ref(other))
    }
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        (self.render)(payload_ref(self), f)
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Object({}: ", self.class.name())?;
        (self.render)(payload_ref(self), f)?;
        f.write_str(")")
    }
}

fn payload_ref(object: &Object) -> &dyn Any {
    let payload: &Payload = &*object.payload;
    payload
}

fn eq_as<T: Any + PartialEq>(a: &dyn Any, b: &dyn Any) -> bool {
    match (a.downcast_ref::<T>(), b.downcast_ref::<T>()) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

fn debug_as<T: Any + fmt::Debug>(value: &dyn Any, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match value.downcast_ref::<T>() {
        Some(v) => fmt::Debug::fmt(v, f),
        None => f.write_str("<?>"),
    }
}

fn display_as<T: Any + fmt::Display>(value: &dyn Any, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match value.downcast_ref::<T>() {
        Some(v) => fmt::Display::fmt(v, f),
        None => f.write_str("<?>"),
    }
}
