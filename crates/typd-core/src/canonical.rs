//! # Canonical Bytes — Deterministic Encoding of Field Values
//!
//! This module defines `CanonicalBytes`, the sole construction path for
//! bytes used in fingerprint computation.
//!
//! ## Invariant
//!
//! Two sets of `(field name, value)` pairs that compare equal encode to the
//! same bytes, independent of the order the pairs were supplied in:
//!
//! 1. Pairs are sorted by field name.
//! 2. Every value is written with a one-byte variant tag, so `Int(1)`,
//!    `Float(1.0)` and `Str("1")` never collide.
//! 3. Strings and names are length-prefixed.
//! 4. Map entries are encoded individually and sorted, because map equality
//!    ignores insertion order.
//! 5. `-0.0` is written as `0.0`, matching float equality.
//! 6. Objects are written as their class key followed by their rendering.
//!    Structure classes contribute their id; Rust types contribute a hash
//!    of their `TypeId`, which is stable for the life of the process and so
//!    for the registry that stores fingerprints.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::object::ClassKey;
use crate::value::Value;

/// Bytes produced exclusively by the canonical field encoding.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalBytes(Vec<u8>);

impl CanonicalBytes {
    /// Encode a set of named field values.
    pub fn from_fields<'a, I>(fields: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a Value)>,
    {
        let mut pairs: Vec<(&str, &Value)> = fields.into_iter().collect();
        pairs.sort_by(|a, b| a.0.cmp(b.0));

        let mut out = Vec::new();
        write_len(&mut out, pairs.len());
        for (name, value) in pairs {
            write_str(&mut out, name);
            encode_value(&mut out, value);
        }
        Self(out)
    }

    /// Encode a single value.
    pub fn from_value(value: &Value) -> Self {
        let mut out = Vec::new();
        encode_value(&mut out, value);
        Self(out)
    }

    /// Access the canonical bytes for fingerprint computation.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns the length of the canonical byte sequence.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the canonical byte sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for CanonicalBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

fn write_len(out: &mut Vec<u8>, len: usize) {
    out.extend_from_slice(&(len as u64).to_be_bytes());
}

fn write_str(out: &mut Vec<u8>, s: &str) {
    write_len(out, s.len());
    out.extend_from_slice(s.as_bytes());
}

fn encode_value(out: &mut Vec<u8>, value: &Value) {
    match value {
        Value::None => out.push(b'N'),
        Value::Bool(b) => {
            out.push(b'B');
            out.push(u8::from(*b));
        }
        Value::Int(i) => {
            out.push(b'I');
            out.extend_from_slice(&i.to_be_bytes());
        }
        Value::Float(x) => {
            out.push(b'F');
            let x = if *x == 0.0 { 0.0 } else { *x };
            out.extend_from_slice(&x.to_bits().to_be_bytes());
        }
        Value::Str(s) => {
            out.push(b'S');
            write_str(out, s);
        }
        Value::Date(d) => {
            out.push(b'D');
            write_str(out, &d.format("%Y-%m-%d").to_string());
        }
        Value::DateTime(dt) => {
            out.push(b'T');
            write_str(out, &dt.format("%Y-%m-%dT%H:%M:%S%.f").to_string());
        }
        Value::Enum(member) => {
            out.push(b'E');
            write_str(out, &member.enum_name);
            write_str(out, &member.member);
        }
        Value::List(items) => {
            out.push(b'L');
            write_len(out, items.len());
            for item in items {
                encode_value(out, item);
            }
        }
        Value::Map(map) => {
            out.push(b'M');
            write_len(out, map.len());
            let mut entries: Vec<Vec<u8>> = map
                .iter()
                .map(|(k, v)| {
                    let mut entry = Vec::new();
                    encode_value(&mut entry, k);
                    encode_value(&mut entry, v);
                    entry
                })
                .collect();
            entries.sort();
            for entry in entries {
                write_len(out, entry.len());
                out.extend_from_slice(&entry);
            }
        }
        Value::Object(object) => {
            out.push(b'O');
            encode_class(out, object.class().key());
            write_str(out, &object.to_string());
        }
    }
}

fn encode_class(out: &mut Vec<u8>, key: ClassKey) {
    match key {
        ClassKey::Structure(id) => {
            out.push(b'S');
            out.extend_from_slice(id.as_uuid().as_bytes());
        }
        ClassKey::Type(type_id) => {
            let mut hasher = DefaultHasher::new();
            type_id.hash(&mut hasher);
            out.push(b'T');
            out.extend_from_slice(&hasher.finish().to_be_bytes());
        }
    }
}
