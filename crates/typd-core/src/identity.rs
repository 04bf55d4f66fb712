//! # Structure Identity
//!
//! Every built structure schema receives a fresh [`StructureId`]. The id is
//! the schema's identity everywhere identity matters: nested-structure
//! class checks, instance equality, and the uniqueness registry key.
//! Two schemas with the same name are still distinct structures.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a structure schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StructureId(pub Uuid);

impl StructureId {
    /// Generate a new random structure identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for StructureId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for StructureId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "structure:{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_ids_are_distinct() {
        assert_ne!(StructureId::new(), StructureId::new());
    }

    #[test]
    fn display_is_prefixed() {
        let id = StructureId::new();
        assert!(id.to_string().starts_with("structure:"));
        assert!(id.to_string().ends_with(&id.as_uuid().to_string()));
    }

    #[test]
    fn serde_roundtrip_preserves_identity() {
        let id = StructureId::new();
        let json = serde_json::to_string(&id).unwrap();
        let back: StructureId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);
    }
}
