//! # Uniqueness Registry
//!
//! Records the fingerprint of every instance of every unique structure, so
//! that a second instance with the same field values can be refused.
//!
//! ## Capacity
//!
//! Each structure records at most `capacity` fingerprints. Once that many
//! are recorded, uniqueness checking for the structure stops: further
//! instances are accepted without being checked or recorded, and a
//! warning is logged the first time this happens. The default capacity is
//! [`MAX_INSTANCES_TO_VERIFY_UNIQUENESS`].
//!
//! ## Concurrency
//!
//! One `parking_lot::Mutex` guards all structures. Check and record happen
//! under a single lock acquisition, so two racing constructions of equal
//! instances cannot both succeed.

use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use typd_core::{Fingerprint, StructureId};

/// Default number of fingerprints recorded per unique structure.
pub const MAX_INSTANCES_TO_VERIFY_UNIQUENESS: usize = 100_000;

// -- Configuration ------------------------------------------------------------

/// Registry settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Capacity used for structures that do not declare their own.
    #[serde(default = "default_capacity")]
    pub default_capacity: usize,
}

fn default_capacity() -> usize {
    MAX_INSTANCES_TO_VERIFY_UNIQUENESS
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            default_capacity: default_capacity(),
        }
    }
}

// -- Errors -------------------------------------------------------------------

/// The fingerprint was already recorded for the structure.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("duplicate instance {fingerprint} of {structure}")]
pub struct DuplicateInstance {
    /// The structure checked against.
    pub structure: StructureId,
    /// The colliding fingerprint.
    pub fingerprint: Fingerprint,
}

// -- Registry -----------------------------------------------------------------

#[derive(Debug, Default)]
struct Entry {
    seen: HashSet<Fingerprint>,
    saturation_logged: bool,
}

/// Fingerprints of unique-structure instances, per structure.
#[derive(Debug, Default)]
pub struct UniquenessRegistry {
    config: RegistryConfig,
    entries: Mutex<HashMap<StructureId, Entry>>,
}

static GLOBAL: OnceLock<UniquenessRegistry> = OnceLock::new();

impl UniquenessRegistry {
    /// An empty registry.
    pub fn new(config: RegistryConfig) -> Self {
        Self {
            config,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// The process-wide registry used by structure construction.
    ///
    /// Created on first use with [`RegistryConfig::default`] unless
    /// [`UniquenessRegistry::configure_global`] ran first.
    pub fn global() -> &'static UniquenessRegistry {
        GLOBAL.get_or_init(|| UniquenessRegistry::new(RegistryConfig::default()))
    }

    /// Install the configuration of the process-wide registry.
    ///
    /// # Errors
    ///
    /// Returns `config` back if the registry already exists.
    pub fn configure_global(config: RegistryConfig) -> Result<(), RegistryConfig> {
        GLOBAL
            .set(UniquenessRegistry::new(config))
            .map_err(|rejected| rejected.config)
    }

    /// The registry settings.
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Record `fingerprint` for `structure`, refusing one already recorded.
    ///
    /// `capacity` overrides the configured default. A structure that has
    /// reached its capacity accepts everything without recording.
    ///
    /// # Errors
    ///
    /// [`DuplicateInstance`] if the fingerprint is already recorded.
    pub fn check_and_register(
        &self,
        structure: StructureId,
        fingerprint: Fingerprint,
        capacity: Option<usize>,
    ) -> Result<(), DuplicateInstance> {
        let capacity = capacity.unwrap_or(self.config.default_capacity);
        let mut entries = self.entries.lock();
        let entry = entries.entry(structure).or_default();

        if entry.seen.len() >= capacity {
            if !entry.saturation_logged {
                entry.saturation_logged = true;
                tracing::warn!(
                    %structure,
                    capacity,
                    "uniqueness registry saturated; no longer checking instances"
                );
            }
            return Ok(());
        }

        if entry.seen.insert(fingerprint) {
            Ok(())
        } else {
            Err(DuplicateInstance {
                structure,
                fingerprint,
            })
        }
    }

    /// Number of fingerprints recorded for `structure`.
    pub fn registered_count(&self, structure: StructureId) -> usize {
        self.entries
            .lock()
            .get(&structure)
            .map_or(0, |entry| entry.seen.len())
    }

    /// Whether `structure` has stopped being checked at `capacity`.
    pub fn is_saturated(&self, structure: StructureId, capacity: Option<usize>) -> bool {
        let capacity = capacity.unwrap_or(self.config.default_capacity);
        self.registered_count(structure) >= capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use typd_core::{sha256_fingerprint, CanonicalBytes, Value};

    fn fp(i: i64) -> Fingerprint {
        let v = Value::Int(i);
        sha256_fingerprint(&CanonicalBytes::from_fields([("i", &v)]))
    }

    #[test]
    fn duplicates_are_refused() {
        let registry = UniquenessRegistry::default();
        let id = StructureId::new();
        registry.check_and_register(id, fp(1), None).unwrap();
        registry.check_and_register(id, fp(2), None).unwrap();
        let err = registry.check_and_register(id, fp(1), None).unwrap_err();
        assert_eq!(err.structure, id);
        assert_eq!(registry.registered_count(id), 2);
    }

    #[test]
    fn structures_are_independent() {
        let registry = UniquenessRegistry::default();
        let (a, b) = (StructureId::new(), StructureId::new());
        registry.check_and_register(a, fp(1), None).unwrap();
        registry.check_and_register(b, fp(1), None).unwrap();
    }

    #[test]
    fn checking_stops_at_capacity() {
        let registry = UniquenessRegistry::default();
        let id = StructureId::new();
        for i in 0..3 {
            registry.check_and_register(id, fp(i), Some(3)).unwrap();
        }
        assert!(registry.is_saturated(id, Some(3)));
        registry.check_and_register(id, fp(1), Some(3)).unwrap();
        registry.check_and_register(id, fp(1), Some(3)).unwrap();
        assert_eq!(registry.registered_count(id), 3);
    }

    #[test]
    fn config_default_capacity_applies() {
        let registry = UniquenessRegistry::new(RegistryConfig {
            default_capacity: 1,
        });
        let id = StructureId::new();
        registry.check_and_register(id, fp(1), None).unwrap();
        registry.check_and_register(id, fp(1), None).unwrap();
        assert!(registry.check_and_register(id, fp(1), Some(5)).is_err());
    }

    #[test]
    fn config_deserializes_with_defaults() {
        let config: RegistryConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.default_capacity, MAX_INSTANCES_TO_VERIFY_UNIQUENESS);
        let config: RegistryConfig =
            serde_json::from_str(r#"{"default_capacity": 10}"#).unwrap();
        assert_eq!(config.default_capacity, 10);
    }
}
