//! # Fingerprints — Content Digests of Field Values
//!
//! A [`Fingerprint`] identifies the content of a structure instance for the
//! uniqueness registry. It can only be computed from [`CanonicalBytes`],
//! so every fingerprint in the system goes through the same encoding.

use sha2::{Digest, Sha256};

use crate::canonical::CanonicalBytes;

/// SHA-256 digest of canonical field bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint(pub [u8; 32]);

impl Fingerprint {
    /// The raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Render the digest as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02x}")).collect()
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sha256:{}", self.to_hex())
    }
}

/// Compute the SHA-256 fingerprint of canonical bytes.
pub fn sha256_fingerprint(data: &CanonicalBytes) -> Fingerprint {
    let hash = Sha256::digest(data.as_bytes());
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&hash);
    Fingerprint(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    #[test]
    fn equal_fields_give_equal_fingerprints() {
        let i = Value::from(1);
        let s = Value::from("xxx");
        let a = sha256_fingerprint(&CanonicalBytes::from_fields([("i", &i), ("s", &s)]));
        let b = sha256_fingerprint(&CanonicalBytes::from_fields([("s", &s), ("i", &i)]));
        assert_eq!(a, b);
    }

    #[test]
    fn different_fields_give_different_fingerprints() {
        let one = Value::from(1);
        let two = Value::from(2);
        let a = sha256_fingerprint(&CanonicalBytes::from_fields([("i", &one)]));
        let b = sha256_fingerprint(&CanonicalBytes::from_fields([("i", &two)]));
        assert_ne!(a, b);
    }

    #[test]
    fn hex_rendering() {
        let fp = sha256_fingerprint(&CanonicalBytes::from_value(&Value::None));
        assert_eq!(fp.to_hex().len(), 64);
        assert!(fp.to_string().starts_with("sha256:"));
        assert!(fp.to_hex().chars().all(|c| c.is_ascii_hexdigit()));
    }
}
