//! Cache key generation.

use crate::types::DocumentKind;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

/// Separates the hashed parts so `("ab", "c")` and `("a", "bc")` differ.
const PART_SEPARATOR: &[u8] = b"\x1f";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheKey {
    pub hash: String,
    pub kind: Option<DocumentKind>,
}

impl CacheKey {
    pub fn new(hash: impl Into<String>) -> Self {
        Self {
            hash: hash.into(),
            kind: None,
        }
    }

    pub fn with_kind(mut self, kind: DocumentKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn as_str(&self) -> &str {
        &self.hash
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.hash)
    }
}

impl From<&str> for CacheKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for CacheKey {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// SHA-256 fingerprints over canonical JSON.
#[derive(Debug, Clone, Default)]
pub struct CacheKeyGenerator {
    salt: Option<String>,
}

impl CacheKeyGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mixed into every hash; changing it invalidates all previous keys.
    pub fn with_salt(mut self, salt: impl Into<String>) -> Self {
        self.salt = Some(salt.into());
        self
    }

    pub fn generate(&self, payload: &Value, kind: DocumentKind, aux: &str) -> CacheKey {
        let mut hasher = Sha256::new();
        if let Some(ref salt) = self.salt {
            hasher.update(salt.as_bytes());
            hasher.update(PART_SEPARATOR);
        }
        hasher.update(canonical_json(payload).as_bytes());
        hasher.update(PART_SEPARATOR);
        hasher.update(kind.as_str().as_bytes());
        hasher.update(PART_SEPARATOR);
        hasher.update(aux.as_bytes());
        let hash: String = hasher
            .finalize()
            .iter()
            .map(|b| format!("{:02x}", b))
            .collect();
        CacheKey::new(hash).with_kind(kind)
    }
}

/// Fingerprint with the default unsalted generator.
pub fn fingerprint(payload: &Value, kind: DocumentKind, aux: &str) -> CacheKey {
    CacheKeyGenerator::new().generate(payload, kind, aux)
}

/// Compact JSON with object keys sorted at every depth.
///
/// Sorting is done here rather than relying on `serde_json::Map` ordering,
/// which flips to insertion order when any crate in the build enables
/// `preserve_order`.
pub fn canonical_json(value: &Value) -> String {
    serde_json::to_string(&SortedValue(value)).unwrap_or_default()
}

struct SortedValue<'a>(&'a Value);

impl Serialize for SortedValue<'_> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0 {
            Value::Object(map) => {
                let sorted: BTreeMap<&String, SortedValue<'_>> =
                    map.iter().map(|(k, v)| (k, SortedValue(v))).collect();
                sorted.serialize(serializer)
            }
            Value::Array(items) => {
                let items: Vec<SortedValue<'_>> = items.iter().map(SortedValue).collect();
                items.serialize(serializer)
            }
            other => other.serialize(serializer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_fingerprint_is_deterministic_and_hex() {
        let payload = json!({"role": "Engineer", "skills": ["Rust"]});
        let a = fingerprint(&payload, DocumentKind::Resume, "");
        let b = fingerprint(&payload, DocumentKind::Resume, "");
        assert_eq!(a, b);
        assert_eq!(a.hash.len(), 64);
        assert!(a.hash.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_key_order_does_not_matter() {
        let a: Value = serde_json::from_str(r#"{"b": 1, "a": {"y": 2, "x": 3}}"#).unwrap();
        let b: Value = serde_json::from_str(r#"{"a": {"x": 3, "y": 2}, "b": 1}"#).unwrap();
        assert_eq!(canonical_json(&a), r#"{"a":{"x":3,"y":2},"b":1}"#);
        assert_eq!(
            fingerprint(&a, DocumentKind::CoverLetter, "ctx"),
            fingerprint(&b, DocumentKind::CoverLetter, "ctx")
        );
    }

    #[test]
    fn test_kind_and_aux_change_the_key() {
        let payload = json!({"role": "Engineer"});
        let resume = fingerprint(&payload, DocumentKind::Resume, "");
        assert_ne!(resume, fingerprint(&payload, DocumentKind::CoverLetter, ""));
        assert_ne!(resume.hash, fingerprint(&payload, DocumentKind::Resume, "job").hash);
    }

    #[test]
    fn test_salt_changes_the_key() {
        let payload = json!({"role": "Engineer"});
        let plain = fingerprint(&payload, DocumentKind::Resume, "");
        let salted = CacheKeyGenerator::new()
            .with_salt("v2")
            .generate(&payload, DocumentKind::Resume, "");
        assert_ne!(plain.hash, salted.hash);
    }
}
