//! Deterministic canonical-form serialization and hashing.
//!
//! Every signature and every hash chain link in this workspace depends on
//! byte-for-byte identical canonical output. `serde_json`'s default `Map`
//! (without the `preserve_order` feature, which this workspace never
//! enables) is backed by a `BTreeMap`, so round-tripping any value through
//! [`to_value`](serde_json::to_value) and back to bytes already yields
//! object keys in ascending code-point order, no insignificant whitespace,
//! and RFC 8259 string escaping. [`canonicalize`] makes that contract
//! explicit and gives canonicalization failures their own error type instead
//! of letting a `serde_json::Error` leak through untyped.

use serde::Serialize;
use sha2::{Digest, Sha256};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CanonError {
    #[error("failed to canonicalize value: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type CanonResult<T> = Result<T, CanonError>;

/// Deterministic byte-string for any JSON-representable value: object keys
/// sorted by Unicode code point, no insignificant whitespace, numbers in
/// shortest round-trip form, RFC 8259 string escaping.
pub fn canonicalize<T: Serialize>(value: &T) -> CanonResult<Vec<u8>> {
    let normalized = serde_json::to_value(value)?;
    Ok(serde_json::to_vec(&normalized)?)
}

/// `hex(SHA-256(canonicalize(value)))`.
pub fn hash<T: Serialize>(value: &T) -> CanonResult<String> {
    let bytes = canonicalize(value)?;
    Ok(sha256_hex(&bytes))
}

/// Raw SHA-256 over already-canonical bytes (e.g. a previous event's full
/// canonical form, for hash-chain linking).
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn sorts_object_keys_lexicographically() {
        let value = json!({"b": 1, "a": 2, "c": 3});
        let bytes = canonicalize(&value).unwrap();
        assert_eq!(bytes, br#"{"a":2,"b":1,"c":3}"#);
    }

    #[test]
    fn nested_objects_are_sorted_recursively() {
        let value = json!({"outer": {"z": 1, "a": 2}});
        let bytes = canonicalize(&value).unwrap();
        assert_eq!(bytes, br#"{"outer":{"a":2,"z":1}}"#);
    }

    #[test]
    fn no_insignificant_whitespace() {
        let value = json!({"key": [1, 2, 3]});
        let bytes = canonicalize(&value).unwrap();
        assert!(!bytes.contains(&b' '));
        assert!(!bytes.contains(&b'\n'));
    }

    #[test]
    fn is_stable_under_semantically_equal_reserialization() {
        #[derive(Serialize)]
        struct A {
            b: u32,
            a: u32,
        }
        #[derive(Serialize)]
        struct B {
            a: u32,
            b: u32,
        }
        let a = A { b: 2, a: 1 };
        let b = B { a: 1, b: 2 };
        assert_eq!(canonicalize(&a).unwrap(), canonicalize(&b).unwrap());
    }

    #[test]
    fn hash_is_deterministic() {
        let value = json!({"x": 1});
        assert_eq!(hash(&value).unwrap(), hash(&value).unwrap());
        assert_eq!(hash(&value).unwrap().len(), 64);
    }

    #[test]
    fn different_values_hash_differently() {
        assert_ne!(
            hash(&json!({"x": 1})).unwrap(),
            hash(&json!({"x": 2})).unwrap()
        );
    }
}
