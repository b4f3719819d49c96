//! DID-key style actor identifiers.
//!
//! Encodes an Ed25519 public key as `did:key:z<base64url(multicodec || key)>`
//! using the Ed25519 multicodec prefix (`0xED 0x01`). This mirrors the shape
//! of the did:key method without adopting its base58btc alphabet, so treat
//! these identifiers as internal to this kernel rather than interoperable
//! with external did:key resolvers.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;

use crate::error::{CryptoError, CryptoResult};

const ED25519_MULTICODEC_PREFIX: [u8; 2] = [0xED, 0x01];

pub fn encode(public_key_bytes: &[u8; 32]) -> String {
    let mut buf = Vec::with_capacity(2 + 32);
    buf.extend_from_slice(&ED25519_MULTICODEC_PREFIX);
    buf.extend_from_slice(public_key_bytes);
    format!("did:key:z{}", URL_SAFE_NO_PAD.encode(buf))
}

/// Recovers the raw 32-byte public key from a did-key identifier produced
/// by [`encode`].
pub fn decode(did: &str) -> CryptoResult<[u8; 32]> {
    let body = did
        .strip_prefix("did:key:z")
        .ok_or_else(|| CryptoError::InvalidKeyFormat(did.to_string()))?;
    let bytes = URL_SAFE_NO_PAD
        .decode(body)
        .map_err(|e| CryptoError::InvalidKeyFormat(e.to_string()))?;
    if bytes.len() < 2 {
        return Err(CryptoError::InvalidKeyFormat(
            "did-key payload shorter than multicodec prefix".into(),
        ));
    }
    let (prefix, key) = bytes.split_at(2);
    if prefix != ED25519_MULTICODEC_PREFIX {
        return Err(CryptoError::InvalidKeyFormat(
            "unexpected multicodec prefix".into(),
        ));
    }
    key.try_into()
        .map_err(|_| CryptoError::InvalidKeyFormat("public key is not 32 bytes".into()))
}
