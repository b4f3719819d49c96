//! In-process Ed25519 keystore.
//!
//! Private keys never leave this module: callers ask the keystore to sign
//! on their behalf rather than extracting signing key bytes.

use std::collections::HashMap;
use std::sync::RwLock;

use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use rand::rngs::OsRng;
use sovkernel_types::{ActorId, KeyId};

use crate::error::{CryptoError, CryptoResult};

enum KeyMaterial {
    /// Full keypair — can sign and verify.
    Full(SigningKey),
    /// Public key only, as would result from importing a counterparty's
    /// key for verification purposes. Signing with this key fails with
    /// [`CryptoError::MissingPrivateKey`].
    PublicOnly(VerifyingKey),
}

impl KeyMaterial {
    fn verifying_key(&self) -> VerifyingKey {
        match self {
            KeyMaterial::Full(sk) => sk.verifying_key(),
            KeyMaterial::PublicOnly(vk) => *vk,
        }
    }
}

/// Ed25519 keypair storage keyed by [`KeyId`]. Cheap to clone (an `Arc`
/// around the lock would also work; this kernel holds one keystore per
/// process and passes `&Keystore` around instead).
#[derive(Default)]
pub struct Keystore {
    keys: RwLock<HashMap<KeyId, KeyMaterial>>,
}

impl Keystore {
    pub fn new() -> Self {
        Self {
            keys: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the existing key for `actor` if present, else generates and
    /// stores a new keypair. Idempotent.
    pub fn ensure_key(&self, actor: &ActorId) -> KeyId {
        let key_id = actor.key_id();
        {
            let keys = self.keys.read().expect("keystore lock poisoned");
            if keys.contains_key(&key_id) {
                return key_id;
            }
        }
        let mut keys = self.keys.write().expect("keystore lock poisoned");
        keys.entry(key_id.clone())
            .or_insert_with(|| KeyMaterial::Full(SigningKey::generate(&mut OsRng)));
        key_id
    }

    /// Imports a full keypair from signing key bytes under `key_id`,
    /// overwriting any existing entry.
    pub fn import_keypair(&self, key_id: KeyId, signing_key_bytes: &[u8; 32]) {
        let signing_key = SigningKey::from_bytes(signing_key_bytes);
        let mut keys = self.keys.write().expect("keystore lock poisoned");
        keys.insert(key_id, KeyMaterial::Full(signing_key));
    }

    /// Imports a public key only, for verifying signatures from a remote
    /// actor whose private key this process never holds.
    pub fn import_public_key(&self, key_id: KeyId, public_key_bytes: &[u8; 32]) -> CryptoResult<()> {
        let verifying_key = VerifyingKey::from_bytes(public_key_bytes)
            .map_err(|e| CryptoError::InvalidKeyFormat(e.to_string()))?;
        let mut keys = self.keys.write().expect("keystore lock poisoned");
        keys.insert(key_id, KeyMaterial::PublicOnly(verifying_key));
        Ok(())
    }

    /// Signs `digest_bytes` under `key_id`, returning a lower-case hex
    /// signature. Fails with [`CryptoError::MissingPrivateKey`] if the key
    /// is unknown or public-only.
    pub fn sign(&self, digest_bytes: &[u8], key_id: &KeyId) -> CryptoResult<String> {
        let keys = self.keys.read().expect("keystore lock poisoned");
        match keys.get(key_id) {
            Some(KeyMaterial::Full(signing_key)) => {
                let signature: Signature = signing_key.sign(digest_bytes);
                Ok(hex::encode(signature.to_bytes()))
            }
            Some(KeyMaterial::PublicOnly(_)) | None => Err(CryptoError::MissingPrivateKey),
        }
    }

    /// Verifies a hex-encoded signature against raw public key bytes.
    /// Never errors: any decode or format problem is treated as a
    /// non-fatal negative result, per the kernel's fail-closed stance.
    pub fn verify(signature_hex: &str, digest_bytes: &[u8], public_key_bytes: &[u8]) -> bool {
        let Ok(sig_bytes) = hex::decode(signature_hex) else {
            return false;
        };
        let Ok(sig_array): Result<[u8; 64], _> = sig_bytes.try_into() else {
            return false;
        };
        let Ok(pk_array): Result<[u8; 32], _> = public_key_bytes.try_into() else {
            return false;
        };
        let Ok(verifying_key) = VerifyingKey::from_bytes(&pk_array) else {
            return false;
        };
        let signature = Signature::from_bytes(&sig_array);
        verifying_key.verify(digest_bytes, &signature).is_ok()
    }

    /// Verifies a signature against a key already held by this keystore.
    pub fn verify_with_key(&self, signature_hex: &str, digest_bytes: &[u8], key_id: &KeyId) -> bool {
        let keys = self.keys.read().expect("keystore lock poisoned");
        let Some(material) = keys.get(key_id) else {
            return false;
        };
        Self::verify(signature_hex, digest_bytes, material.verifying_key().as_bytes())
    }

    pub fn get_public_key(&self, key_id: &KeyId) -> CryptoResult<[u8; 32]> {
        let keys = self.keys.read().expect("keystore lock poisoned");
        keys.get(key_id)
            .map(|m| *m.verifying_key().as_bytes())
            .ok_or_else(|| CryptoError::KeyNotFound(key_id.to_string()))
    }

    pub fn export_public_key_hex(&self, key_id: &KeyId) -> CryptoResult<String> {
        self.get_public_key(key_id).map(hex::encode)
    }
}
