//! A signed record of one executed action, usable as independent evidence
//! even outside this kernel.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sovkernel_crypto::Keystore;
use sovkernel_types::{ActorId, KeyId, MandateId, ReceiptId};

use crate::error::ReceiptResult;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Receipt {
    pub receipt_id: ReceiptId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mandate_id: Option<MandateId>,
    pub actor: ActorId,
    pub action: String,
    pub request_hash: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_metadata: Option<Value>,
    pub timestamp: DateTime<Utc>,
    pub mirror_ref: String,
    pub signature: String,
}

/// Inputs to [`issue`]; `signature` is always derived, never supplied.
#[derive(Debug, Clone)]
pub struct IssueReceiptParams {
    pub mandate_id: Option<MandateId>,
    pub actor: ActorId,
    pub action: String,
    pub request_hash: String,
    pub response_hash: Option<String>,
    pub provider_metadata: Option<Value>,
    pub mirror_ref: String,
}

#[derive(Serialize)]
struct SignableReceipt<'a> {
    receipt_id: &'a ReceiptId,
    mandate_id: &'a Option<MandateId>,
    actor: &'a ActorId,
    action: &'a str,
    request_hash: &'a str,
    response_hash: &'a Option<String>,
    provider_metadata: &'a Option<Value>,
    timestamp: &'a DateTime<Utc>,
    mirror_ref: &'a str,
}

impl Receipt {
    fn signable(&self) -> SignableReceipt<'_> {
        SignableReceipt {
            receipt_id: &self.receipt_id,
            mandate_id: &self.mandate_id,
            actor: &self.actor,
            action: &self.action,
            request_hash: &self.request_hash,
            response_hash: &self.response_hash,
            provider_metadata: &self.provider_metadata,
            timestamp: &self.timestamp,
            mirror_ref: &self.mirror_ref,
        }
    }
}

/// Constructs the receipt, canonicalizes with `signature` stripped, signs,
/// and returns it. No side effects — callers append whatever events or
/// chain links they need separately.
pub fn issue(params: IssueReceiptParams, keystore: &Keystore, signer_key_id: &KeyId) -> ReceiptResult<Receipt> {
    let receipt = Receipt {
        receipt_id: ReceiptId::new(),
        mandate_id: params.mandate_id,
        actor: params.actor,
        action: params.action,
        request_hash: params.request_hash,
        response_hash: params.response_hash,
        provider_metadata: params.provider_metadata,
        timestamp: Utc::now(),
        mirror_ref: params.mirror_ref,
        signature: String::new(),
    };
    let bytes = sovkernel_canon::canonicalize(&receipt.signable())?;
    let signature = keystore.sign(&bytes, signer_key_id)?;
    Ok(Receipt { signature, ..receipt })
}

/// Outcome of [`verify`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReceiptVerification {
    pub valid: bool,
    pub errors: Vec<String>,
}

/// Canonical recomputation plus signature check under `receipt.actor`'s
/// public key.
pub fn verify(receipt: &Receipt, keystore: &Keystore) -> ReceiptVerification {
    let mut errors = Vec::new();

    match sovkernel_canon::canonicalize(&receipt.signable()) {
        Ok(bytes) => match keystore.get_public_key(&receipt.actor.key_id()) {
            Ok(public_key) => {
                if !Keystore::verify(&receipt.signature, &bytes, &public_key) {
                    errors.push("invalid signature".to_string());
                }
            }
            Err(_) => errors.push("missing key".to_string()),
        },
        Err(e) => errors.push(format!("decode error: {e}")),
    }

    ReceiptVerification {
        valid: errors.is_empty(),
        errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sovkernel_types::ActorId;

    fn adapter() -> ActorId {
        ActorId::adapter("main").unwrap()
    }

    fn sample_params() -> IssueReceiptParams {
        IssueReceiptParams {
            mandate_id: Some(MandateId::new()),
            actor: adapter(),
            action: "invoke:model".to_string(),
            request_hash: "abc123".to_string(),
            response_hash: Some("def456".to_string()),
            provider_metadata: None,
            mirror_ref: "mirror_xyz".to_string(),
        }
    }

    #[test]
    fn issue_then_verify_round_trips_valid() {
        let ks = Keystore::new();
        let key_id = ks.ensure_key(&adapter());
        let receipt = issue(sample_params(), &ks, &key_id).unwrap();
        let result = verify(&receipt, &ks);
        assert!(result.valid, "{:?}", result.errors);
    }

    #[test]
    fn tampered_receipt_fails_verification() {
        let ks = Keystore::new();
        let key_id = ks.ensure_key(&adapter());
        let mut receipt = issue(sample_params(), &ks, &key_id).unwrap();
        receipt.response_hash = Some("tampered".to_string());
        let result = verify(&receipt, &ks);
        assert!(!result.valid);
    }

    #[test]
    fn verify_reports_missing_key() {
        let signer_ks = Keystore::new();
        let key_id = signer_ks.ensure_key(&adapter());
        let receipt = issue(sample_params(), &signer_ks, &key_id).unwrap();

        let empty_ks = Keystore::new();
        let result = verify(&receipt, &empty_ks);
        assert!(!result.valid);
        assert_eq!(result.errors, vec!["missing key".to_string()]);
    }
}
