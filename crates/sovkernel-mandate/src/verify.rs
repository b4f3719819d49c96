//! Mandate and revocation verification.

use chrono::Utc;
use sovkernel_crypto::Keystore;
use sovkernel_eventlog::EventLog;

use crate::mandate::{canonicalize, Mandate};

/// Outcome of [`verify`]. A mandate is valid iff `errors` is empty — the
/// checks below accumulate rather than short-circuit, so a caller can see
/// every reason a mandate failed, not just the first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MandateVerification {
    pub valid: bool,
    pub errors: Vec<String>,
}

/// Checks, in order, accumulating errors: validity window, revocation (if
/// an event log is supplied), then signature. The boolean outcome does not
/// depend on check order, only on whether any check failed.
pub fn verify(mandate: &Mandate, keystore: &Keystore, event_log: Option<&EventLog>) -> MandateVerification {
    let mut errors = Vec::new();
    let now = Utc::now();

    if mandate.validity.is_not_yet_valid(now) {
        errors.push("not yet valid".to_string());
    }
    if mandate.validity.is_expired(now) {
        errors.push("expired".to_string());
    }

    if let Some(log) = event_log {
        if log.is_mandate_revoked(&mandate.mandate_id.to_string()) {
            errors.push("revoked".to_string());
        }
    }

    match canonicalize(mandate) {
        Ok(bytes) => match keystore.get_public_key(&mandate.issuer.key_id()) {
            Ok(public_key) => {
                if !Keystore::verify(&mandate.signature, &bytes, &public_key) {
                    errors.push("invalid signature".to_string());
                }
            }
            Err(_) => errors.push("issuer public key unknown".to_string()),
        },
        Err(e) => errors.push(format!("canonicalization failed: {e}")),
    }

    MandateVerification {
        valid: errors.is_empty(),
        errors,
    }
}
