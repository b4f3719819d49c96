//! The mandate itself: a signed, scoped, time-bounded delegation of
//! authority from an issuer to a delegate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sovkernel_crypto::Keystore;
use sovkernel_eventlog::{event_type, EventLog, PartialEvent};
use sovkernel_types::{ActorId, KeyId, MandateId, Scope, Validity};

use crate::error::MandateResult;

/// A mandate is immutable once [`sign`] has filled in its `signature`.
/// Nothing in this crate offers a way to mutate a signed mandate in place —
/// revocation is an event-log fact, not a field flip.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mandate {
    pub mandate_id: MandateId,
    pub issuer: ActorId,
    pub delegate: ActorId,
    pub scope: Scope,
    pub validity: Validity,
    pub constraints: Map<String, Value>,
    pub created_at: DateTime<Utc>,
    pub signature: String,
}

/// Inputs to [`create`]. `constraints` defaults to an empty map when absent.
#[derive(Debug, Clone)]
pub struct CreateMandateParams {
    pub issuer: ActorId,
    pub delegate: ActorId,
    pub scope: Scope,
    pub validity: Validity,
    pub constraints: Map<String, Value>,
}

/// The canonical view of a mandate used for both signing and verification:
/// every field except `signature`.
#[derive(Serialize)]
struct SignableMandate<'a> {
    mandate_id: &'a MandateId,
    issuer: &'a ActorId,
    delegate: &'a ActorId,
    scope: &'a Scope,
    validity: &'a Validity,
    constraints: &'a Map<String, Value>,
    created_at: &'a DateTime<Utc>,
}

impl Mandate {
    fn signable(&self) -> SignableMandate<'_> {
        SignableMandate {
            mandate_id: &self.mandate_id,
            issuer: &self.issuer,
            delegate: &self.delegate,
            scope: &self.scope,
            validity: &self.validity,
            constraints: &self.constraints,
            created_at: &self.created_at,
        }
    }

    pub fn is_action_allowed(&self, action: &str) -> bool {
        self.scope.allows_action(action)
    }

    pub fn is_resource_allowed(&self, resource: &str) -> bool {
        self.scope.allows_resource(resource)
    }

    pub fn is_within_budget(&self, value: i64) -> bool {
        self.scope.within_budget(value)
    }
}

/// Builds an unsigned mandate: `signature` is the empty string and
/// `mandate_id` is freshly minted.
pub fn create(params: CreateMandateParams) -> Mandate {
    Mandate {
        mandate_id: MandateId::new(),
        issuer: params.issuer,
        delegate: params.delegate,
        scope: params.scope,
        validity: params.validity,
        constraints: params.constraints,
        created_at: Utc::now(),
        signature: String::new(),
    }
}

/// Canonical bytes of `mandate` with `signature` removed (not emptied).
/// This is exactly the byte-string that was signed, and the byte-string
/// re-derived to check it.
pub fn canonicalize(mandate: &Mandate) -> MandateResult<Vec<u8>> {
    Ok(sovkernel_canon::canonicalize(&mandate.signable())?)
}

/// Signs an unsigned mandate under `signer_key_id`, returning the signed
/// copy. Does not mutate `unsigned`.
pub fn sign(unsigned: &Mandate, keystore: &Keystore, signer_key_id: &KeyId) -> MandateResult<Mandate> {
    let bytes = canonicalize(unsigned)?;
    let signature = keystore.sign(&bytes, signer_key_id)?;
    Ok(Mandate {
        signature,
        ..unsigned.clone()
    })
}

/// Same as [`sign`], but also appends a `MANDATE_CREATE` event to
/// `event_log`, signed by the mandate's issuer, recording the mandate's
/// existence independent of any later reference to it.
pub fn sign_and_record(
    unsigned: &Mandate,
    keystore: &Keystore,
    signer_key_id: &KeyId,
    event_log: &EventLog,
) -> MandateResult<Mandate> {
    let signed = sign(unsigned, keystore, signer_key_id)?;
    event_log.append(
        PartialEvent::new(
            event_type::MANDATE_CREATE,
            serde_json::json!({
                "mandate_id": signed.mandate_id.to_string(),
                "issuer": signed.issuer.to_string(),
                "delegate": signed.delegate.to_string(),
            }),
            signed.issuer.clone(),
        ),
        keystore,
    )?;
    Ok(signed)
}
