//! The event wire type and its detached-signature envelope.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sovkernel_types::{ActorId, EventId};

/// A fully formed, appended log entry. Construct these only through
/// [`crate::EventLog::append`] — the id, timestamp, `prev_hash`, and
/// signature must all be derived together.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    #[serde(rename = "type")]
    pub event_type: String,
    pub timestamp: DateTime<Utc>,
    pub payload: Value,
    pub signer: ActorId,
    pub signature: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev_hash: Option<String>,
}

/// The fields a caller supplies to append a new event; the log fills in
/// everything else.
#[derive(Debug, Clone)]
pub struct PartialEvent {
    pub event_type: String,
    pub payload: Value,
    pub signer: ActorId,
}

impl PartialEvent {
    pub fn new(event_type: impl Into<String>, payload: Value, signer: ActorId) -> Self {
        Self {
            event_type: event_type.into(),
            payload,
            signer,
        }
    }
}

/// The canonical view of an event used for both signing and signature
/// verification: every field except `signature`, with `id` and `prev_hash`
/// present.
#[derive(Serialize)]
pub(crate) struct SignableEvent<'a> {
    pub id: &'a EventId,
    #[serde(rename = "type")]
    pub event_type: &'a str,
    pub timestamp: &'a DateTime<Utc>,
    pub payload: &'a Value,
    pub signer: &'a ActorId,
    pub prev_hash: &'a Option<String>,
}

impl Event {
    pub(crate) fn signable(&self) -> SignableEvent<'_> {
        SignableEvent {
            id: &self.id,
            event_type: &self.event_type,
            timestamp: &self.timestamp,
            payload: &self.payload,
            signer: &self.signer,
            prev_hash: &self.prev_hash,
        }
    }
}

/// Well-known event type tags. The log accepts arbitrary strings — this
/// enum exists for callers who want typo-resistant construction, not as an
/// enforced closed set.
pub mod event_type {
    pub const MANDATE_CREATE: &str = "MANDATE_CREATE";
    pub const MANDATE_REVOKE: &str = "MANDATE_REVOKE";
    pub const SUGGESTION: &str = "SUGGESTION";
    pub const COMMITTED: &str = "COMMITTED";
    pub const RECEIPT_ISSUED: &str = "RECEIPT_ISSUED";
    pub const PROPOSAL_REJECTED: &str = "PROPOSAL_REJECTED";
    pub const VERIFICATION_FAILED: &str = "VERIFICATION_FAILED";
    pub const EXECUTION_FAILED: &str = "EXECUTION_FAILED";
}
