//! Append-only, hash-chained, per-event signed audit log.
//!
//! Every lifecycle fact the kernel cares about — a mandate coming into
//! existence, a proposal being suggested, a commit succeeding or failing —
//! is recorded here as a signed [`Event`]. Chain integrity
//! ([`EventLog::verify_chain`]) is a pure function of the stored sequence;
//! nothing outside this crate influences the result.

pub mod error;
pub mod event;

pub use error::{EventLogError, EventLogResult};
pub use event::{event_type, Event, PartialEvent};

use std::sync::RwLock;

use chrono::{DateTime, Utc};
use sovkernel_crypto::Keystore;
use sovkernel_types::{ActorId, EventId};

/// Filters applied by [`EventLog::query`], all optional and AND-combined.
/// `limit` truncates the result after filtering, keeping the most recent
/// matches.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    pub event_type: Option<String>,
    pub signer: Option<ActorId>,
    pub since: Option<DateTime<Utc>>,
    pub limit: Option<usize>,
}

impl EventFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn of_type(mut self, event_type: impl Into<String>) -> Self {
        self.event_type = Some(event_type.into());
        self
    }

    pub fn by(mut self, signer: ActorId) -> Self {
        self.signer = Some(signer);
        self
    }

    pub fn since(mut self, since: DateTime<Utc>) -> Self {
        self.since = Some(since);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    fn matches(&self, event: &Event) -> bool {
        if let Some(t) = &self.event_type {
            if &event.event_type != t {
                return false;
            }
        }
        if let Some(s) = &self.signer {
            if &event.signer != s {
                return false;
            }
        }
        if let Some(since) = self.since {
            if event.timestamp < since {
                return false;
            }
        }
        true
    }
}

/// Result of [`EventLog::verify_chain`]. Verification never throws — every
/// problem found is accumulated into `errors` instead.
#[derive(Debug, Clone, Default)]
pub struct ChainVerification {
    pub valid: bool,
    pub errors: Vec<String>,
    pub events_verified: usize,
}

/// The append-only log itself. Cloning an `EventLog` is not supported —
/// share it behind a reference; internally it is a single `RwLock<Vec<_>>`,
/// matching the keystore's locking shape.
#[derive(Default)]
pub struct EventLog {
    events: RwLock<Vec<Event>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self {
            events: RwLock::new(Vec::new()),
        }
    }

    /// Assigns an id, stamps the current time, links to the tail, signs,
    /// and appends. Fails only on canonicalization error or a missing
    /// signing key for `partial.signer`.
    pub fn append(&self, partial: PartialEvent, keystore: &Keystore) -> EventLogResult<EventId> {
        let id = EventId::new();
        let timestamp = Utc::now();

        let prev_hash = {
            let events = self.events.read().expect("event log lock poisoned");
            match events.last() {
                Some(tail) => Some(sovkernel_canon::hash(tail)?),
                None => None,
            }
        };

        let event = Event {
            id,
            event_type: partial.event_type,
            timestamp,
            payload: partial.payload,
            signer: partial.signer,
            signature: String::new(),
            prev_hash,
        };

        let bytes = sovkernel_canon::canonicalize(&event.signable())?;
        let key_id = event.signer.key_id();
        let signature = keystore.sign(&bytes, &key_id)?;

        let event = Event { signature, ..event };

        let mut events = self.events.write().expect("event log lock poisoned");
        events.push(event);
        Ok(id)
    }

    /// Snapshot copy of events matching `filter`, in append order.
    pub fn query(&self, filter: &EventFilter) -> Vec<Event> {
        let events = self.events.read().expect("event log lock poisoned");
        let mut matched: Vec<Event> = events.iter().filter(|e| filter.matches(e)).cloned().collect();
        if let Some(limit) = filter.limit {
            let start = matched.len().saturating_sub(limit);
            matched = matched.split_off(start);
        }
        matched
    }

    pub fn get_by_id(&self, id: &EventId) -> Option<Event> {
        let events = self.events.read().expect("event log lock poisoned");
        events.iter().find(|e| &e.id == id).cloned()
    }

    pub fn get_latest(&self) -> Option<Event> {
        let events = self.events.read().expect("event log lock poisoned");
        events.last().cloned()
    }

    pub fn length(&self) -> usize {
        self.events.read().expect("event log lock poisoned").len()
    }

    pub fn export(&self) -> Vec<Event> {
        self.events.read().expect("event log lock poisoned").clone()
    }

    /// Replaces the entire sequence. Callers MUST call [`Self::verify_chain`]
    /// afterward to re-establish trust in the imported data.
    pub fn import(&self, events: Vec<Event>) {
        *self.events.write().expect("event log lock poisoned") = events;
    }

    /// True iff any `MANDATE_REVOKE` event carries `payload.mandate_id`
    /// equal to `mandate_id`.
    pub fn is_mandate_revoked(&self, mandate_id: &str) -> bool {
        let events = self.events.read().expect("event log lock poisoned");
        events.iter().any(|e| {
            e.event_type == event_type::MANDATE_REVOKE
                && e.payload.get("mandate_id").and_then(|v| v.as_str()) == Some(mandate_id)
        })
    }

    /// Recomputes the hash chain and every signature. Accumulates every
    /// discrepancy found rather than stopping at the first.
    pub fn verify_chain(&self, keystore: &Keystore) -> ChainVerification {
        let events = self.events.read().expect("event log lock poisoned");
        let mut errors = Vec::new();

        for (i, event) in events.iter().enumerate() {
            if i == 0 {
                if event.prev_hash.is_some() {
                    errors.push("event 0 must not carry a prev_hash".to_string());
                }
            } else {
                match sovkernel_canon::hash(&events[i - 1]) {
                    Ok(expected) => {
                        if event.prev_hash.as_deref() != Some(expected.as_str()) {
                            errors.push(format!("event {i} prev_hash does not match event {}", i - 1));
                        }
                    }
                    Err(e) => errors.push(format!("event {} failed to canonicalize: {e}", i - 1)),
                }
            }

            match sovkernel_canon::canonicalize(&event.signable()) {
                Ok(bytes) => match keystore.get_public_key(&event.signer.key_id()) {
                    Ok(public_key) => {
                        if !Keystore::verify(&event.signature, &bytes, &public_key) {
                            errors.push(format!("event {i} signature does not verify"));
                        }
                    }
                    Err(_) => errors.push(format!("event {i} signer key is unknown")),
                },
                Err(e) => errors.push(format!("event {i} failed to canonicalize: {e}")),
            }
        }

        ChainVerification {
            valid: errors.is_empty(),
            events_verified: events.len(),
            errors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use sovkernel_types::ActorId;

    fn agent() -> ActorId {
        ActorId::agent("bot-1").unwrap()
    }

    fn keystore_with_agent() -> (Keystore, ActorId) {
        let ks = Keystore::new();
        let actor = agent();
        ks.ensure_key(&actor);
        (ks, actor)
    }

    #[test]
    fn append_links_prev_hash_across_events() {
        let (ks, actor) = keystore_with_agent();
        let log = EventLog::new();

        log.append(PartialEvent::new("A", json!({}), actor.clone()), &ks).unwrap();
        log.append(PartialEvent::new("B", json!({}), actor), &ks).unwrap();

        let events = log.export();
        assert!(events[0].prev_hash.is_none());
        assert!(events[1].prev_hash.is_some());
        assert_eq!(events[1].prev_hash.as_deref().unwrap(), sovkernel_canon::hash(&events[0]).unwrap());
    }

    #[test]
    fn verify_chain_passes_on_untampered_log() {
        let (ks, actor) = keystore_with_agent();
        let log = EventLog::new();
        for i in 0..4 {
            log.append(PartialEvent::new("X", json!({"i": i}), actor.clone()), &ks).unwrap();
        }
        let result = log.verify_chain(&ks);
        assert!(result.valid, "{:?}", result.errors);
        assert_eq!(result.events_verified, 4);
    }

    #[test]
    fn verify_chain_detects_payload_tampering() {
        let (ks, actor) = keystore_with_agent();
        let log = EventLog::new();
        for i in 0..4 {
            log.append(PartialEvent::new("X", json!({"i": i}), actor.clone()), &ks).unwrap();
        }
        {
            let mut events = log.events.write().unwrap();
            events[2].payload = json!({"i": "tampered"});
        }
        let result = log.verify_chain(&ks);
        assert!(!result.valid);
        assert!(result.errors.iter().any(|e| e.contains('2') || e.contains('3')));
    }

    #[test]
    fn is_mandate_revoked_checks_payload_field() {
        let (ks, actor) = keystore_with_agent();
        let log = EventLog::new();
        assert!(!log.is_mandate_revoked("mandate_abc"));
        log.append(
            PartialEvent::new(event_type::MANDATE_REVOKE, json!({"mandate_id": "mandate_abc"}), actor),
            &ks,
        )
        .unwrap();
        assert!(log.is_mandate_revoked("mandate_abc"));
        assert!(!log.is_mandate_revoked("mandate_other"));
    }

    #[test]
    fn query_filters_by_type_and_applies_limit() {
        let (ks, actor) = keystore_with_agent();
        let log = EventLog::new();
        for i in 0..5 {
            log.append(PartialEvent::new("A", json!({"i": i}), actor.clone()), &ks).unwrap();
        }
        log.append(PartialEvent::new("B", json!({}), actor), &ks).unwrap();

        let all_a = log.query(&EventFilter::new().of_type("A"));
        assert_eq!(all_a.len(), 5);

        let limited = log.query(&EventFilter::new().of_type("A").limit(2));
        assert_eq!(limited.len(), 2);
        assert_eq!(limited[1].payload, json!({"i": 4}));
    }

    #[test]
    fn export_then_import_preserves_verify_result() {
        let (ks, actor) = keystore_with_agent();
        let log = EventLog::new();
        for i in 0..3 {
            log.append(PartialEvent::new("A", json!({"i": i}), actor.clone()), &ks).unwrap();
        }
        let exported = log.export();

        let restored = EventLog::new();
        restored.import(exported);
        assert_eq!(restored.length(), 3);
        assert!(restored.verify_chain(&ks).valid);
    }
}
