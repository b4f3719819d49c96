//! The legacy/schema-level revocation hash chain.
//!
//! Retained for schema compatibility; authoritative revocation in the
//! running kernel is via the event log's `MANDATE_REVOKE` events
//! ([`crate::revoke::revoke`]). This structure does not gate any kernel
//! decision — keep it addressable but never let its state determine
//! authorization.
//!
//! Reconstructing a chain from a persisted `{head, previous_hash, depth}`
//! triple cannot recover intermediate links: there is no way to walk
//! backward from only the head and a depth count without every
//! intermediate hash already in hand. Round-tripping a deeply revoked
//! chain through a reduced persisted form is therefore lossy by
//! construction; this module does not attempt to fix that, only to
//! document it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RevocationLink {
    pub hash: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Serialize)]
struct SignableLink<'a> {
    previous_hash: &'a str,
    timestamp: &'a DateTime<Utc>,
    action: &'static str,
}

/// An ordered, append-only sequence of revocation links. The current head
/// is the live authority in this schema-level structure, but nothing in
/// `sovkernel-kernel` reads it.
#[derive(Debug, Clone, Default)]
pub struct RevocationChain {
    links: Vec<RevocationLink>,
}

impl RevocationChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn head(&self) -> Option<&RevocationLink> {
        self.links.last()
    }

    /// Appends a link whose hash is `H(canon({previous_hash, timestamp,
    /// action: "revoke"}))`. The first link uses the empty string as
    /// `previous_hash`.
    pub fn revoke(&mut self, timestamp: DateTime<Utc>) -> sovkernel_canon::CanonResult<RevocationLink> {
        let previous_hash = self.head().map(|l| l.hash.as_str()).unwrap_or("");
        let signable = SignableLink {
            previous_hash,
            timestamp: &timestamp,
            action: "revoke",
        };
        let hash = sovkernel_canon::hash(&signable)?;
        let link = RevocationLink { hash, timestamp };
        self.links.push(link.clone());
        Ok(link)
    }

    /// Recomputes every link from its stored predecessor and compares.
    pub fn verify_chain(&self) -> bool {
        let mut previous_hash = String::new();
        for link in &self.links {
            let signable = SignableLink {
                previous_hash: &previous_hash,
                timestamp: &link.timestamp,
                action: "revoke",
            };
            let expected = match sovkernel_canon::hash(&signable) {
                Ok(h) => h,
                Err(_) => return false,
            };
            if expected != link.hash {
                return false;
            }
            previous_hash = link.hash.clone();
        }
        true
    }

    pub fn is_valid(&self, hash: &str) -> bool {
        self.head().map(|l| l.hash == hash).unwrap_or(false)
    }

    pub fn was_revoked(&self, hash: &str) -> bool {
        self.links.iter().any(|l| l.hash == hash) && !self.is_valid(hash)
    }
}
