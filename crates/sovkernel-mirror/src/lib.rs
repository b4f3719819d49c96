//! Captures request/response pairs for audit, producing entries receipts
//! can reference by `mirror_ref`.

pub mod error;

pub use error::{MirrorError, MirrorResult};

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MirrorEntry {
    pub id: String,
    pub agent_id: String,
    pub prompt: String,
    pub request_hash: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_metadata: Option<Value>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Serialize)]
struct RequestTriple<'a> {
    agent_id: &'a str,
    prompt: &'a str,
    provider_metadata: &'a Option<Value>,
}

#[derive(Serialize)]
struct ResponseObject<'a> {
    data: &'a Value,
    provider_metadata: &'a Option<Value>,
}

/// In-memory store of mirror entries, keyed by id.
#[derive(Default)]
pub struct Mirror {
    entries: RwLock<HashMap<String, MirrorEntry>>,
}

impl Mirror {
    pub fn new() -> Self {
        Self::default()
    }

    /// Captures a request, hashing `{agent_id, prompt, provider_metadata}`
    /// into `request_hash`. Returns the new entry's id.
    pub fn capture(
        &self,
        agent_id: impl Into<String>,
        prompt: impl Into<String>,
        provider_metadata: Option<Value>,
    ) -> MirrorResult<String> {
        let agent_id = agent_id.into();
        let prompt = prompt.into();
        let request_hash = sovkernel_canon::hash(&RequestTriple {
            agent_id: &agent_id,
            prompt: &prompt,
            provider_metadata: &provider_metadata,
        })?;

        let id = format!("mirror_{}", Uuid::new_v4());
        let entry = MirrorEntry {
            id: id.clone(),
            agent_id,
            prompt,
            request_hash,
            response: None,
            response_hash: None,
            provider_metadata,
            timestamp: Utc::now(),
        };
        self.entries.write().expect("mirror lock poisoned").insert(id.clone(), entry);
        Ok(id)
    }

    /// Finalizes a captured entry with its response: sets `response`,
    /// computes `response_hash` over the full response object (data plus
    /// metadata, not just the data payload), and merges `provider_metadata`
    /// (new keys win on conflict).
    pub fn finalize_response(
        &self,
        id: &str,
        response: Value,
        provider_metadata: Option<Value>,
    ) -> MirrorResult<()> {
        let mut entries = self.entries.write().expect("mirror lock poisoned");
        let entry = entries.get_mut(id).ok_or_else(|| MirrorError::NotFound(id.to_string()))?;

        if let Some(incoming) = &provider_metadata {
            entry.provider_metadata = Some(merge_metadata(entry.provider_metadata.take(), incoming.clone()));
        }

        let response_hash = sovkernel_canon::hash(&ResponseObject {
            data: &response,
            provider_metadata: &entry.provider_metadata,
        })?;

        entry.response = Some(response);
        entry.response_hash = Some(response_hash);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<MirrorEntry> {
        self.entries.read().expect("mirror lock poisoned").get(id).cloned()
    }
}

fn merge_metadata(existing: Option<Value>, incoming: Value) -> Value {
    match existing {
        Some(Value::Object(mut base)) => {
            if let Value::Object(incoming) = incoming {
                base.extend(incoming);
                Value::Object(base)
            } else {
                incoming
            }
        }
        _ => incoming,
    }
}
