//! Transient propose/commit state, owned by the kernel instance and never
//! persisted — it lives until the process terminates unless a caller
//! exports it separately.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sovkernel_types::EventId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProposalStatus {
    Pending,
    Committed,
    Rejected,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Proposal {
    pub id: String,
    pub action: String,
    #[serde(skip)]
    pub args: Value,
    pub mirror_ref: String,
    pub event_id: EventId,
    pub status: ProposalStatus,
    pub created_at: DateTime<Utc>,
}
