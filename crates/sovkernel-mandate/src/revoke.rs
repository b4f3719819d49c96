//! Revocation is an event-log fact, never a mutation of the mandate
//! itself — a signed mandate has no field that can record revocation.

use sovkernel_eventlog::{event_type, EventLog, PartialEvent};
use sovkernel_types::{ActorId, MandateId};

use crate::error::MandateResult;
use sovkernel_crypto::Keystore;

/// Appends a `MANDATE_REVOKE` event signed by `revoked_by`. Idempotent in
/// effect but not in representation: calling this twice for the same
/// mandate appends two events; [`sovkernel_eventlog::EventLog::is_mandate_revoked`]
/// only cares whether at least one exists.
pub fn revoke(
    mandate_id: &MandateId,
    reason: &str,
    revoked_by: &ActorId,
    keystore: &Keystore,
    event_log: &EventLog,
) -> MandateResult<()> {
    event_log.append(
        PartialEvent::new(
            event_type::MANDATE_REVOKE,
            serde_json::json!({
                "mandate_id": mandate_id.to_string(),
                "reason": reason,
                "revoked_by": revoked_by.to_string(),
            }),
            revoked_by.clone(),
        ),
        keystore,
    )?;
    Ok(())
}
