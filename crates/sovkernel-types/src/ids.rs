//! Time-sortable identifiers.
//!
//! Mandate and receipt ids are UUID v7: the leading bits encode a
//! millisecond timestamp, so lexicographic and creation order agree. This
//! matters for the receipt chain and event log, where "most recent" is a
//! meaningful query.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Generates a newtype wrapper around a UUID v7 with a string prefix for
/// human-readable display, mirroring the id-per-concept convention used
/// throughout this workspace's ancestor codebase.
macro_rules! define_time_sortable_id {
    ($name:ident, $prefix:literal, $doc:literal) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(pub Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}_{}", $prefix, self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }
    };
}

define_time_sortable_id!(MandateId, "mandate", "Unique, time-sortable identifier for a mandate.");
define_time_sortable_id!(ReceiptId, "receipt", "Unique, time-sortable identifier for a receipt.");
define_time_sortable_id!(EventId, "event", "Unique, time-sortable identifier for an event log entry.");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_time_sortable() {
        let a = MandateId::new();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let b = MandateId::new();
        assert!(a.as_uuid().as_bytes() < b.as_uuid().as_bytes());
    }

    #[test]
    fn display_has_prefix() {
        let id = ReceiptId::new();
        assert!(id.to_string().starts_with("receipt_"));
    }
}
