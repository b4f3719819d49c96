//! Canonical domain types for the sovereignty kernel.
//!
//! This crate has no dependency on any other sovkernel crate: it defines the
//! identifiers, scope language, and validity windows that the canonicalizer,
//! keystore, event log, mandate, receipt, mirror, and kernel crates all
//! build on.

pub mod identity;
pub mod ids;
pub mod pattern;
pub mod scope;

pub use identity::{ActorId, IdentityError, KeyId, Role};
pub use ids::{EventId, MandateId, ReceiptId};
pub use scope::{Scope, Validity};
