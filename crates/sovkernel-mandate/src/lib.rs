pub mod error;
pub mod mandate;
pub mod revocation;
pub mod revoke;
pub mod verify;

pub use error::{MandateError, MandateResult};
pub use mandate::{canonicalize, create, sign, sign_and_record, CreateMandateParams, Mandate};
pub use revocation::{RevocationChain, RevocationLink};
pub use revoke::revoke;
pub use verify::{verify, MandateVerification};
