pub mod chain;
pub mod error;
pub mod receipt;

pub use chain::{ChainProof, ReceiptChain, ReceiptChainLink};
pub use error::{ReceiptError, ReceiptResult};
pub use receipt::{issue, verify, IssueReceiptParams, Receipt, ReceiptVerification};
