use thiserror::Error;

/// Stable external error strings — tests depend on these exact forms.
#[derive(Debug, Error)]
pub enum KernelError {
    #[error("PROPOSAL_NOT_FOUND")]
    ProposalNotFound,

    #[error("PROPOSAL_COMMITTED")]
    ProposalCommitted,

    #[error("PROPOSAL_REJECTED")]
    ProposalRejected,

    #[error("INVALID_MANDATE: {0}")]
    InvalidMandate(String),

    #[error("REVOKED_MANDATE: {0}")]
    RevokedMandate(String),

    #[error("SCOPE_VIOLATION: {0}")]
    ScopeViolation(String),

    #[error("tool executor failed: {0}")]
    ExecutionFailed(String),

    #[error(transparent)]
    Mandate(#[from] sovkernel_mandate::MandateError),

    #[error(transparent)]
    Receipt(#[from] sovkernel_receipt::ReceiptError),

    #[error(transparent)]
    Mirror(#[from] sovkernel_mirror::MirrorError),

    #[error(transparent)]
    EventLog(#[from] sovkernel_eventlog::EventLogError),

    #[error(transparent)]
    Crypto(#[from] sovkernel_crypto::CryptoError),

    #[error(transparent)]
    Canon(#[from] sovkernel_canon::CanonError),
}

pub type KernelResult<T> = Result<T, KernelError>;
