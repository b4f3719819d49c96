use thiserror::Error;

#[derive(Debug, Error)]
pub enum MandateError {
    #[error("failed to canonicalize mandate: {0}")]
    Canon(#[from] sovkernel_canon::CanonError),

    #[error(transparent)]
    Signing(#[from] sovkernel_crypto::CryptoError),

    #[error(transparent)]
    EventLog(#[from] sovkernel_eventlog::EventLogError),
}

pub type MandateResult<T> = Result<T, MandateError>;
