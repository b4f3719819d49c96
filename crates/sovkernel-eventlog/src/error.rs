use thiserror::Error;

#[derive(Debug, Error)]
pub enum EventLogError {
    #[error("failed to canonicalize event: {0}")]
    Canon(#[from] sovkernel_canon::CanonError),

    #[error(transparent)]
    Signing(#[from] sovkernel_crypto::CryptoError),
}

pub type EventLogResult<T> = Result<T, EventLogError>;
