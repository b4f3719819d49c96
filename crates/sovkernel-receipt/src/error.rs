use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReceiptError {
    #[error("failed to canonicalize receipt: {0}")]
    Canon(#[from] sovkernel_canon::CanonError),

    #[error(transparent)]
    Signing(#[from] sovkernel_crypto::CryptoError),
}

pub type ReceiptResult<T> = Result<T, ReceiptError>;
