use thiserror::Error;

#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("MissingPrivateKey")]
    MissingPrivateKey,

    #[error("key not found: {0}")]
    KeyNotFound(String),

    #[error("invalid key format: {0}")]
    InvalidKeyFormat(String),

    #[error("signing failed: {0}")]
    SigningFailed(String),
}

pub type CryptoResult<T> = Result<T, CryptoError>;
