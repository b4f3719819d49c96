use thiserror::Error;

#[derive(Debug, Error)]
pub enum MirrorError {
    #[error("failed to canonicalize mirror entry: {0}")]
    Canon(#[from] sovkernel_canon::CanonError),

    #[error("no mirror entry with id {0}")]
    NotFound(String),
}

pub type MirrorResult<T> = Result<T, MirrorError>;
