use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("index {index} out of range (length {len})")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("dimension mismatch: {0}")]
    DimensionMismatch(&'static str),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("duplicate uri: {0}")]
    DuplicateUri(String),
    #[error("signal {signal} is in recording {recording}")]
    SignalOwnedElsewhere { signal: String, recording: String },
    #[error("store closed")]
    StoreClosed,
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
