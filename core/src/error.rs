use crate::DocId;

/// Errors raised while assembling a corpus, validating configuration or
/// loading it from disk. The retrieval operations themselves never fail.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("document id {0} appears more than once")]
    DuplicateDocument(DocId),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Error::InvalidConfig(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
