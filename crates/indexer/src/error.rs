use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, IndexerError>;

#[derive(Error, Debug)]
pub enum IndexerError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to read PDF {path}: {message}")]
    PdfError { path: PathBuf, message: String },

    #[error("Chunker error: {0}")]
    ChunkerError(#[from] tp_chunker::ChunkerError),

    #[error("Invalid document path: {0}")]
    InvalidPath(String),

    #[error("{0}")]
    Other(String),
}

impl IndexerError {
    pub(crate) fn pdf(path: impl Into<PathBuf>, err: impl std::fmt::Display) -> Self {
        Self::PdfError {
            path: path.into(),
            message: err.to_string(),
        }
    }
}
