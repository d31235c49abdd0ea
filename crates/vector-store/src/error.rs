use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, VectorStoreError>;

#[derive(Error, Debug)]
pub enum VectorStoreError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid vector dimension: expected {expected}, got {actual}")]
    InvalidDimension { expected: usize, actual: usize },

    #[error("Got {vectors} vectors for {chunks} chunks")]
    LengthMismatch { chunks: usize, vectors: usize },

    #[error("Chunk {0} is already indexed")]
    DuplicateChunk(String),
}

/// Why a persisted snapshot could not be loaded
#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("cannot read snapshot {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("snapshot {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("snapshot {path} is incompatible: {reason}")]
    Incompatible { path: PathBuf, reason: String },
}

impl SnapshotError {
    /// Short classification for logs
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Io { .. } => "io",
            Self::Corrupt { .. } => "corrupt",
            Self::Incompatible { .. } => "incompatible",
        }
    }
}
