use crate::error::{KnowledgeBaseError, Result};
use std::path::PathBuf;
use std::time::Duration;
use tp_chunker::ChunkerConfig;

pub const DEFAULT_DOCUMENTS_DIR: &str = "data/documents";
pub const DEFAULT_SNAPSHOT_PATH: &str = "vector_db/index.json";
pub const DEFAULT_TOP_K: usize = 5;
pub const DEFAULT_SOURCE_PREVIEW_CHARS: usize = 200;
pub const DEFAULT_PROVIDER_TIMEOUT: Duration = Duration::from_secs(60);

/// Knowledge base settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnowledgeBaseConfig {
    /// Directory scanned recursively for PDF documents
    pub documents_dir: PathBuf,

    /// Location of the persisted vector index
    pub snapshot_path: PathBuf,

    /// Chunk size and overlap used when building
    pub chunker: ChunkerConfig,

    /// Chunks retrieved per question
    pub top_k: usize,

    /// Characters of chunk content returned per source
    pub source_preview_chars: usize,

    /// Deadline for every embedding and chat call
    pub provider_timeout: Duration,
}

impl Default for KnowledgeBaseConfig {
    fn default() -> Self {
        Self {
            documents_dir: PathBuf::from(DEFAULT_DOCUMENTS_DIR),
            snapshot_path: PathBuf::from(DEFAULT_SNAPSHOT_PATH),
            chunker: ChunkerConfig::default(),
            top_k: DEFAULT_TOP_K,
            source_preview_chars: DEFAULT_SOURCE_PREVIEW_CHARS,
            provider_timeout: DEFAULT_PROVIDER_TIMEOUT,
        }
    }
}

impl KnowledgeBaseConfig {
    pub fn new(documents_dir: impl Into<PathBuf>, snapshot_path: impl Into<PathBuf>) -> Self {
        Self {
            documents_dir: documents_dir.into(),
            snapshot_path: snapshot_path.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_chunker(mut self, chunker: ChunkerConfig) -> Self {
        self.chunker = chunker;
        self
    }

    #[must_use]
    pub const fn with_provider_timeout(mut self, timeout: Duration) -> Self {
        self.provider_timeout = timeout;
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.chunker
            .validate()
            .map_err(|e| KnowledgeBaseError::configuration(e.to_string()))?;
        if self.top_k == 0 {
            return Err(KnowledgeBaseError::configuration("top_k must be positive"));
        }
        if self.provider_timeout.is_zero() {
            return Err(KnowledgeBaseError::configuration(
                "provider timeout must be positive",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = KnowledgeBaseConfig::default();
        assert_eq!(config.top_k, 5);
        assert_eq!(config.source_preview_chars, 200);
        assert_eq!(config.chunker, ChunkerConfig::new(1000, 100));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_overlap_not_below_size() {
        let config = KnowledgeBaseConfig::default().with_chunker(ChunkerConfig::new(100, 100));
        assert!(matches!(
            config.validate(),
            Err(KnowledgeBaseError::Configuration(_))
        ));
    }
}
