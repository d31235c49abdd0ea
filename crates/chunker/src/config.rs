use crate::error::{ChunkerError, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_CHUNK_SIZE: usize = 1000;
pub const DEFAULT_CHUNK_OVERLAP: usize = 100;

/// Break points in priority order. The arbitrary character boundary is the
/// implicit last resort and is not listed.
pub const DEFAULT_SEPARATORS: [&str; 4] = ["\n\n", "\n", ".", " "];

/// Configuration for text splitting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkerConfig {
    /// Maximum chunk length in characters
    pub chunk_size: usize,

    /// Characters shared by two consecutive chunks
    pub chunk_overlap: usize,

    /// Preferred break points, highest priority first
    pub separators: Vec<String>,
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self::new(DEFAULT_CHUNK_SIZE, DEFAULT_CHUNK_OVERLAP)
    }
}

impl ChunkerConfig {
    /// Config with the default separator ladder
    #[must_use]
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self {
            chunk_size,
            chunk_overlap,
            separators: DEFAULT_SEPARATORS.iter().map(|s| (*s).to_string()).collect(),
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(ChunkerError::invalid_config("chunk_size must be > 0"));
        }

        if self.chunk_overlap >= self.chunk_size {
            return Err(ChunkerError::invalid_config(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                self.chunk_overlap, self.chunk_size
            )));
        }

        if self.separators.iter().any(String::is_empty) {
            return Err(ChunkerError::invalid_config(
                "separators must not contain an empty string",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        let config = ChunkerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.chunk_size, 1000);
        assert_eq!(config.chunk_overlap, 100);
    }

    #[test]
    fn test_config_validation() {
        let mut config = ChunkerConfig::new(0, 0);
        assert!(config.validate().is_err());

        // overlap == size never makes progress
        config = ChunkerConfig::new(100, 100);
        assert!(config.validate().is_err());

        config = ChunkerConfig::new(100, 150);
        assert!(config.validate().is_err());

        config = ChunkerConfig::new(100, 99);
        assert!(config.validate().is_ok());

        config.separators.push(String::new());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_overlap_is_valid() {
        assert!(ChunkerConfig::new(1, 0).validate().is_ok());
    }
}
