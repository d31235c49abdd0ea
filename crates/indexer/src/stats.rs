use serde::{Deserialize, Serialize};

/// Statistics about an ingestion run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestStats {
    /// Number of documents processed
    pub files: usize,

    /// Number of pages that produced text
    pub pages: usize,

    /// Number of chunks created
    pub chunks: usize,

    /// Total characters of extracted text
    pub characters: usize,

    /// Time taken in milliseconds
    pub time_ms: u64,
}

impl IngestStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&mut self) {
        self.files += 1;
    }

    pub fn add_page(&mut self, characters: usize, chunks: usize) {
        self.pages += 1;
        self.characters += characters;
        self.chunks += chunks;
    }
}
