use serde::{Deserialize, Serialize};

/// A contiguous span of text cut from one page of a source document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DocumentChunk {
    /// The chunk text
    pub content: String,

    /// Where the chunk came from
    pub metadata: ChunkMetadata,
}

impl DocumentChunk {
    #[must_use]
    pub const fn new(content: String, metadata: ChunkMetadata) -> Self {
        Self { content, metadata }
    }

    /// Length in characters (Unicode scalar values)
    #[must_use]
    pub fn char_len(&self) -> usize {
        self.content.chars().count()
    }

    /// Stable identifier: `<source>#p<page>:<start_index>`
    #[must_use]
    pub fn id(&self) -> String {
        format!(
            "{}#p{}:{}",
            self.metadata.source, self.metadata.page, self.metadata.start_index
        )
    }
}

/// Positional metadata of a chunk
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ChunkMetadata {
    /// Source document, relative to the document root
    pub source: String,

    /// Page number (1-indexed) the chunk was cut from
    pub page: u32,

    /// Character offset of the chunk inside the page text
    pub start_index: usize,
}

impl ChunkMetadata {
    #[must_use]
    pub fn new(source: impl Into<String>, page: u32, start_index: usize) -> Self {
        Self {
            source: source.into(),
            page,
            start_index,
        }
    }
}
