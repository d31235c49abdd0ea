use serde::{Deserialize, Serialize};
use tp_chunker::DocumentChunk;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredChunk {
    pub id: String,
    pub chunk: DocumentChunk,
    pub vector: Vec<f32>,
}

#[derive(Debug, Clone)]
pub struct SearchResult {
    pub chunk: DocumentChunk,
    pub score: f32,
    pub id: String,
}
