use crate::error::{Result, VectorStoreError};
use crate::types::{SearchResult, StoredChunk};
use std::collections::{BTreeSet, HashSet};
use tp_chunker::DocumentChunk;

/// Exact nearest-neighbour index over chunk embeddings.
///
/// Entries keep insertion order; search is a brute-force cosine scan.
#[derive(Debug, Clone)]
pub struct VectorIndex {
    model_id: String,
    dimension: usize,
    entries: Vec<StoredChunk>,
    ids: HashSet<String>,
}

impl VectorIndex {
    pub fn new(model_id: impl Into<String>, dimension: usize) -> Self {
        Self {
            model_id: model_id.into(),
            dimension,
            entries: Vec::new(),
            ids: HashSet::new(),
        }
    }

    /// Build an index from chunks and their vectors (same order, same length)
    pub fn from_embeddings(
        model_id: impl Into<String>,
        chunks: Vec<DocumentChunk>,
        vectors: Vec<Vec<f32>>,
    ) -> Result<Self> {
        if chunks.len() != vectors.len() {
            return Err(VectorStoreError::LengthMismatch {
                chunks: chunks.len(),
                vectors: vectors.len(),
            });
        }

        let dimension = vectors.first().map_or(0, Vec::len);
        let mut index = Self::new(model_id, dimension);
        for (chunk, vector) in chunks.into_iter().zip(vectors) {
            index.add(chunk, vector)?;
        }

        log::info!(
            "Built vector index: {} chunks, dimension {}",
            index.len(),
            index.dimension
        );
        Ok(index)
    }

    /// Add one chunk
    pub fn add(&mut self, chunk: DocumentChunk, vector: Vec<f32>) -> Result<()> {
        let id = chunk.id();
        self.insert(StoredChunk { id, chunk, vector })
    }

    pub(crate) fn insert(&mut self, stored: StoredChunk) -> Result<()> {
        if stored.vector.len() != self.dimension {
            return Err(VectorStoreError::InvalidDimension {
                expected: self.dimension,
                actual: stored.vector.len(),
            });
        }
        if !self.ids.insert(stored.id.clone()) {
            return Err(VectorStoreError::DuplicateChunk(stored.id));
        }
        self.entries.push(stored);
        Ok(())
    }

    /// Top `k` chunks by cosine similarity, best first.
    /// Ties keep insertion order.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<SearchResult>> {
        if query.len() != self.dimension {
            return Err(VectorStoreError::InvalidDimension {
                expected: self.dimension,
                actual: query.len(),
            });
        }

        let mut scores: Vec<(usize, f32)> = self
            .entries
            .iter()
            .enumerate()
            .map(|(pos, stored)| (pos, cosine_similarity(query, &stored.vector)))
            .collect();

        scores.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        scores.truncate(k);

        let results: Vec<SearchResult> = scores
            .into_iter()
            .map(|(pos, score)| {
                let stored = &self.entries[pos];
                SearchResult {
                    chunk: stored.chunk.clone(),
                    score,
                    id: stored.id.clone(),
                }
            })
            .collect();

        log::debug!("Found {} results (k={k})", results.len());
        Ok(results)
    }

    #[must_use]
    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    #[must_use]
    pub const fn dimension(&self) -> usize {
        self.dimension
    }

    /// Get number of chunks in index
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if index is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get all chunk IDs in insertion order
    #[must_use]
    pub fn chunk_ids(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.id.clone()).collect()
    }

    /// Distinct source documents referenced by the index
    #[must_use]
    pub fn sources(&self) -> BTreeSet<String> {
        self.entries
            .iter()
            .map(|e| e.chunk.metadata.source.clone())
            .collect()
    }

    pub(crate) fn entries(&self) -> &[StoredChunk] {
        &self.entries
    }
}

#[must_use]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}
