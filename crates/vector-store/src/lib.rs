//! # Transfer Pricing Vector Store
//!
//! Similarity search over embedded document chunks.
//!
//! ## Features
//!
//! - **Exact top-k search** by cosine similarity
//! - **Snapshot persistence** as a single JSON document
//! - **Atomic replacement**: snapshots are written to a temp file and renamed
//! - **Load diagnostics**: I/O, corrupt and incompatible snapshots are told apart
//!
//! ## Architecture
//!
//! ```text
//! DocumentChunk[] + Vec<f32>[]
//!     │
//!     ├──> VectorIndex (in memory)
//!     │      └─> search(query_vector, k)
//!     │
//!     └──> Snapshot (vector_db/index.json)
//!            └─> {version, model_id, dimension, entries}
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use tp_chunker::{ChunkMetadata, DocumentChunk};
//! use tp_vector_store::VectorIndex;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let chunk = DocumentChunk::new(
//!         "Transfer pricing rules".to_string(),
//!         ChunkMetadata::new("guide.pdf", 1, 0),
//!     );
//!     let index = VectorIndex::from_embeddings("demo-model", vec![chunk], vec![vec![1.0, 0.0]])?;
//!     index.save("vector_db/index.json").await?;
//!
//!     let index = VectorIndex::load("vector_db/index.json").await?;
//!     for result in index.search(&[1.0, 0.0], 5)? {
//!         println!("{}: {:.3}", result.id, result.score);
//!     }
//!     Ok(())
//! }
//! ```

mod error;
mod index;
mod snapshot;
mod types;

pub use error::{Result, SnapshotError, VectorStoreError};
pub use index::{cosine_similarity, VectorIndex};
pub use snapshot::{snapshot_temp_path, SNAPSHOT_VERSION};
pub use types::{SearchResult, StoredChunk};

// Re-export chunk types for convenience
pub use tp_chunker::{ChunkMetadata, DocumentChunk};
