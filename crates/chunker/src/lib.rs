//! # Transfer Pricing Chunker
//!
//! Turns extracted document text into overlapping, bounded chunks ready for
//! embedding.
//!
//! ## Splitting
//!
//! ```text
//! Page text
//!     │
//!     ├──> Window [start, start + chunk_size]
//!     │
//!     ├──> Cut at the last break point inside the window
//!     │    ├─> paragraph break ("\n\n")
//!     │    ├─> line break ("\n")
//!     │    ├─> sentence end (".")
//!     │    ├─> word break (" ")
//!     │    └─> any character boundary
//!     │
//!     └──> Next window starts at cut - chunk_overlap
//! ```
//!
//! ## Example
//!
//! ```rust
//! use tp_chunker::{ChunkerConfig, TextSplitter};
//!
//! let splitter = TextSplitter::new(ChunkerConfig::new(40, 8)).unwrap();
//! let chunks = splitter.split_page(
//!     "Article 34 sets out the arm's length principle.\n\nIt applies to related parties.",
//!     "guide.pdf",
//!     1,
//! );
//! for chunk in &chunks {
//!     assert!(chunk.char_len() <= 40);
//! }
//! ```

mod config;
mod error;
mod splitter;
mod types;

pub use config::{ChunkerConfig, DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE, DEFAULT_SEPARATORS};
pub use error::{ChunkerError, Result};
pub use splitter::{TextSpan, TextSplitter};
pub use types::{ChunkMetadata, DocumentChunk};
