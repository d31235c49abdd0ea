//! # Transfer Pricing Indexer
//!
//! Document ingestion for the knowledge base.
//!
//! ## Pipeline
//!
//! ```text
//! Document root
//!     │
//!     ├──> Document Scanner (recursive, *.pdf)
//!     │      └─> PDF files
//!     │
//!     ├──> Text extraction (lopdf, per page)
//!     │      └─> Page text
//!     │
//!     └──> Text Splitter (overlapping windows)
//!            └─> Document chunks
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use tp_chunker::ChunkerConfig;
//! use tp_indexer::{DocumentScanner, IngestionPipeline};
//!
//! #[tokio::main]
//! async fn main() -> tp_indexer::Result<()> {
//!     let scanner = DocumentScanner::new("data/documents");
//!     let files = scanner.scan()?;
//!     let pipeline = IngestionPipeline::new(scanner, ChunkerConfig::default())?;
//!     let output = pipeline.ingest(&files).await?;
//!
//!     println!("Ingested {} files, {} chunks", output.stats.files, output.stats.chunks);
//!     Ok(())
//! }
//! ```

mod error;
mod pdf;
mod pipeline;
mod scanner;
mod stats;

pub use error::{IndexerError, Result};
pub use pdf::{extract_pages, PageText};
pub use pipeline::{IngestOutput, IngestionPipeline};
pub use scanner::DocumentScanner;
pub use stats::IngestStats;
