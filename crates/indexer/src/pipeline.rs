use crate::error::{IndexerError, Result};
use crate::pdf::{extract_pages, PageText};
use crate::scanner::DocumentScanner;
use crate::stats::IngestStats;
use std::path::PathBuf;
use std::time::Instant;
use tp_chunker::{ChunkerConfig, DocumentChunk, TextSplitter};

/// Chunks produced by one ingestion run
#[derive(Debug, Clone)]
pub struct IngestOutput {
    pub chunks: Vec<DocumentChunk>,
    pub stats: IngestStats,
}

/// Turns the PDFs under a document root into chunks
pub struct IngestionPipeline {
    scanner: DocumentScanner,
    splitter: TextSplitter,
}

impl IngestionPipeline {
    pub fn new(scanner: DocumentScanner, config: ChunkerConfig) -> Result<Self> {
        Ok(Self {
            scanner,
            splitter: TextSplitter::new(config)?,
        })
    }

    /// Extract and split `files`, in order.
    ///
    /// Any unreadable document fails the whole run.
    pub async fn ingest(&self, files: &[PathBuf]) -> Result<IngestOutput> {
        let start = Instant::now();
        let mut stats = IngestStats::new();
        let mut chunks = Vec::new();

        for path in files {
            let source = self.scanner.relative_path(path);
            let pages = extract_blocking(path.clone()).await?;
            stats.add_file();

            for PageText { page, text } in pages {
                let page_chunks = self.splitter.split_page(&text, &source, page);
                stats.add_page(text.chars().count(), page_chunks.len());
                chunks.extend(page_chunks);
            }
            log::debug!("Ingested {source}");
        }

        stats.time_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
        log::info!(
            "Ingested {} documents: {} pages, {} chunks in {}ms",
            stats.files,
            stats.pages,
            stats.chunks,
            stats.time_ms
        );
        Ok(IngestOutput { chunks, stats })
    }
}

async fn extract_blocking(path: PathBuf) -> Result<Vec<PageText>> {
    let display = path.display().to_string();
    tokio::task::spawn_blocking(move || extract_pages(&path))
        .await
        .map_err(|e| IndexerError::Other(format!("text extraction of {display} failed: {e}")))?
}
