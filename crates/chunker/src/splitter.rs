use crate::config::ChunkerConfig;
use crate::error::Result;
use crate::types::{ChunkMetadata, DocumentChunk};

/// Chunk boundaries in character offsets, `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextSpan {
    pub start: usize,
    pub end: usize,
}

/// Deterministic rolling-window splitter.
///
/// Every chunk is at most `chunk_size` characters long and starts exactly
/// `chunk_overlap` characters before the end of the previous one, so dropping
/// the first `chunk_overlap` characters of every chunk but the first and
/// concatenating gives back the input.
pub struct TextSplitter {
    config: ChunkerConfig,
}

impl TextSplitter {
    /// Create a splitter, rejecting configurations that cannot make progress
    pub fn new(config: ChunkerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Compute chunk spans over `text`
    #[must_use]
    pub fn spans(&self, text: &str) -> Vec<TextSpan> {
        let bounds = char_bounds(text);
        let total = bounds.len() - 1;
        let size = self.config.chunk_size;
        let overlap = self.config.chunk_overlap;

        let mut spans = Vec::new();
        let mut start = 0;
        while start < total {
            let limit = start + size;
            if limit >= total {
                spans.push(TextSpan { start, end: total });
                break;
            }

            // A cut at or before start + overlap would not move the window forward.
            let end = self
                .break_point(text, &bounds, start, start + overlap + 1, limit)
                .unwrap_or(limit);
            spans.push(TextSpan { start, end });
            start = end - overlap;
        }

        spans
    }

    /// Split raw text into chunk strings
    #[must_use]
    pub fn split_text(&self, text: &str) -> Vec<String> {
        let bounds = char_bounds(text);
        self.spans(text)
            .into_iter()
            .map(|span| text[bounds[span.start]..bounds[span.end]].to_string())
            .collect()
    }

    /// Split one page of a document, tagging every chunk with its origin
    #[must_use]
    pub fn split_page(&self, text: &str, source: &str, page: u32) -> Vec<DocumentChunk> {
        let bounds = char_bounds(text);
        let chunks: Vec<DocumentChunk> = self
            .spans(text)
            .into_iter()
            .map(|span| {
                DocumentChunk::new(
                    text[bounds[span.start]..bounds[span.end]].to_string(),
                    ChunkMetadata::new(source, page, span.start),
                )
            })
            .collect();

        log::debug!(
            "Split {source} page {page} ({} chars) into {} chunks",
            bounds.len() - 1,
            chunks.len()
        );
        chunks
    }

    /// Latest separator end inside `[min_end, max_end]`, trying separators in
    /// priority order.
    fn break_point(
        &self,
        text: &str,
        bounds: &[usize],
        start: usize,
        min_end: usize,
        max_end: usize,
    ) -> Option<usize> {
        let offset = bounds[start];
        let window = &text[offset..bounds[max_end]];

        for separator in &self.config.separators {
            let Some(pos) = window.rfind(separator.as_str()) else {
                continue;
            };
            let end_byte = offset + pos + separator.len();
            let Ok(end) = bounds.binary_search(&end_byte) else {
                continue;
            };
            if end >= min_end {
                return Some(end);
            }
        }

        None
    }
}

/// Byte offset of every char plus the total length
fn char_bounds(text: &str) -> Vec<usize> {
    text.char_indices()
        .map(|(idx, _)| idx)
        .chain(std::iter::once(text.len()))
        .collect()
}
