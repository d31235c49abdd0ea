use crate::error::{IndexerError, Result};
use lopdf::Document;
use std::path::Path;

/// Text of a single PDF page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageText {
    /// 1-based page number
    pub page: u32,
    pub text: String,
}

/// Extract text page by page.
///
/// Only text drawn with text operators is recovered; scanned pages come back
/// blank and are skipped. This is blocking work.
pub fn extract_pages(path: &Path) -> Result<Vec<PageText>> {
    let document = Document::load(path).map_err(|e| IndexerError::pdf(path, e))?;
    let page_numbers: Vec<u32> = document.get_pages().keys().copied().collect();
    log::debug!("{}: {} pages", path.display(), page_numbers.len());

    let mut pages = Vec::with_capacity(page_numbers.len());
    for page in page_numbers {
        let text = document
            .extract_text(&[page])
            .map_err(|e| IndexerError::pdf(path, format!("page {page}: {e}")))?;
        if text.trim().is_empty() {
            log::debug!("{}: page {page} has no text, skipping", path.display());
            continue;
        }
        pages.push(PageText { page, text });
    }

    Ok(pages)
}
