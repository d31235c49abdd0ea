use crate::error::{IndexerError, Result};
use std::path::{Component, Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

const PDF_EXTENSION: &str = "pdf";

/// Scanner for finding PDF documents under a root directory
#[derive(Debug, Clone)]
pub struct DocumentScanner {
    root: PathBuf,
}

impl DocumentScanner {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Recursively collect `*.pdf` files, sorted by path.
    ///
    /// A missing root yields an empty list. Hidden files and directories are
    /// skipped.
    pub fn scan(&self) -> Result<Vec<PathBuf>> {
        if !self.root.exists() {
            log::warn!("Document root {} does not exist", self.root.display());
            return Ok(Vec::new());
        }
        if !self.root.is_dir() {
            return Err(IndexerError::InvalidPath(format!(
                "{} is not a directory",
                self.root.display()
            )));
        }

        let mut files = Vec::new();
        let walker = WalkDir::new(&self.root)
            .follow_links(true)
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry));

        for result in walker {
            match result {
                Ok(entry) => {
                    if entry.file_type().is_file() && is_pdf(entry.path()) {
                        files.push(entry.into_path());
                    }
                }
                Err(e) => log::warn!("Failed to read entry: {e}"),
            }
        }

        files.sort();
        log::info!(
            "Found {} PDF documents in {}",
            files.len(),
            self.root.display()
        );
        Ok(files)
    }

    /// Path of `path` relative to the root, `/`-separated
    #[must_use]
    pub fn relative_path(&self, path: &Path) -> String {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        let parts: Vec<String> = relative
            .components()
            .filter_map(|component| match component {
                Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect();
        parts.join("/")
    }

    /// Sorted relative paths of every document under the root
    pub fn relative_paths(&self) -> Result<Vec<String>> {
        Ok(self
            .scan()?
            .iter()
            .map(|path| self.relative_path(path))
            .collect())
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('.'))
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(PDF_EXTENSION))
}
