use crate::error::{Result, SnapshotError};
use crate::index::VectorIndex;
use crate::types::StoredChunk;
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Serialize)]
struct SnapshotRef<'a> {
    version: u32,
    model_id: &'a str,
    dimension: usize,
    entries: &'a [StoredChunk],
}

#[derive(Deserialize)]
struct SnapshotOwned {
    version: u32,
    model_id: String,
    dimension: usize,
    entries: Vec<StoredChunk>,
}

/// Where a snapshot is staged before it replaces `path`
#[must_use]
pub fn snapshot_temp_path(path: &Path) -> PathBuf {
    let mut raw: OsString = path.as_os_str().to_owned();
    raw.push(".tmp");
    PathBuf::from(raw)
}

impl VectorIndex {
    /// Persist the index, replacing any previous snapshot at `path`.
    ///
    /// The snapshot is fully written and synced to a sibling temp file first,
    /// then renamed over the target.
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        log::info!("Saving vector index ({} chunks) to {:?}", self.len(), path);

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let bytes = serde_json::to_vec(&SnapshotRef {
            version: SNAPSHOT_VERSION,
            model_id: self.model_id(),
            dimension: self.dimension(),
            entries: self.entries(),
        })?;

        let tmp = snapshot_temp_path(path);
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(&bytes).await?;
        file.sync_all().await?;
        drop(file);
        tokio::fs::rename(&tmp, path).await?;

        log::info!("Vector index saved successfully");
        Ok(())
    }

    /// Load a snapshot written by [`VectorIndex::save`]
    pub async fn load(path: impl AsRef<Path>) -> std::result::Result<Self, SnapshotError> {
        let path = path.as_ref();
        log::info!("Loading vector index from {:?}", path);

        let bytes = tokio::fs::read(path).await.map_err(|source| SnapshotError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let snapshot: SnapshotOwned =
            serde_json::from_slice(&bytes).map_err(|source| SnapshotError::Corrupt {
                path: path.to_path_buf(),
                source,
            })?;

        let incompatible = |reason: String| SnapshotError::Incompatible {
            path: path.to_path_buf(),
            reason,
        };

        if snapshot.version != SNAPSHOT_VERSION {
            return Err(incompatible(format!(
                "version {} (expected {SNAPSHOT_VERSION})",
                snapshot.version
            )));
        }

        let mut index = Self::new(snapshot.model_id, snapshot.dimension);
        for stored in snapshot.entries {
            index
                .insert(stored)
                .map_err(|err| incompatible(err.to_string()))?;
        }

        log::info!("Loaded {} chunks", index.len());
        Ok(index)
    }

    /// Load a snapshot and require it to come from `model_id`
    pub async fn load_for_model(
        path: impl AsRef<Path>,
        model_id: &str,
    ) -> std::result::Result<Self, SnapshotError> {
        let path = path.as_ref();
        let index = Self::load(path).await?;
        if index.model_id() != model_id {
            return Err(SnapshotError::Incompatible {
                path: path.to_path_buf(),
                reason: format!(
                    "built with embedding model '{}', configured model is '{model_id}'",
                    index.model_id()
                ),
            });
        }
        Ok(index)
    }
}
