use crate::answering::{AnsweringPipeline, QueryResult};
use crate::config::KnowledgeBaseConfig;
use crate::error::{bounded, KnowledgeBaseError, Result};
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::Mutex;
use tp_indexer::{DocumentScanner, IngestStats, IngestionPipeline};
use tp_providers::{ChatModel, EmbeddingProvider};
use tp_vector_store::VectorIndex;

// Chunks per `embed_documents` call during a build.
const EMBED_BATCH_SIZE: usize = 256;

enum LifecycleState {
    Uninitialized,
    Ready(Arc<AnsweringPipeline>),
    Failed(String),
}

/// Externally visible lifecycle state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KnowledgeBaseStatus {
    Uninitialized,
    Ready { chunks: usize },
    Failed { reason: String },
}

impl KnowledgeBaseStatus {
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        matches!(self, Self::Ready { .. })
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::Ready { .. } => "ready",
            Self::Failed { .. } => "failed",
        }
    }
}

/// How `initialize` reached the Ready state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitializeOutcome {
    Loaded,
    Built(IngestStats),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitializeReport {
    pub outcome: InitializeOutcome,
    /// Chunks in the bound index
    pub chunks: usize,
    /// Documents the index was built from
    pub documents: usize,
    pub message: String,
}

/// Owns the knowledge base lifecycle: load or build the index, then answer.
///
/// `initialize` calls are serialized. `ask` and `get_documents` never wait on
/// a running `initialize`; readers keep using the previous pipeline until the
/// new one is swapped in.
pub struct KnowledgeBase {
    config: KnowledgeBaseConfig,
    scanner: DocumentScanner,
    embeddings: Arc<dyn EmbeddingProvider>,
    chat: Arc<dyn ChatModel>,
    init_lock: Mutex<()>,
    state: RwLock<LifecycleState>,
}

impl KnowledgeBase {
    pub fn new(
        config: KnowledgeBaseConfig,
        embeddings: Arc<dyn EmbeddingProvider>,
        chat: Arc<dyn ChatModel>,
    ) -> Result<Self> {
        config.validate()?;
        log::info!(
            "Knowledge base: documents {:?}, snapshot {:?}, embeddings {}, chat {}",
            config.documents_dir,
            config.snapshot_path,
            embeddings.model_id(),
            chat.model_id()
        );
        Ok(Self {
            scanner: DocumentScanner::new(&config.documents_dir),
            config,
            embeddings,
            chat,
            init_lock: Mutex::new(()),
            state: RwLock::new(LifecycleState::Uninitialized),
        })
    }

    /// Load the persisted index, or build it from the documents.
    ///
    /// A snapshot that cannot be loaded is logged and replaced by a rebuild.
    /// A failed build leaves the knowledge base in the failed state.
    pub async fn initialize(&self, force_refresh: bool) -> Result<InitializeReport> {
        let _guard = self.init_lock.lock().await;
        let snapshot_path = &self.config.snapshot_path;

        if !force_refresh && snapshot_exists(snapshot_path).await {
            log::info!("Loading existing vector database");
            match VectorIndex::load_for_model(snapshot_path, self.embeddings.model_id()).await {
                Ok(index) => {
                    let report = InitializeReport {
                        outcome: InitializeOutcome::Loaded,
                        chunks: index.len(),
                        documents: index.sources().len(),
                        message: "Successfully loaded existing knowledge base".to_string(),
                    };
                    self.bind(index);
                    return Ok(report);
                }
                Err(err) => {
                    log::error!(
                        "Error loading vector database ({} failure), rebuilding: {err}",
                        err.kind()
                    );
                }
            }
        } else {
            log::info!("Creating new vector database");
        }

        match self.build().await {
            Ok((index, stats)) => {
                let report = InitializeReport {
                    chunks: index.len(),
                    documents: stats.files,
                    message: format!(
                        "Successfully created knowledge base with {} text chunks from {} documents",
                        index.len(),
                        stats.files
                    ),
                    outcome: InitializeOutcome::Built(stats),
                };
                self.bind(index);
                Ok(report)
            }
            Err(err) => {
                log::error!("Error creating vector database: {err}");
                self.set_state(LifecycleState::Failed(err.to_string()));
                Err(err)
            }
        }
    }

    /// Answer a question from the current index
    pub async fn ask(&self, query: &str) -> Result<QueryResult> {
        let pipeline = self.pipeline()?;
        pipeline.answer(query).await
    }

    /// Sorted relative paths of the PDFs under the document root
    pub async fn get_documents(&self) -> Result<Vec<String>> {
        let scanner = self.scanner.clone();
        let documents = tokio::task::spawn_blocking(move || scanner.relative_paths())
            .await
            .map_err(|e| std::io::Error::other(format!("document scan failed: {e}")))??;
        Ok(documents)
    }

    pub fn status(&self) -> KnowledgeBaseStatus {
        match &*self.state.read().unwrap_or_else(PoisonError::into_inner) {
            LifecycleState::Uninitialized => KnowledgeBaseStatus::Uninitialized,
            LifecycleState::Ready(pipeline) => KnowledgeBaseStatus::Ready {
                chunks: pipeline.index().len(),
            },
            LifecycleState::Failed(reason) => KnowledgeBaseStatus::Failed {
                reason: reason.clone(),
            },
        }
    }

    async fn build(&self) -> Result<(VectorIndex, IngestStats)> {
        let files = self.scanner.scan()?;
        if files.is_empty() {
            return Err(KnowledgeBaseError::configuration(format!(
                "No PDF files found in {}",
                self.config.documents_dir.display()
            )));
        }
        for file in &files {
            log::info!("Processing document: {}", file.display());
        }

        let ingestion = IngestionPipeline::new(self.scanner.clone(), self.config.chunker.clone())?;
        let output = ingestion.ingest(&files).await?;
        if output.chunks.is_empty() {
            return Err(KnowledgeBaseError::configuration(format!(
                "No extractable text in the {} PDF files under {}",
                files.len(),
                self.config.documents_dir.display()
            )));
        }

        let texts: Vec<String> = output.chunks.iter().map(|c| c.content.clone()).collect();
        let mut vectors = Vec::with_capacity(texts.len());
        for batch in texts.chunks(EMBED_BATCH_SIZE) {
            let embedded = bounded(
                "document embedding",
                self.config.provider_timeout,
                self.embeddings.embed_documents(batch),
            )
            .await?;
            vectors.extend(embedded);
        }

        let index = VectorIndex::from_embeddings(self.embeddings.model_id(), output.chunks, vectors)?;
        index.save(&self.config.snapshot_path).await?;
        Ok((index, output.stats))
    }

    fn bind(&self, index: VectorIndex) {
        let pipeline = AnsweringPipeline::new(
            index,
            Arc::clone(&self.embeddings),
            Arc::clone(&self.chat),
            &self.config,
        );
        self.set_state(LifecycleState::Ready(Arc::new(pipeline)));
    }

    fn set_state(&self, next: LifecycleState) {
        *self.state.write().unwrap_or_else(PoisonError::into_inner) = next;
    }

    fn pipeline(&self) -> Result<Arc<AnsweringPipeline>> {
        match &*self.state.read().unwrap_or_else(PoisonError::into_inner) {
            LifecycleState::Ready(pipeline) => Ok(Arc::clone(pipeline)),
            LifecycleState::Uninitialized | LifecycleState::Failed(_) => {
                Err(KnowledgeBaseError::NotInitialized)
            }
        }
    }
}

async fn snapshot_exists(path: &Path) -> bool {
    tokio::fs::try_exists(path).await.unwrap_or(false)
}
