use crate::config::KnowledgeBaseConfig;
use crate::error::{bounded, Result};
use crate::prompt::{join_context, render_prompt};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tp_chunker::ChunkMetadata;
use tp_providers::{ChatModel, CompletionRequest, EmbeddingProvider};
use tp_vector_store::VectorIndex;

const TRUNCATION_MARKER: &str = "...";

/// A retrieved chunk as shown to the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceRecord {
    pub content: String,
    pub metadata: ChunkMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryResult {
    pub answer: String,
    pub sources: Vec<SourceRecord>,
}

/// Retrieval plus generation over one immutable index
pub struct AnsweringPipeline {
    index: VectorIndex,
    embeddings: Arc<dyn EmbeddingProvider>,
    chat: Arc<dyn ChatModel>,
    top_k: usize,
    preview_chars: usize,
    timeout: Duration,
}

impl AnsweringPipeline {
    pub fn new(
        index: VectorIndex,
        embeddings: Arc<dyn EmbeddingProvider>,
        chat: Arc<dyn ChatModel>,
        config: &KnowledgeBaseConfig,
    ) -> Self {
        Self {
            index,
            embeddings,
            chat,
            top_k: config.top_k,
            preview_chars: config.source_preview_chars,
            timeout: config.provider_timeout,
        }
    }

    #[must_use]
    pub const fn index(&self) -> &VectorIndex {
        &self.index
    }

    pub async fn answer(&self, question: &str) -> Result<QueryResult> {
        let query_vector = bounded(
            "query embedding",
            self.timeout,
            self.embeddings.embed_query(question),
        )
        .await?;

        let results = self.index.search(&query_vector, self.top_k)?;
        log::debug!(
            "Retrieved {} chunks: {:?}",
            results.len(),
            results.iter().map(|r| r.id.as_str()).collect::<Vec<_>>()
        );

        let prompt = render_prompt(&join_context(&results), question);
        let request = CompletionRequest::deterministic(prompt);
        let answer = bounded(
            "answer generation",
            self.timeout,
            self.chat.complete(&request),
        )
        .await?;

        let sources = results
            .into_iter()
            .map(|r| SourceRecord {
                content: truncate_preview(&r.chunk.content, self.preview_chars),
                metadata: r.chunk.metadata,
            })
            .collect();

        Ok(QueryResult { answer, sources })
    }
}

/// First `max_chars` characters of `text`, with `...` appended when cut
pub fn truncate_preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_pos, _)) => format!("{}{TRUNCATION_MARKER}", &text[..byte_pos]),
        None => text.to_string(),
    }
}
