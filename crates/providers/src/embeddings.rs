use crate::error::{ProviderError, Result};
use crate::openai::{OpenAiClient, OpenAiConfig};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

// Inputs per `/embeddings` request.
const EMBEDDING_BATCH_SIZE: usize = 64;

/// Converts text into fixed-length vectors
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Model identifier, recorded in index snapshots
    fn model_id(&self) -> &str;

    /// Embed document chunks, one vector per input, in input order
    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Embed a single query
    async fn embed_query(&self, text: &str) -> Result<Vec<f32>> {
        let mut vectors = self.embed_documents(&[text.to_string()]).await?;
        vectors
            .pop()
            .ok_or_else(|| ProviderError::InvalidResponse("Empty embedding result".to_string()))
    }
}

/// OpenAI-compatible `/embeddings` client
pub struct OpenAiEmbeddings {
    client: OpenAiClient,
    model: String,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    index: usize,
    embedding: Vec<f32>,
}

impl OpenAiEmbeddings {
    pub fn new(config: OpenAiConfig, model: impl Into<String>) -> Result<Self> {
        let model = model.into();
        log::info!("Initializing embeddings with model: {model}");
        Ok(Self {
            client: OpenAiClient::new(config)?,
            model,
        })
    }

    async fn embed_batch(&self, batch: &[String]) -> Result<Vec<Vec<f32>>> {
        let body = json!({
            "model": self.model,
            "input": batch,
        });
        let value = self.client.post_json("/embeddings", &body).await?;
        let mut response: EmbeddingResponse = serde_json::from_value(value)
            .map_err(|err| ProviderError::InvalidResponse(format!("embedding payload: {err}")))?;

        if response.data.len() != batch.len() {
            return Err(ProviderError::InvalidResponse(format!(
                "expected {} embeddings, got {}",
                batch.len(),
                response.data.len()
            )));
        }

        response.data.sort_by_key(|item| item.index);
        if let Some((expected, item)) = response
            .data
            .iter()
            .enumerate()
            .find(|(expected, item)| item.index != *expected)
        {
            return Err(ProviderError::InvalidResponse(format!(
                "embedding index {} where {expected} was expected",
                item.index
            )));
        }
        Ok(response
            .data
            .into_iter()
            .map(|item| item.embedding)
            .collect())
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbeddings {
    fn model_id(&self) -> &str {
        &self.model
    }

    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        let mut vectors = Vec::with_capacity(texts.len());
        for (idx, batch) in texts.chunks(EMBEDDING_BATCH_SIZE).enumerate() {
            log::debug!(
                "Embedding batch {} ({} texts) with {}",
                idx + 1,
                batch.len(),
                self.model
            );
            vectors.extend(self.embed_batch(batch).await?);
        }
        Ok(vectors)
    }
}
