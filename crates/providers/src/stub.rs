use crate::chat::{ChatModel, CompletionRequest};
use crate::embeddings::EmbeddingProvider;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

pub const STUB_DIMENSION: usize = 256;
const STUB_EMBEDDING_MODEL: &str = "stub-embedding";
const STUB_CHAT_MODEL: &str = "stub-chat";

/// Deterministic offline embeddings.
///
/// Words are hashed into buckets (signed bag of words), so texts sharing
/// vocabulary land close to each other. Texts without any word fall back to a
/// seeded pseudo-random unit vector.
pub struct StubEmbeddings {
    dimension: usize,
    model_id: String,
    delay: Option<Duration>,
    batch_calls: AtomicUsize,
    embedded_texts: AtomicUsize,
}

impl Default for StubEmbeddings {
    fn default() -> Self {
        Self::new(STUB_DIMENSION)
    }
}

impl StubEmbeddings {
    #[must_use]
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
            model_id: STUB_EMBEDDING_MODEL.to_string(),
            delay: None,
            batch_calls: AtomicUsize::new(0),
            embedded_texts: AtomicUsize::new(0),
        }
    }

    #[must_use]
    pub fn with_model_id(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = model_id.into();
        self
    }

    /// Sleep before answering every call
    #[must_use]
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of `embed_documents`/`embed_query` calls served
    pub fn batch_calls(&self) -> usize {
        self.batch_calls.load(Ordering::Relaxed)
    }

    /// Number of individual texts embedded
    pub fn embedded_texts(&self) -> usize {
        self.embedded_texts.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut vec = vec![0.0_f32; self.dimension];
        let mut words = 0usize;
        for word in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
        {
            let hash = fnv1a_64(word.to_lowercase().as_bytes());
            let bucket = (hash % self.dimension as u64) as usize;
            let sign = if hash >> 63 == 0 { 1.0 } else { -1.0 };
            vec[bucket] += sign;
            words += 1;
        }

        if words == 0 || vec.iter().all(|v| *v == 0.0) {
            return seeded_unit_vector(text, self.dimension);
        }

        normalize(&mut vec);
        vec
    }
}

#[async_trait]
impl EmbeddingProvider for StubEmbeddings {
    fn model_id(&self) -> &str {
        &self.model_id
    }

    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.batch_calls.fetch_add(1, Ordering::Relaxed);
        self.embedded_texts.fetch_add(texts.len(), Ordering::Relaxed);
        Ok(texts.iter().map(|text| self.embed_text(text)).collect())
    }
}

/// Offline chat model that records prompts and answers with a fixed shape
pub struct StubChatModel {
    model_id: String,
    delay: Option<Duration>,
    prompts: Mutex<Vec<CompletionRequest>>,
}

impl Default for StubChatModel {
    fn default() -> Self {
        Self::new()
    }
}

impl StubChatModel {
    #[must_use]
    pub fn new() -> Self {
        Self {
            model_id: STUB_CHAT_MODEL.to_string(),
            delay: None,
            prompts: Mutex::new(Vec::new()),
        }
    }

    #[must_use]
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Requests received so far, oldest first
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.prompts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl ChatModel for StubChatModel {
    fn model_id(&self) -> &str {
        &self.model_id
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.prompts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.clone());

        Ok(format!(
            "Stub answer from {} for a prompt of {} characters.",
            self.model_id,
            request.prompt.chars().count()
        ))
    }
}

fn normalize(vec: &mut [f32]) {
    let norm = vec.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm == 0.0 {
        return;
    }
    for value in vec {
        *value /= norm;
    }
}

fn seeded_unit_vector(text: &str, dimension: usize) -> Vec<f32> {
    let mut state =
        fnv1a_64(text.as_bytes()) ^ (dimension as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15);
    let mut vec = Vec::with_capacity(dimension);
    for _ in 0..dimension {
        let bits = splitmix64(&mut state);
        let high = (bits >> 32) as u32;
        let mantissa = high >> 9;
        let unit = f32::from_bits(0x3f80_0000 | mantissa) - 1.0;
        vec.push(unit.mul_add(2.0, -1.0));
    }
    normalize(&mut vec);
    vec
}

fn fnv1a_64(bytes: &[u8]) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in bytes {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    hash
}

const fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
