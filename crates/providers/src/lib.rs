//! # Transfer Pricing Providers
//!
//! Adapters for the two remote collaborators of the knowledge base:
//!
//! - **Embeddings**: text → fixed-length `Vec<f32>` ([`EmbeddingProvider`])
//! - **Chat completion**: prompt → answer text ([`ChatModel`])
//!
//! Both come in two flavours: an OpenAI-compatible HTTP client and a
//! deterministic offline stub selected with `PROVIDER_MODE=stub`.

mod chat;
mod embeddings;
mod error;
mod openai;
mod stub;

pub use chat::{ChatModel, CompletionRequest, OpenAiChatModel};
pub use embeddings::{EmbeddingProvider, OpenAiEmbeddings};
pub use error::{ProviderError, Result};
pub use openai::{OpenAiConfig, DEFAULT_OPENAI_BASE_URL};
pub use stub::{StubChatModel, StubEmbeddings, STUB_DIMENSION};

use std::str::FromStr;

/// Which provider family backs the knowledge base
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderMode {
    OpenAi,
    Stub,
}

impl ProviderMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Stub => "stub",
        }
    }
}

impl FromStr for ProviderMode {
    type Err = ProviderError;

    fn from_str(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(Self::OpenAi),
            "stub" => Ok(Self::Stub),
            other => Err(ProviderError::Config(format!(
                "Unsupported provider mode '{other}' (expected 'openai' or 'stub')"
            ))),
        }
    }
}
