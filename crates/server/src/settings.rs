use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tp_chunker::ChunkerConfig;
use tp_providers::{
    ChatModel, EmbeddingProvider, OpenAiChatModel, OpenAiConfig, OpenAiEmbeddings, ProviderMode,
    StubChatModel, StubEmbeddings, DEFAULT_OPENAI_BASE_URL,
};
use tp_rag::{KnowledgeBaseConfig, DEFAULT_DOCUMENTS_DIR, DEFAULT_SNAPSHOT_PATH};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Environment variable {0} is not set and no default provided")]
    Missing(String),

    #[error("Invalid value '{value}' for {name}: {reason}")]
    Invalid {
        name: String,
        value: String,
        reason: String,
    },
}

/// Resolve `name` through `lookup`, falling back to `default`.
///
/// Fails when the variable is absent and there is no default.
pub fn get_env_variable(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: Option<&str>,
) -> Result<String, ConfigError> {
    match lookup(name) {
        Some(value) => Ok(value),
        None => default
            .map(str::to_string)
            .ok_or_else(|| ConfigError::Missing(name.to_string())),
    }
}

fn parse_env<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: &str,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = get_env_variable(lookup, name, Some(default))?;
    raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        name: name.to_string(),
        value: raw.clone(),
        reason: e.to_string(),
    })
}

/// Process settings, sourced from the environment
#[derive(Clone)]
pub struct Settings {
    pub model_name: String,
    pub embedding_model: String,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub debug: bool,
    pub provider_mode: ProviderMode,
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub provider_timeout: Duration,
    pub documents_dir: PathBuf,
    pub vector_db_path: PathBuf,
    pub host: String,
    pub port: u16,
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("model_name", &self.model_name)
            .field("embedding_model", &self.embedding_model)
            .field("chunk_size", &self.chunk_size)
            .field("chunk_overlap", &self.chunk_overlap)
            .field("debug", &self.debug)
            .field("provider_mode", &self.provider_mode)
            .field(
                "openai_api_key",
                &self.openai_api_key.as_ref().map(|_| "<redacted>"),
            )
            .field("openai_base_url", &self.openai_base_url)
            .field("provider_timeout", &self.provider_timeout)
            .field("documents_dir", &self.documents_dir)
            .field("vector_db_path", &self.vector_db_path)
            .field("host", &self.host)
            .field("port", &self.port)
            .finish()
    }
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mode_raw = get_env_variable(&lookup, "PROVIDER_MODE", Some("openai"))?;
        let provider_mode =
            ProviderMode::from_str(&mode_raw).map_err(|e| ConfigError::Invalid {
                name: "PROVIDER_MODE".to_string(),
                value: mode_raw.clone(),
                reason: e.to_string(),
            })?;

        let openai_api_key = match provider_mode {
            ProviderMode::OpenAi => Some(get_env_variable(&lookup, "OPENAI_API_KEY", None)?),
            ProviderMode::Stub => lookup("OPENAI_API_KEY"),
        };

        let debug = get_env_variable(&lookup, "DEBUG", Some("False"))?
            .trim()
            .eq_ignore_ascii_case("true");

        Ok(Self {
            model_name: get_env_variable(&lookup, "MODEL_NAME", Some("gpt-3.5-turbo"))?,
            embedding_model: get_env_variable(
                &lookup,
                "EMBEDDING_MODEL",
                Some("text-embedding-ada-002"),
            )?,
            chunk_size: parse_env(&lookup, "CHUNK_SIZE", "1000")?,
            chunk_overlap: parse_env(&lookup, "CHUNK_OVERLAP", "100")?,
            debug,
            provider_mode,
            openai_api_key,
            openai_base_url: get_env_variable(
                &lookup,
                "OPENAI_BASE_URL",
                Some(DEFAULT_OPENAI_BASE_URL),
            )?,
            provider_timeout: Duration::from_secs(parse_env(
                &lookup,
                "PROVIDER_TIMEOUT_SECS",
                "60",
            )?),
            documents_dir: get_env_variable(&lookup, "DOCUMENTS_DIR", Some(DEFAULT_DOCUMENTS_DIR))?
                .into(),
            vector_db_path: get_env_variable(
                &lookup,
                "VECTOR_DB_PATH",
                Some(DEFAULT_SNAPSHOT_PATH),
            )?
            .into(),
            host: get_env_variable(&lookup, "HOST", Some("0.0.0.0"))?,
            port: parse_env(&lookup, "PORT", "5000")?,
        })
    }

    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    #[must_use]
    pub fn knowledge_base_config(&self) -> KnowledgeBaseConfig {
        KnowledgeBaseConfig::new(&self.documents_dir, &self.vector_db_path)
            .with_chunker(ChunkerConfig::new(self.chunk_size, self.chunk_overlap))
            .with_provider_timeout(self.provider_timeout)
    }

    /// Embedding and chat providers for the configured mode
    pub fn build_providers(
        &self,
    ) -> tp_providers::Result<(Arc<dyn EmbeddingProvider>, Arc<dyn ChatModel>)> {
        match self.provider_mode {
            ProviderMode::Stub => {
                log::warn!("PROVIDER_MODE=stub: answers are placeholders, not model output");
                let embeddings: Arc<dyn EmbeddingProvider> = Arc::new(StubEmbeddings::default());
                let chat: Arc<dyn ChatModel> = Arc::new(StubChatModel::new());
                Ok((embeddings, chat))
            }
            ProviderMode::OpenAi => {
                let api_key = self.openai_api_key.clone().unwrap_or_default();
                let config = OpenAiConfig::new(api_key)
                    .with_base_url(&self.openai_base_url)
                    .with_timeout(self.provider_timeout);
                let embeddings: Arc<dyn EmbeddingProvider> =
                    Arc::new(OpenAiEmbeddings::new(config.clone(), &self.embedding_model)?);
                let chat: Arc<dyn ChatModel> =
                    Arc::new(OpenAiChatModel::new(config, &self.model_name)?);
                Ok((embeddings, chat))
            }
        }
    }
}
