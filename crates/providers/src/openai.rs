use crate::error::{ProviderError, Result};
use serde_json::Value;
use std::time::Duration;

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);
const PROVIDER_NAME: &str = "openai";

/// Connection settings shared by the OpenAI-compatible adapters
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl OpenAiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Clone)]
pub(crate) struct OpenAiClient {
    config: OpenAiConfig,
    client: reqwest::Client,
}

impl OpenAiClient {
    pub(crate) fn new(config: OpenAiConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(ProviderError::ApiKeyMissing(PROVIDER_NAME.to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|err| ProviderError::Config(format!("build HTTP client: {err}")))?;

        Ok(Self { config, client })
    }

    pub(crate) async fn post_json(&self, path: &str, body: &Value) -> Result<Value> {
        let url = format!("{}{}", self.config.base_url.trim_end_matches('/'), path);
        log::debug!("POST {url}");

        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(body)
            .send()
            .await
            .map_err(|err| ProviderError::from_reqwest(PROVIDER_NAME, self.config.timeout, &err))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                provider: PROVIDER_NAME.to_string(),
                status: status.as_u16(),
                body: text,
            });
        }

        resp.json::<Value>().await.map_err(|err| {
            if err.is_timeout() {
                ProviderError::from_reqwest(PROVIDER_NAME, self.config.timeout, &err)
            } else {
                ProviderError::InvalidResponse(format!("decode {url}: {err}"))
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_blank_api_key() {
        let err = OpenAiClient::new(OpenAiConfig::new("  ")).err().unwrap();
        assert!(matches!(err, ProviderError::ApiKeyMissing(_)));
    }

    #[test]
    fn builder_overrides_defaults() {
        let config = OpenAiConfig::new("sk-test")
            .with_base_url("http://127.0.0.1:9/v1")
            .with_timeout(Duration::from_millis(250));
        assert_eq!(config.base_url, "http://127.0.0.1:9/v1");
        assert_eq!(config.timeout, Duration::from_millis(250));
    }
}
