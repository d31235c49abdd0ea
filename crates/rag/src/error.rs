use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tp_indexer::IndexerError;
use tp_providers::ProviderError;
use tp_vector_store::VectorStoreError;

pub type Result<T> = std::result::Result<T, KnowledgeBaseError>;

#[derive(Error, Debug)]
pub enum KnowledgeBaseError {
    #[error("{0}")]
    Configuration(String),

    /// Upstream details stay in the source chain, out of the display message
    #[error("Language model provider request failed")]
    Provider(#[source] ProviderError),

    #[error("{operation} timed out after {timeout:?}")]
    ProviderTimeout {
        operation: &'static str,
        timeout: Duration,
    },

    #[error("Knowledge base not initialized. Call initialize() first.")]
    NotInitialized,

    #[error("Ingestion failed: {0}")]
    Ingestion(#[from] IndexerError),

    #[error("Vector index error: {0}")]
    Index(#[from] VectorStoreError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl KnowledgeBaseError {
    pub(crate) fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }
}

/// Run a provider call under `timeout`.
///
/// Both the outer deadline and a transport-level timeout reported by the
/// provider surface as [`KnowledgeBaseError::ProviderTimeout`].
pub(crate) async fn bounded<T, F>(operation: &'static str, timeout: Duration, call: F) -> Result<T>
where
    F: Future<Output = tp_providers::Result<T>>,
{
    match tokio::time::timeout(timeout, call).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(err)) if err.is_timeout() => {
            Err(KnowledgeBaseError::ProviderTimeout { operation, timeout })
        }
        Ok(Err(err)) => Err(KnowledgeBaseError::Provider(err)),
        Err(_) => Err(KnowledgeBaseError::ProviderTimeout { operation, timeout }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn deadline_becomes_provider_timeout() {
        let err = bounded("query embedding", Duration::from_secs(1), async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok::<_, ProviderError>(())
        })
        .await
        .unwrap_err();

        assert!(matches!(
            err,
            KnowledgeBaseError::ProviderTimeout {
                operation: "query embedding",
                ..
            }
        ));
        assert_eq!(err.to_string(), "query embedding timed out after 1s");
    }

    #[tokio::test]
    async fn provider_errors_pass_through() {
        let err = bounded("answer generation", Duration::from_secs(1), async {
            Err::<(), _>(ProviderError::InvalidResponse("no choices".to_string()))
        })
        .await
        .unwrap_err();
        assert!(matches!(err, KnowledgeBaseError::Provider(_)));

        let err = bounded("answer generation", Duration::from_secs(1), async {
            Err::<(), _>(ProviderError::Timeout {
                provider: "openai".to_string(),
                timeout: Duration::from_millis(10),
            })
        })
        .await
        .unwrap_err();
        assert!(matches!(err, KnowledgeBaseError::ProviderTimeout { .. }));
    }
}
