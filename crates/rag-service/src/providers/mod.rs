//! Provider abstractions for embeddings, chat models and vector storage
//!
//! This module provides trait-based abstractions that allow switching between
//! local (Ollama) and hosted (OpenAI-compatible) model backends.

pub mod chat_client;
pub mod embedding;
pub mod hnsw;
pub mod llm;
pub mod ollama;
pub mod openai;
pub mod vector_store;

pub use chat_client::{ChatClient, ChatResponse};
pub use embedding::EmbeddingProvider;
pub use hnsw::HnswVectorStore;
pub use llm::{ChatModel, Message, Role};
pub use vector_store::VectorStore;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::config::{LlmConfig, LlmProviderKind};
use crate::error::Result;

/// Build the embedding provider and chat model selected by `config.provider`
pub fn model_providers(config: &LlmConfig) -> Result<(Arc<dyn EmbeddingProvider>, Arc<dyn ChatModel>)> {
    match config.provider {
        LlmProviderKind::Ollama => {
            let (embedder, chat) = ollama::ollama_providers(config)?;
            Ok((Arc::new(embedder), Arc::new(chat)))
        }
        LlmProviderKind::OpenAi => {
            let (embedder, chat) = openai::openai_providers(config)?;
            Ok((Arc::new(embedder), Arc::new(chat)))
        }
    }
}

/// Retry a request with exponential backoff
///
/// Runs `operation` once plus up to `max_retries` more times.
pub(crate) async fn retry_request<F, Fut, T>(max_retries: u32, operation: F) -> Result<T>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt = 0;
    loop {
        match operation().await {
            Ok(result) => return Ok(result),
            Err(e) if attempt < max_retries => {
                let delay = Duration::from_secs(2u64.pow(attempt));
                tracing::warn!(
                    "Request failed (attempt {}/{}): {}, retrying in {:?}",
                    attempt + 1,
                    max_retries + 1,
                    e,
                    delay
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn test_no_retries_by_default() {
        let calls = &AtomicU32::new(0);
        let result: Result<()> = retry_request(0, move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(Error::llm("down"))
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_until_success() {
        let calls = &AtomicU32::new(0);
        let result = retry_request(3, move || async move {
            if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                Err(Error::llm("flaky"))
            } else {
                Ok("done")
            }
        })
        .await;

        assert_eq!(result.unwrap(), "done");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_model_providers_follow_config() {
        let (embedder, chat) = model_providers(&LlmConfig::default()).unwrap();
        assert_eq!(embedder.name(), "ollama");
        assert_eq!(chat.name(), "ollama");

        let openai = LlmConfig {
            provider: LlmProviderKind::OpenAi,
            base_url: "https://api.openai.com".to_string(),
            api_key: Some("sk-test".to_string()),
            ..LlmConfig::default()
        };
        let (embedder, chat) = model_providers(&openai).unwrap();
        assert_eq!(embedder.name(), "openai");
        assert_eq!(chat.name(), "openai");
    }
}
