//! OpenAI-compatible providers for embeddings and chat
//!
//! Works against api.openai.com or any server exposing `/v1/embeddings` and
//! `/v1/chat/completions` (vLLM, llama.cpp server, LM Studio, ...).

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::config::LlmConfig;
use crate::error::{Error, Result};

use super::embedding::EmbeddingProvider;
use super::llm::{ChatModel, Message};

/// OpenAI-compatible API client
pub struct OpenAiClient {
    client: Client,
    config: LlmConfig,
    api_key: Option<String>,
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    temperature: f32,
    stream: bool,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

impl OpenAiClient {
    /// Create a new client; the API key comes from config or `OPENAI_API_KEY`
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        let api_key = config.resolved_api_key();
        if api_key.is_none() {
            tracing::warn!("No API key configured for {}, sending unauthenticated requests", config.base_url);
        }

        Ok(Self {
            client,
            config: config.clone(),
            api_key,
        })
    }

    fn url(&self, path: &str) -> String {
        let base = self.config.base_url.trim_end_matches('/');
        if base.ends_with("/v1") {
            format!("{}{}", base, path)
        } else {
            format!("{}/v1{}", base, path)
        }
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }

    /// Check if the API answers the model listing
    pub async fn health_check(&self) -> Result<bool> {
        match self.authorized(self.client.get(self.url("/models"))).send().await {
            Ok(response) => Ok(response.status().is_success()),
            Err(_) => Ok(false),
        }
    }

    /// Generate an embedding
    pub async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let url = self.url("/embeddings");
        let request = EmbeddingRequest {
            model: &self.config.embed_model,
            input: text,
        };
        let (url, request) = (&url, &request);

        super::retry_request(self.config.max_retries, move || async move {
            let response = self
                .authorized(self.client.post(url))
                .json(request)
                .send()
                .await
                .map_err(|e| Error::embedding(format!("Embedding request failed: {}", e)))?;

            if !response.status().is_success() {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                return Err(Error::embedding(format!(
                    "Embedding failed: HTTP {} - {}",
                    status, body
                )));
            }

            let parsed: EmbeddingResponse = response
                .json()
                .await
                .map_err(|e| Error::embedding(format!("Failed to parse embedding response: {}", e)))?;

            parsed
                .data
                .into_iter()
                .next()
                .map(|d| d.embedding)
                .ok_or_else(|| Error::embedding("Embedding response contained no data"))
        })
        .await
    }

    /// Run a non-streaming chat completion
    pub async fn chat(&self, messages: &[Message]) -> Result<String> {
        let url = self.url("/chat/completions");
        let request = ChatCompletionRequest {
            model: &self.config.chat_model,
            messages,
            temperature: self.config.temperature,
            stream: false,
        };
        let (url, request) = (&url, &request);

        super::retry_request(self.config.max_retries, move || async move {
            let response = self
                .authorized(self.client.post(url))
                .json(request)
                .send()
                .await
                .map_err(|e| Error::llm(format!("Chat request failed: {}", e)))?;

            if !response.status().is_success() {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                return Err(Error::llm(format!("API error {}: {}", status, body)));
            }

            let parsed: ChatCompletionResponse = response
                .json()
                .await
                .map_err(|e| Error::llm(format!("Failed to parse chat response: {}", e)))?;

            first_choice_content(parsed)
        })
        .await
    }
}

fn first_choice_content(response: ChatCompletionResponse) -> Result<String> {
    response
        .choices
        .into_iter()
        .next()
        .map(|c| c.message.content.unwrap_or_default())
        .ok_or_else(|| Error::llm("Completion response contained no choices"))
}

/// OpenAI embedding provider (e.g. text-embedding-3-small)
pub struct OpenAiEmbedder {
    client: Arc<OpenAiClient>,
}

impl OpenAiEmbedder {
    /// Create from existing client
    pub fn from_client(client: Arc<OpenAiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.client.embed(text).await
    }

    async fn health_check(&self) -> Result<bool> {
        self.client.health_check().await
    }

    fn name(&self) -> &str {
        "openai"
    }
}

/// OpenAI chat model (e.g. gpt-4o-mini)
pub struct OpenAiChat {
    client: Arc<OpenAiClient>,
}

impl OpenAiChat {
    /// Create from existing client
    pub fn from_client(client: Arc<OpenAiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ChatModel for OpenAiChat {
    async fn complete(&self, messages: &[Message]) -> Result<String> {
        self.client.chat(messages).await
    }

    async fn health_check(&self) -> Result<bool> {
        self.client.health_check().await
    }

    fn name(&self) -> &str {
        "openai"
    }

    fn model(&self) -> &str {
        &self.client.config.chat_model
    }
}

/// Build the embedder and chat model sharing a single client
pub fn openai_providers(config: &LlmConfig) -> Result<(OpenAiEmbedder, OpenAiChat)> {
    let client = Arc::new(OpenAiClient::new(config)?);
    Ok((
        OpenAiEmbedder::from_client(Arc::clone(&client)),
        OpenAiChat::from_client(client),
    ))
}
