//! Fluent chat client: `client.prompt().user(text).call().await?.content()`

use std::sync::Arc;

use crate::error::Result;

use super::llm::{ChatModel, Message};

/// Builds a [`ChatClient`] around a chat model
pub struct ChatClientBuilder {
    model: Arc<dyn ChatModel>,
}

impl ChatClientBuilder {
    /// Finish building the client
    pub fn build(self) -> ChatClient {
        ChatClient { model: self.model }
    }
}

/// Single-turn chat client
///
/// Each prompt is sent on its own; no history is kept between calls.
#[derive(Clone)]
pub struct ChatClient {
    model: Arc<dyn ChatModel>,
}

impl ChatClient {
    /// Start building a client for `model`
    pub fn builder(model: Arc<dyn ChatModel>) -> ChatClientBuilder {
        ChatClientBuilder { model }
    }

    /// Start a new prompt
    pub fn prompt(&self) -> PromptRequest<'_> {
        PromptRequest {
            model: self.model.as_ref(),
            messages: Vec::new(),
        }
    }
}

/// A prompt being assembled
pub struct PromptRequest<'a> {
    model: &'a dyn ChatModel,
    messages: Vec<Message>,
}

impl PromptRequest<'_> {
    /// Append a user-role message
    pub fn user(mut self, text: impl Into<String>) -> Self {
        self.messages.push(Message::user(text));
        self
    }

    /// Run the completion
    pub async fn call(self) -> Result<ChatResponse> {
        let content = self.model.complete(&self.messages).await?;
        Ok(ChatResponse { content })
    }
}

/// Completion returned by [`PromptRequest::call`]
#[derive(Debug, Clone)]
pub struct ChatResponse {
    content: String,
}

impl ChatResponse {
    /// Reply text
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Take ownership of the reply text
    pub fn into_content(self) -> String {
        self.content
    }
}
