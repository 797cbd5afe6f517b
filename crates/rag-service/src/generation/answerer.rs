//! Question answering over retrieved documents

use std::sync::Arc;

use crate::error::Result;
use crate::providers::ChatClient;
use crate::retrieval::Indexer;

use super::prompt::PromptBuilder;

/// Answers questions from retrieved context with a chat model
///
/// Retrieval and completion errors propagate unchanged. An empty retrieval
/// still reaches the model, with an empty context section.
pub struct Answerer {
    indexer: Arc<Indexer>,
    chat_client: ChatClient,
}

impl Answerer {
    /// Create an answerer over `indexer` using `chat_client` for completions
    pub fn new(indexer: Arc<Indexer>, chat_client: ChatClient) -> Self {
        Self {
            indexer,
            chat_client,
        }
    }

    /// Retrieve context for `question`, prompt the model, and return its reply
    pub async fn ask_question(&self, question: &str) -> Result<String> {
        let documents = self.indexer.search(question).await?;
        tracing::debug!("Retrieved {} documents for question", documents.len());

        let context = PromptBuilder::build_context(&documents);
        let prompt = PromptBuilder::build_qa_prompt(&context, question);

        let response = self.chat_client.prompt().user(prompt).call().await?;
        Ok(response.into_content())
    }
}
