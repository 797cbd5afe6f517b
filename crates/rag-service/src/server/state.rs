//! Application state for the RAG server

use std::sync::Arc;

use crate::config::RagConfig;
use crate::error::Result;
use crate::generation::Answerer;
use crate::providers::{
    self, ChatClient, ChatModel, EmbeddingProvider, HnswVectorStore, VectorStore,
};
use crate::retrieval::Indexer;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Configuration
    config: RagConfig,
    /// Document indexer
    indexer: Arc<Indexer>,
    /// Question answerer
    answerer: Answerer,
    /// Embedding provider, kept for health reporting
    embedding_provider: Option<Arc<dyn EmbeddingProvider>>,
    /// Chat model, kept for health reporting
    chat_model: Arc<dyn ChatModel>,
}

impl AppState {
    /// Build every component from configuration
    pub fn new(config: RagConfig) -> Result<Self> {
        tracing::info!("Initializing RAG application state (provider: {:?})...", config.llm.provider);

        let (embedding_provider, chat_model) = providers::model_providers(&config.llm)?;
        tracing::info!(
            "Model providers initialized (embedding: {}, chat: {})",
            config.llm.embed_model,
            config.llm.chat_model
        );

        let vector_store = Arc::new(HnswVectorStore::new(
            Arc::clone(&embedding_provider),
            &config.vector_store,
        )?);
        tracing::info!(
            "Vector store initialized ({} at {}, top_k: {}, {} documents)",
            vector_store.name(),
            config.vector_store.storage_path.display(),
            config.vector_store.top_k,
            vector_store.len()?
        );

        Ok(Self::assemble(config, vector_store, chat_model, Some(embedding_provider)))
    }

    /// Wire the indexer and answerer around existing collaborators
    pub fn from_parts(
        config: RagConfig,
        vector_store: Arc<dyn VectorStore>,
        chat_model: Arc<dyn ChatModel>,
    ) -> Self {
        Self::assemble(config, vector_store, chat_model, None)
    }

    fn assemble(
        config: RagConfig,
        vector_store: Arc<dyn VectorStore>,
        chat_model: Arc<dyn ChatModel>,
        embedding_provider: Option<Arc<dyn EmbeddingProvider>>,
    ) -> Self {
        let indexer = Arc::new(Indexer::new(vector_store));
        let chat_client = ChatClient::builder(Arc::clone(&chat_model)).build();
        let answerer = Answerer::new(Arc::clone(&indexer), chat_client);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                indexer,
                answerer,
                embedding_provider,
                chat_model,
            }),
        }
    }

    /// Get configuration
    pub fn config(&self) -> &RagConfig {
        &self.inner.config
    }

    /// Get the document indexer
    pub fn indexer(&self) -> &Indexer {
        &self.inner.indexer
    }

    /// Get the question answerer
    pub fn answerer(&self) -> &Answerer {
        &self.inner.answerer
    }

    /// Probe the model backends, logging any that do not respond
    pub async fn check_providers(&self) -> bool {
        let mut healthy = true;

        if let Some(embedder) = &self.inner.embedding_provider {
            if !embedder.health_check().await.unwrap_or(false) {
                tracing::warn!("Embedding provider {} is not reachable", embedder.name());
                healthy = false;
            }
        }

        let chat = &self.inner.chat_model;
        if !chat.health_check().await.unwrap_or(false) {
            tracing::warn!("Chat model {} ({}) is not reachable", chat.name(), chat.model());
            healthy = false;
        }

        healthy
    }
}
