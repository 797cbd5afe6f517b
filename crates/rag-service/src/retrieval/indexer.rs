//! Document indexing and retrieval through the vector store

use std::sync::Arc;

use crate::error::Result;
use crate::providers::VectorStore;
use crate::types::Document;

/// Thin wrapper that turns raw text into documents and searches the store
///
/// No validation happens here: whatever the store rejects, it reports.
pub struct Indexer {
    vector_store: Arc<dyn VectorStore>,
}

impl Indexer {
    /// Create an indexer backed by `vector_store`
    pub fn new(vector_store: Arc<dyn VectorStore>) -> Self {
        Self { vector_store }
    }

    /// Wrap `content` in a new document and add it to the store as a one-element batch
    pub async fn add_document(&self, content: &str) -> Result<()> {
        let document = Document::new(content);
        let id = document.id();

        self.vector_store.add(vec![document]).await?;

        tracing::debug!("Indexed document {} ({} bytes)", id, content.len());
        Ok(())
    }

    /// Similarity search with the store's default parameters, results unmodified
    pub async fn search(&self, query: &str) -> Result<Vec<Document>> {
        self.vector_store.similarity_search(query).await
    }
}
