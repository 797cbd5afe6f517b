//! Vector store trait for storing documents and searching them by similarity

use async_trait::async_trait;
use crate::error::Result;
use crate::types::Document;

/// Trait for document storage with similarity search
///
/// The store owns embedding, indexing and ranking. Callers hand it whole
/// documents and get documents back, most similar first.
///
/// Implementations:
/// - `HnswVectorStore`: local ruvector-core HNSW index with cosine distance
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Embed and store a batch of documents
    async fn add(&self, documents: Vec<Document>) -> Result<()>;

    /// Search for documents similar to `query` using the store's defaults
    async fn similarity_search(&self, query: &str) -> Result<Vec<Document>>;

    /// Get provider name for logging
    fn name(&self) -> &str;
}
