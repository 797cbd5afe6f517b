//! Local vector store using the ruvector-core HNSW index

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

use ruvector_core::types::{DbOptions, HnswConfig};
use ruvector_core::{DistanceMetric, SearchQuery, VectorDB, VectorEntry};

use crate::config::VectorStoreConfig;
use crate::error::{Error, Result};
use crate::types::document::{Document, DISTANCE_METADATA_KEY};

use super::embedding::EmbeddingProvider;
use super::vector_store::VectorStore;

/// Vector metadata key holding the serialized document
const DOCUMENT_KEY: &str = "document";

/// Vector store wrapping a ruvector-core database
///
/// Documents are embedded on the way in and stored as vector metadata, so a
/// search hit carries everything needed to rebuild the [`Document`].
pub struct HnswVectorStore {
    db: Arc<VectorDB>,
    embedder: Arc<dyn EmbeddingProvider>,
    dimensions: usize,
    top_k: usize,
    similarity_threshold: f32,
}

impl HnswVectorStore {
    /// Open (or create) the database at `config.storage_path`
    pub fn new(embedder: Arc<dyn EmbeddingProvider>, config: &VectorStoreConfig) -> Result<Self> {
        // Ensure storage directory exists
        if let Some(parent) = config.storage_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let options = DbOptions {
            dimensions: config.dimensions,
            distance_metric: DistanceMetric::Cosine,
            storage_path: config.storage_path.to_string_lossy().to_string(),
            hnsw_config: Some(HnswConfig {
                m: config.hnsw_m,
                ef_construction: config.hnsw_ef_construction,
                ef_search: config.hnsw_ef_search,
                max_elements: config.max_elements,
            }),
            quantization: None,
        };

        let db = VectorDB::new(options)?;

        Ok(Self {
            db: Arc::new(db),
            embedder,
            dimensions: config.dimensions,
            top_k: config.top_k,
            similarity_threshold: config.similarity_threshold,
        })
    }

    /// Number of stored documents
    pub fn len(&self) -> Result<usize> {
        Ok(self.db.len()?)
    }

    /// Check if empty
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    async fn embed_checked(&self, text: &str) -> Result<Vec<f32>> {
        let embedding = self.embedder.embed(text).await?;
        if embedding.len() != self.dimensions {
            return Err(Error::embedding(format!(
                "Expected {} dimensions, got {}",
                self.dimensions,
                embedding.len()
            )));
        }
        Ok(embedding)
    }
}

/// Insert every entry or none of them
fn insert_all(db: &VectorDB, entries: Vec<(String, VectorEntry)>) -> Result<()> {
    let mut inserted: Vec<String> = Vec::with_capacity(entries.len());

    for (id, entry) in entries {
        if let Err(e) = db.insert(entry) {
            for done in &inserted {
                if let Err(rollback) = db.delete(done) {
                    tracing::warn!("Failed to roll back vector {}: {}", done, rollback);
                }
            }
            return Err(e.into());
        }
        inserted.push(id);
    }

    Ok(())
}

fn document_from_metadata(metadata: Option<&HashMap<String, serde_json::Value>>) -> Option<Document> {
    let value = metadata?.get(DOCUMENT_KEY)?;
    serde_json::from_value(value.clone()).ok()
}

#[async_trait]
impl VectorStore for HnswVectorStore {
    async fn add(&self, documents: Vec<Document>) -> Result<()> {
        // Embed the whole batch before touching the index
        let mut entries = Vec::with_capacity(documents.len());
        for document in documents {
            let vector = self.embed_checked(document.content()).await?;
            let id = document.id().to_string();
            let metadata = HashMap::from([(DOCUMENT_KEY.to_string(), serde_json::to_value(&document)?)]);
            entries.push((
                id.clone(),
                VectorEntry {
                    id: Some(id),
                    vector,
                    metadata: Some(metadata),
                },
            ));
        }

        let count = entries.len();
        let db = Arc::clone(&self.db);
        tokio::task::spawn_blocking(move || insert_all(&db, entries))
            .await
            .map_err(|e| Error::Internal(format!("Task join error: {}", e)))??;

        tracing::debug!("Stored {} documents", count);
        Ok(())
    }

    async fn similarity_search(&self, query: &str) -> Result<Vec<Document>> {
        if self.is_empty()? {
            return Ok(Vec::new());
        }

        let vector = self.embed_checked(query).await?;
        let query = SearchQuery {
            vector,
            k: self.top_k,
            filter: None,
            ef_search: None,
        };

        let db = Arc::clone(&self.db);
        let results = tokio::task::spawn_blocking(move || db.search(query))
            .await
            .map_err(|e| Error::Internal(format!("Task join error: {}", e)))??;

        // Scores are cosine distances: lower is closer
        let mut matches: Vec<(f32, Document)> = results
            .into_iter()
            .filter_map(|result| match document_from_metadata(result.metadata.as_ref()) {
                Some(document) => Some((result.score, document)),
                None => {
                    tracing::warn!("Skipping vector {} without document metadata", result.id);
                    None
                }
            })
            .filter(|(distance, _)| 1.0 - *distance >= self.similarity_threshold)
            .collect();

        matches.sort_by(|a, b| a.0.total_cmp(&b.0));
        matches.truncate(self.top_k);

        Ok(matches
            .into_iter()
            .map(|(distance, document)| {
                document.with_metadata(DISTANCE_METADATA_KEY, f64::from(distance))
            })
            .collect())
    }

    fn name(&self) -> &str {
        "local-hnsw"
    }
}
