//! Document type stored in and returned by the vector store

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Metadata key the vector store uses to report how far a match is from the query
pub const DISTANCE_METADATA_KEY: &str = "distance";

/// A unit of indexed text
///
/// Created once from raw text and never mutated afterwards; the vector store
/// owns it after indexing. Search results may come back with extra metadata
/// attached by the store (see [`Document::with_metadata`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Unique document ID
    id: Uuid,
    /// Text content
    content: String,
    /// Additional metadata
    #[serde(default)]
    metadata: HashMap<String, serde_json::Value>,
}

impl Document {
    /// Create a new document from raw text
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            content: content.into(),
            metadata: HashMap::new(),
        }
    }

    /// Document ID
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Text content
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Metadata attached by the caller or the store
    pub fn metadata(&self) -> &HashMap<String, serde_json::Value> {
        &self.metadata
    }

    /// Return a copy of this document with one more metadata entry
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Distance reported by the vector store, if any
    pub fn distance(&self) -> Option<f64> {
        self.metadata
            .get(DISTANCE_METADATA_KEY)
            .and_then(|v| v.as_f64())
    }
}
