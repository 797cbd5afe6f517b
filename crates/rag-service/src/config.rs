//! Configuration for the RAG service

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Main service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RagConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Language model / embedding backend configuration
    #[serde(default)]
    pub llm: LlmConfig,
    /// Vector store configuration
    #[serde(default)]
    pub vector_store: VectorStoreConfig,
}

impl RagConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&raw)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(raw: &str) -> Result<Self> {
        toml::from_str(raw).map_err(|e| Error::Config(format!("Invalid config: {}", e)))
    }

    /// Reject configurations the server cannot start with
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(Error::Config("server.port must be non-zero".to_string()));
        }
        if self.llm.base_url.trim().is_empty() {
            return Err(Error::Config("llm.base_url must not be empty".to_string()));
        }
        if self.llm.chat_model.trim().is_empty() || self.llm.embed_model.trim().is_empty() {
            return Err(Error::Config(
                "llm.chat_model and llm.embed_model must not be empty".to_string(),
            ));
        }
        if self.vector_store.top_k == 0 {
            return Err(Error::Config("vector_store.top_k must be at least 1".to_string()));
        }
        if self.vector_store.dimensions == 0 {
            return Err(Error::Config("vector_store.dimensions must be non-zero".to_string()));
        }
        Ok(())
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Enable CORS
    pub enable_cors: bool,
    /// Maximum request body size in bytes (default: 10MB)
    pub max_body_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            enable_cors: true,
            max_body_size: 10 * 1024 * 1024, // 10MB
        }
    }
}

/// Which model backend serves embeddings and completions
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LlmProviderKind {
    /// Local Ollama server
    #[default]
    Ollama,
    /// OpenAI or any OpenAI-compatible API
    OpenAi,
}

/// LLM configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Backend provider
    pub provider: LlmProviderKind,
    /// Base URL of the model server
    pub base_url: String,
    /// API key (OpenAI only, falls back to OPENAI_API_KEY)
    pub api_key: Option<String>,
    /// Chat/completion model name
    pub chat_model: String,
    /// Embedding model name
    pub embed_model: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Client-level retries for failed requests
    pub max_retries: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: LlmProviderKind::Ollama,
            base_url: "http://localhost:11434".to_string(),
            api_key: None,
            chat_model: "llama3.2:3b".to_string(),
            embed_model: "nomic-embed-text".to_string(),
            temperature: 0.7,
            timeout_secs: 120,
            max_retries: 0,
        }
    }
}

impl LlmConfig {
    /// API key from config, or from the OPENAI_API_KEY environment variable
    pub fn resolved_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.is_empty())
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
            .filter(|k| !k.is_empty())
    }
}

/// Vector store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorStoreConfig {
    /// Maximum documents returned per similarity search
    pub top_k: usize,
    /// Minimum cosine similarity for a match (0.0 accepts everything)
    pub similarity_threshold: f32,
    /// Embedding dimensions (must match the embedding model)
    pub dimensions: usize,
    /// Storage path for the vector database
    pub storage_path: PathBuf,
    /// HNSW M parameter (connections per layer)
    pub hnsw_m: usize,
    /// HNSW ef_construction parameter
    pub hnsw_ef_construction: usize,
    /// HNSW ef_search parameter
    pub hnsw_ef_search: usize,
    /// Capacity hint for the HNSW index
    pub max_elements: usize,
}

impl Default for VectorStoreConfig {
    fn default() -> Self {
        Self {
            top_k: 4,
            similarity_threshold: 0.0,
            dimensions: 768, // nomic-embed-text
            storage_path: Self::default_storage_path(),
            hnsw_m: 32,
            hnsw_ef_construction: 200,
            hnsw_ef_search: 100,
            max_elements: 1_000_000,
        }
    }
}

impl VectorStoreConfig {
    /// Default database location under the user's data dir
    pub fn default_storage_path() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("rag-service")
            .join("vectors.db")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = RagConfig::from_toml(
            r#"
            [server]
            port = 9090

            [llm]
            provider = "openai"
            base_url = "https://api.openai.com"
            chat_model = "gpt-4o-mini"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.llm.provider, LlmProviderKind::OpenAi);
        assert_eq!(config.llm.embed_model, "nomic-embed-text");
        assert_eq!(config.vector_store.top_k, 4);
        assert_eq!(config.vector_store.dimensions, 768);
        assert!(config.vector_store.storage_path.ends_with("rag-service/vectors.db"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_toml_is_default() {
        let config = RagConfig::from_toml("").unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.llm.max_retries, 0);
        assert_eq!(config.vector_store.similarity_threshold, 0.0);
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = RagConfig::from_toml("[server]\nport = \"eighty\"").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_validate_rejects_zero_top_k() {
        let mut config = RagConfig::default();
        config.vector_store.top_k = 0;
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_validate_rejects_zero_dimensions() {
        let mut config = RagConfig::default();
        config.vector_store.dimensions = 0;
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_validate_rejects_blank_base_url() {
        let mut config = RagConfig::default();
        config.llm.base_url = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_explicit_api_key_wins() {
        let config = LlmConfig {
            api_key: Some("sk-test".to_string()),
            ..LlmConfig::default()
        };
        assert_eq!(config.resolved_api_key().as_deref(), Some("sk-test"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rag.toml");
        std::fs::write(&path, "[vector_store]\ntop_k = 8\ndimensions = 384\n").unwrap();

        let config = RagConfig::load(&path).unwrap();
        assert_eq!(config.vector_store.top_k, 8);
        assert_eq!(config.vector_store.dimensions, 384);
        assert_eq!(config.vector_store.hnsw_m, 32);
    }

    #[test]
    fn test_load_missing_file_fails() {
        let err = RagConfig::load("/nonexistent/rag.toml").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
