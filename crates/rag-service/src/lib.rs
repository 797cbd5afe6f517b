//! rag-service: minimal retrieval-augmented question answering over HTTP
//!
//! Text documents are indexed into a vector store; questions are answered by
//! retrieving similar documents, packing their text into a fixed prompt, and
//! asking a chat model. Embedding, storage and completion sit behind the
//! traits in [`providers`].

pub mod config;
pub mod error;
pub mod generation;
pub mod providers;
pub mod retrieval;
pub mod server;
pub mod types;

pub use config::RagConfig;
pub use error::{Error, Result};
pub use generation::Answerer;
pub use retrieval::Indexer;
pub use types::Document;
