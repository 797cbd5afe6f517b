//! Document indexing and similarity retrieval

pub mod indexer;

pub use indexer::Indexer;
