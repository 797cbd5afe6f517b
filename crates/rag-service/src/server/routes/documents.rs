//! Document indexing endpoint

use axum::extract::State;

use crate::error::{Error, Result};
use crate::server::state::AppState;

/// Body returned once a document is indexed
pub const DOCUMENT_ADDED: &str = "Document Added";

/// POST /api/rag/documents - Index the raw request body as one document
pub async fn add_document(State(state): State<AppState>, body: String) -> Result<&'static str> {
    if body.trim().is_empty() {
        return Err(Error::validation("document body must not be empty"));
    }

    state.indexer().add_document(&body).await?;

    tracing::info!("Document added ({} bytes)", body.len());
    Ok(DOCUMENT_ADDED)
}
