//! Question answering endpoint

use axum::extract::{Query, State};
use serde::Deserialize;
use std::time::Instant;

use crate::error::{Error, Result};
use crate::server::state::AppState;

/// Query string for `/ask`
#[derive(Debug, Deserialize)]
pub struct AskParams {
    /// The question to answer
    pub question: Option<String>,
}

/// GET /api/rag/ask?question=... - Answer a question from indexed documents
pub async fn ask_question(
    State(state): State<AppState>,
    Query(params): Query<AskParams>,
) -> Result<String> {
    let question = params
        .question
        .filter(|q| !q.trim().is_empty())
        .ok_or_else(|| Error::validation("query parameter 'question' is required"))?;

    let start = Instant::now();
    tracing::info!("Question: \"{}\"", question);

    let answer = state.answerer().ask_question(&question).await?;

    tracing::info!("Answered in {}ms", start.elapsed().as_millis());
    Ok(answer)
}
