//! API routes for the RAG server

pub mod ask;
pub mod documents;

use axum::{
    routing::{get, post},
    Router,
};
use crate::server::state::AppState;

/// Build the `/api/rag` routes
pub fn rag_routes() -> Router<AppState> {
    Router::new()
        .route("/documents", post(documents::add_document))
        .route("/ask", get(ask::ask_question))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        Router,
    };
    use std::sync::Arc;
    use tower::ServiceExt;

    use crate::config::RagConfig;
    use crate::error::Error;
    use crate::generation::PromptBuilder;
    use crate::providers::llm::{Message, MockChatModel};
    use crate::providers::vector_store::MockVectorStore;
    use crate::server::{build_router, state::AppState};
    use crate::types::Document;

    use super::documents::DOCUMENT_ADDED;

    fn app(store: MockVectorStore, model: MockChatModel) -> Router {
        let config = RagConfig::default();
        let state = AppState::from_parts(config.clone(), Arc::new(store), Arc::new(model));
        build_router(state, &config.server)
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, String) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    fn post_document(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/rag/documents")
            .header("content-type", "text/plain")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn ask(query: &str) -> Request<Body> {
        Request::builder()
            .uri(format!("/api/rag/ask{}", query))
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_post_document_adds_and_confirms() {
        let mut store = MockVectorStore::new();
        store
            .expect_add()
            .withf(|documents: &Vec<Document>| {
                documents.len() == 1 && documents[0].content() == "Paris is the capital of France."
            })
            .times(1)
            .returning(|_| Ok(()));

        let (status, body) = send(
            app(store, MockChatModel::new()),
            post_document("Paris is the capital of France."),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, DOCUMENT_ADDED);
    }

    #[tokio::test]
    async fn test_post_document_store_failure_is_not_confirmed() {
        let mut store = MockVectorStore::new();
        store
            .expect_add()
            .times(1)
            .returning(|_| Err(Error::vector_store("connection refused")));

        let (status, body) = send(app(store, MockChatModel::new()), post_document("text")).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_ne!(body, DOCUMENT_ADDED);
        assert!(body.contains("vector_store_error"));
    }

    #[tokio::test]
    async fn test_post_blank_document_is_rejected() {
        let mut store = MockVectorStore::new();
        store.expect_add().times(0);

        let (status, body) = send(app(store, MockChatModel::new()), post_document("  \n")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains("validation_error"));
    }

    #[tokio::test]
    async fn test_ask_returns_model_answer() {
        let mut store = MockVectorStore::new();
        store
            .expect_similarity_search()
            .withf(|query: &str| query == "What is the capital of France?")
            .times(1)
            .returning(|_| Ok(vec![Document::new("Paris is the capital of France.")]));

        let mut model = MockChatModel::new();
        model
            .expect_complete()
            .withf(|messages: &[Message]| {
                messages.len() == 1
                    && messages[0].content
                        == PromptBuilder::build_qa_prompt(
                            "Paris is the capital of France.",
                            "What is the capital of France?",
                        )
            })
            .times(1)
            .returning(|_| Ok("The capital of France is Paris.".to_string()));

        let (status, body) = send(
            app(store, model),
            ask("?question=What%20is%20the%20capital%20of%20France%3F"),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "The capital of France is Paris.");
    }

    #[tokio::test]
    async fn test_ask_with_no_documents_still_calls_model() {
        let mut store = MockVectorStore::new();
        store.expect_similarity_search().returning(|_| Ok(Vec::new()));

        let mut model = MockChatModel::new();
        model
            .expect_complete()
            .withf(|messages: &[Message]| messages[0].content.contains("Context:\n\n\nQuestion:"))
            .times(1)
            .returning(|_| Ok("No idea.".to_string()));

        let (status, body) = send(app(store, model), ask("?question=Who%20am%20I")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "No idea.");
    }

    #[tokio::test]
    async fn test_ask_missing_or_blank_question_is_rejected() {
        for query in ["", "?question=", "?question=%20%20"] {
            let mut store = MockVectorStore::new();
            store.expect_similarity_search().times(0);

            let (status, body) = send(app(store, MockChatModel::new()), ask(query)).await;

            assert_eq!(status, StatusCode::BAD_REQUEST, "query {:?}", query);
            assert!(body.contains("validation_error"));
        }
    }

    #[tokio::test]
    async fn test_ask_llm_failure_maps_to_unavailable() {
        let mut store = MockVectorStore::new();
        store.expect_similarity_search().returning(|_| Ok(vec![Document::new("ctx")]));

        let mut model = MockChatModel::new();
        model
            .expect_complete()
            .returning(|_| Err(Error::llm("rate limited")));

        let (status, _) = send(app(store, model), ask("?question=hi")).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_get_on_documents_is_method_not_allowed() {
        let (status, _) = send(
            app(MockVectorStore::new(), MockChatModel::new()),
            Request::builder()
                .uri("/api/rag/documents")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(
            app(MockVectorStore::new(), MockChatModel::new()),
            Request::builder().uri("/health").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "OK");
    }
}
