//! Test utilities for outlay-core
//!
//! Provides a mock provider server speaking just enough of the Messages API
//! for integration tests: point `AnthropicBackend` at [`MockProviderServer::url`]
//! and it will receive a canned reply or a scripted failure.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;

/// What the mock server should do with every request
#[derive(Clone)]
enum Behavior {
    /// Reply with this text in a well-formed Messages API envelope
    Reply(String),
    /// Fail with this HTTP status
    Fail(u16),
}

/// Mock Messages API server for testing
pub struct MockProviderServer {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockProviderServer {
    /// Start a server that answers every completion with `reply`
    pub async fn start(reply: impl Into<String>) -> Self {
        Self::start_with(Behavior::Reply(reply.into())).await
    }

    /// Start a server that fails every completion with `status`
    pub async fn start_failing(status: u16) -> Self {
        Self::start_with(Behavior::Fail(status)).await
    }

    async fn start_with(behavior: Behavior) -> Self {
        let app = Router::new()
            .route("/v1/messages", post(handle_messages))
            .with_state(Arc::new(behavior));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Get the base URL for this mock server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockProviderServer {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn handle_messages(
    State(behavior): State<Arc<Behavior>>,
    Json(request): Json<MessagesRequest>,
) -> Response {
    match behavior.as_ref() {
        Behavior::Reply(text) => Json(MessagesResponse {
            id: "msg_mock".to_string(),
            response_type: "message".to_string(),
            role: "assistant".to_string(),
            content: vec![ContentBlock {
                block_type: "text".to_string(),
                text: text.clone(),
            }],
            model: request.model,
            stop_reason: "end_turn".to_string(),
        })
        .into_response(),
        Behavior::Fail(status) => (
            StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            Json(serde_json::json!({
                "type": "error",
                "error": {"type": "api_error", "message": "mock failure"}
            })),
        )
            .into_response(),
    }
}

// Request/Response types for the mock server

#[derive(Debug, Deserialize)]
struct MessagesRequest {
    model: String,
    #[allow(dead_code)]
    max_tokens: u32,
    #[allow(dead_code)]
    #[serde(default)]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
struct MessagesResponse {
    id: String,
    #[serde(rename = "type")]
    response_type: String,
    role: String,
    content: Vec<ContentBlock>,
    model: String,
    stop_reason: String,
}

#[derive(Debug, Serialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    text: String,
}
