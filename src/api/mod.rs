// src/api/mod.rs
// HTTP surface for the chat core. `/chat` mirrors the library contract:
// it always answers 200 with a reply string, never an error body.

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::chat::{ChatService, ChatTurn};
use crate::keys::{KeyRotator, RotationStatus};

pub struct AppState {
    pub chat: ChatService,
    pub rotator: Arc<KeyRotator>,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    pub name: String,
    #[serde(default)]
    pub history: Vec<ChatTurn>,
}

#[derive(Debug, Serialize)]
pub struct ChatReply {
    pub reply: String,
}

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/chat", post(chat_handler))
        .route("/status", get(status_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn chat_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ChatRequest>,
) -> Json<ChatReply> {
    let reply = state
        .chat
        .respond(&request.message, &request.name, &request.history)
        .await;
    Json(ChatReply { reply })
}

async fn status_handler(State(state): State<Arc<AppState>>) -> Json<RotationStatus> {
    Json(state.rotator.status())
}

async fn health_handler() -> &'static str {
    "ok"
}
