pub mod config;
pub mod error;
pub mod gitlab;
pub mod message;
pub mod platform;
pub mod router;

use crate::config::Config;
use crate::gitlab::webhook::{handle_route_webhook, handle_webhook};
use crate::platform::client::Notifier;
use axum::{
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub notifier: Arc<dyn Notifier>,
}

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "service": "labhook",
        "version": VERSION
    }))
}

pub async fn root() -> &'static str {
    "labhook - GitLab → WeCom / Feishu"
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(root).post(handle_webhook))
        .route("/health", get(health))
        .route("/{path}", post(handle_route_webhook))
        .with_state(state)
}
