use axum::{
    body::Bytes,
    extract::{Path, State},
    Json,
};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::gitlab::events::ParsedEvent;
use crate::router::dispatch::{DeliveryReport, Dispatcher};
use crate::AppState;

pub async fn handle_webhook(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Vec<DeliveryReport>>> {
    relay(state, None, body).await
}

pub async fn handle_route_webhook(
    State(state): State<AppState>,
    Path(path): Path<String>,
    body: Bytes,
) -> Result<Json<Vec<DeliveryReport>>> {
    relay(state, Some(path), body).await
}

async fn relay(
    state: AppState,
    path: Option<String>,
    body: Bytes,
) -> Result<Json<Vec<DeliveryReport>>> {
    let route = path.as_deref().unwrap_or("/");
    debug!(route, body = %String::from_utf8_lossy(&body), "webhook received");

    let targets = state.config.routes.targets(path.as_deref());
    if targets.is_empty() {
        warn!(route, "no webhook url configured");
        return Err(Error::NoWebhookConfigured);
    }

    let event =
        ParsedEvent::from_payload(&body).map_err(|e| Error::InvalidPayload(e.to_string()))?;

    if !event.is_supported() {
        info!(route, object_kind = event.object_kind(), "ignoring unsupported event kind");
    }

    let dispatcher = Dispatcher::new(state.notifier.clone());
    let reports = dispatcher.dispatch(&event, &targets).await;

    info!(
        route,
        object_kind = event.object_kind(),
        targets = reports.len(),
        delivered = reports.iter().filter(|r| r.success).count(),
        "webhook relayed"
    );

    Ok(Json(reports))
}
