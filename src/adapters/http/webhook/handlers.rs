//! HTTP handlers for Telegram webhook delivery.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use secrecy::{ExposeSecret, Secret};
use subtle::ConstantTimeEq;
use tokio::sync::mpsc;

use crate::adapters::telegram::Update;
use crate::ports::InboundEvent;

/// Header Telegram echoes the registered secret in.
pub const SECRET_HEADER: &str = "X-Telegram-Bot-Api-Secret-Token";

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct WebhookState {
    events: mpsc::Sender<InboundEvent>,
    secret: Option<Secret<String>>,
}

impl WebhookState {
    /// Without a `secret` every delivery is accepted.
    pub fn new(events: mpsc::Sender<InboundEvent>, secret: Option<Secret<String>>) -> Self {
        Self { events, secret }
    }

    fn authorized(&self, headers: &HeaderMap) -> bool {
        let Some(expected) = &self.secret else {
            return true;
        };
        let provided = headers
            .get(SECRET_HEADER)
            .map(|v| v.as_bytes())
            .unwrap_or_default();
        expected.expose_secret().as_bytes().ct_eq(provided).into()
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// `POST /telegram/webhook`
///
/// Unparseable updates and updates the wizard ignores are acknowledged with
/// 200 so Telegram does not redeliver them.
pub async fn receive_update(
    State(state): State<WebhookState>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    if !state.authorized(&headers) {
        tracing::warn!("Webhook delivery with wrong secret token");
        return StatusCode::UNAUTHORIZED;
    }

    let update: Update = match serde_json::from_slice(&body) {
        Ok(update) => update,
        Err(e) => {
            tracing::warn!(error = %e, "Undecodable webhook update");
            return StatusCode::OK;
        }
    };

    let Some(event) = update.into_event() else {
        return StatusCode::OK;
    };

    match state.events.send(event).await {
        Ok(()) => StatusCode::OK,
        Err(_) => {
            tracing::error!("Event channel closed, refusing webhook delivery");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

/// `GET /health`
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}
