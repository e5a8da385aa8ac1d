//! Axum router for webhook ingress.

use std::time::Duration;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use super::handlers::{health, receive_update, WebhookState};

/// Create the ingress router.
///
/// # Routes
/// - `POST /telegram/webhook` - Telegram update delivery (secret token checked)
/// - `GET /health` - liveness probe
pub fn webhook_router(state: WebhookState, request_timeout: Duration) -> Router {
    Router::new()
        .route("/telegram/webhook", post(receive_update))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(request_timeout))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::http::webhook::handlers::SECRET_HEADER;
    use crate::ports::InboundEvent;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use secrecy::Secret;
    use tokio::sync::mpsc;
    use tower::ServiceExt;

    const UPDATE: &str = r#"{
        "update_id": 1,
        "message": {"message_id": 5, "from": {"id": 7}, "chat": {"id": 7}, "text": "/start"}
    }"#;

    fn app(secret: Option<&str>) -> (Router, mpsc::Receiver<InboundEvent>) {
        let (tx, rx) = mpsc::channel(8);
        let state = WebhookState::new(tx, secret.map(|s| Secret::new(s.to_string())));
        (webhook_router(state, Duration::from_secs(5)), rx)
    }

    fn delivery(secret: Option<&str>, body: &str) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/telegram/webhook")
            .header("content-type", "application/json");
        if let Some(secret) = secret {
            builder = builder.header(SECRET_HEADER, secret);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    #[tokio::test]
    async fn accepted_update_is_forwarded() {
        let (app, mut rx) = app(Some("s3cret"));
        let response = app.oneshot(delivery(Some("s3cret"), UPDATE)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        match rx.recv().await {
            Some(InboundEvent::Text { text, .. }) => assert_eq!(text, "/start"),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn wrong_secret_is_rejected() {
        let (app, mut rx) = app(Some("s3cret"));
        let response = app.oneshot(delivery(Some("guess"), UPDATE)).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn missing_secret_is_rejected() {
        let (app, _rx) = app(Some("s3cret"));
        let response = app.oneshot(delivery(None, UPDATE)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn garbage_is_acknowledged() {
        let (app, mut rx) = app(None);
        let response = app.oneshot(delivery(None, "not json")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let (app, _rx) = app(None);
        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
