//! Webhook ingress: Telegram pushes updates over HTTPS.

mod handlers;
mod routes;

pub use handlers::{WebhookState, SECRET_HEADER};
pub use routes::webhook_router;
