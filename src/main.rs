//! hotel-wizard - Telegram hotel booking bot.
//!
//! Reads configuration from `HOTEL_WIZARD__*` environment variables (and
//! `.env`), receives updates by long polling or webhook, and handles every
//! update in its own task.

use std::error::Error;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use hotel_wizard::adapters::{
    webhook_router, FileSessionStore, InMemoryHistoryLog, InMemorySessionStore,
    PostgresHistoryLog, RapidApiHotelsClient, RedisSessionStore, SystemClock, TelegramClient,
    UpdatePoller, WebhookState,
};
use hotel_wizard::application::{BookingDispatcher, SearchOrchestrator};
use hotel_wizard::config::{
    AppConfig, HistoryConfig, IngressMode, ServerConfig, StorageBackend, StorageConfig,
    ValidationError,
};
use hotel_wizard::ports::{ChatTransport, Clock, HistoryLog, SessionStore};

type BoxError = Box<dyn Error + Send + Sync>;

/// Inbound events buffered between ingress and dispatch.
const EVENT_BUFFER: usize = 256;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let config = AppConfig::load()?;
    init_tracing(&config.server);
    config.validate()?;

    let client = TelegramClient::new(config.telegram.client_config())?;
    let transport: Arc<dyn ChatTransport> = Arc::new(client.clone());
    let hotels = Arc::new(RapidApiHotelsClient::new(config.hotels.client_config())?);
    let store = session_store(&config.storage).await?;
    let history = history_log(&config.history).await?;
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let orchestrator = SearchOrchestrator::new(
        hotels.clone(),
        history.clone(),
        clock.clone(),
        config.hotels.currency.clone(),
    );
    let dispatcher = Arc::new(BookingDispatcher::new(
        transport,
        store,
        hotels,
        history,
        clock,
        orchestrator,
    ));

    let (events, mut inbox) = mpsc::channel(EVENT_BUFFER);
    match config.telegram.ingress {
        IngressMode::Polling => {
            tracing::info!("Receiving updates by long polling");
            let poller = UpdatePoller::new(client, config.telegram.poll_timeout());
            tokio::spawn(poller.run(events));
        }
        IngressMode::Webhook => {
            let url = config
                .telegram
                .webhook_url
                .as_deref()
                .ok_or(ValidationError::MissingRequired("TELEGRAM__WEBHOOK_URL"))?;
            let secret = config
                .telegram
                .webhook_secret
                .clone()
                .ok_or(ValidationError::MissingRequired("TELEGRAM__WEBHOOK_SECRET"))?;
            client.set_webhook(url, &secret).await?;

            let app = webhook_router(
                WebhookState::new(events, Some(secret)),
                config.server.request_timeout(),
            );
            let addr = config.server.socket_addr()?;
            let listener = TcpListener::bind(addr).await?;
            tracing::info!(%addr, "Webhook listener started");
            tokio::spawn(async move {
                if let Err(e) = axum::serve(listener, app).await {
                    tracing::error!(error = %e, "Webhook listener stopped");
                }
            });
        }
    }

    loop {
        tokio::select! {
            event = inbox.recv() => {
                let Some(event) = event else {
                    tracing::warn!("Ingress closed");
                    break;
                };
                let dispatcher = Arc::clone(&dispatcher);
                tokio::spawn(async move {
                    if let Err(e) = dispatcher.dispatch(event).await {
                        if e.is_transient() {
                            tracing::warn!(error = %e, "Event handling interrupted");
                        } else {
                            tracing::error!(error = %e, "Event handling failed");
                        }
                    }
                });
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Shutting down");
                break;
            }
        }
    }
    Ok(())
}

fn init_tracing(server: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&server.log_level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if server.is_production() {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn session_store(config: &StorageConfig) -> Result<Arc<dyn SessionStore>, BoxError> {
    let store: Arc<dyn SessionStore> = match config.backend {
        StorageBackend::Memory => Arc::new(InMemorySessionStore::new()),
        StorageBackend::File => Arc::new(FileSessionStore::new(&config.path)),
        StorageBackend::Redis => {
            let url = config
                .redis_url
                .as_deref()
                .ok_or(ValidationError::MissingRequired("STORAGE__REDIS_URL"))?;
            Arc::new(RedisSessionStore::connect(url).await?)
        }
    };
    tracing::info!(backend = ?config.backend, "Session store ready");
    Ok(store)
}

async fn history_log(config: &HistoryConfig) -> Result<Arc<dyn HistoryLog>, BoxError> {
    match config.database_url.as_deref().filter(|u| !u.is_empty()) {
        Some(url) => {
            let log = PostgresHistoryLog::connect(url, config.max_connections).await?;
            tracing::info!("Search history in PostgreSQL");
            Ok(Arc::new(log))
        }
        None => {
            tracing::info!("Search history in memory");
            Ok(Arc::new(InMemoryHistoryLog::new()))
        }
    }
}
