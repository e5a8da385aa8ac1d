//! Long-polling ingress.
//!
//! Pulls updates with `getUpdates`, advances the offset past each one and
//! forwards the wizard's events into a channel. Failed polls back off
//! exponentially up to `MAX_BACKOFF`.

use std::time::Duration;
use tokio::sync::mpsc;

use super::client::TelegramClient;
use crate::ports::InboundEvent;

const MAX_BACKOFF: Duration = Duration::from_secs(30);

pub struct UpdatePoller {
    client: TelegramClient,
    wait: Duration,
}

impl UpdatePoller {
    /// `wait` is the long-poll duration passed to `getUpdates`.
    pub fn new(client: TelegramClient, wait: Duration) -> Self {
        Self { client, wait }
    }

    /// Polls until the receiving side of `events` is dropped.
    pub async fn run(self, events: mpsc::Sender<InboundEvent>) {
        if let Err(e) = self.client.delete_webhook().await {
            tracing::warn!(error = %e, "Failed to remove webhook before polling");
        }

        let mut offset = 0;
        let mut backoff = Duration::from_secs(1);

        loop {
            let updates = match self.client.get_updates(offset, self.wait).await {
                Ok(updates) => {
                    backoff = Duration::from_secs(1);
                    updates
                }
                Err(e) => {
                    tracing::warn!(error = %e, backoff_secs = backoff.as_secs(), "getUpdates failed");
                    tokio::time::sleep(backoff).await;
                    backoff = (backoff * 2).min(MAX_BACKOFF);
                    continue;
                }
            };

            for update in updates {
                offset = offset.max(update.update_id + 1);
                let Some(event) = update.into_event() else {
                    continue;
                };
                if events.send(event).await.is_err() {
                    tracing::info!("Event channel closed, stopping poller");
                    return;
                }
            }
        }
    }
}
