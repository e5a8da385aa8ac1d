//! Errors of one dispatched event.

use thiserror::Error;

use crate::ports::{SessionStoreError, TransportError};

/// Failure while handling an inbound event.
///
/// Invariant violations and collaborator failures that the user can be told
/// about never show up here; they are answered in the chat. What remains are
/// failures to talk to the chat at all or to load and save the session.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("chat transport failed: {0}")]
    Transport(#[from] TransportError),

    #[error("session store failed: {0}")]
    Store(#[from] SessionStoreError),
}

impl DispatchError {
    /// True when retrying the same event later could succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            DispatchError::Transport(TransportError::Network(_) | TransportError::Timeout)
                | DispatchError::Store(SessionStoreError::IoError(_) | SessionStoreError::BackendError(_))
        )
    }
}
