//! Destination Lookup Port - resolves free text into destination candidates.

use async_trait::async_trait;

use crate::domain::search::DestinationCandidate;

/// Errors from the destination lookup service.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LookupError {
    #[error("lookup request failed: {0}")]
    Network(String),

    #[error("lookup timed out")]
    Timeout,

    #[error("malformed lookup response: {0}")]
    Parse(String),
}

/// Port for destination disambiguation.
#[async_trait]
pub trait DestinationLookup: Send + Sync {
    /// Candidates matching `query`, best match first. An unknown place yields
    /// an empty list, not an error.
    async fn lookup(&self, query: &str) -> Result<Vec<DestinationCandidate>, LookupError>;
}
