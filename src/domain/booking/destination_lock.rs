//! Destination lock - guards the interval between typing a destination and
//! picking one of its disambiguation candidates.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::MessageId;
use crate::domain::search::DestinationCandidate;

/// Held while a disambiguation list is waiting for a choice.
///
/// Free text arriving while the lock is held is not routed to a handler;
/// its message id is queued here and deleted once a destination is picked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DestinationLock {
    prompt: Option<MessageId>,
    candidates: Vec<DestinationCandidate>,
    pending: Vec<MessageId>,
}

impl DestinationLock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes the lock for the disambiguation list shown in `prompt`.
    pub fn hold(&mut self, prompt: MessageId, candidates: Vec<DestinationCandidate>) {
        self.prompt = Some(prompt);
        self.candidates = candidates;
    }

    pub fn is_held(&self) -> bool {
        self.prompt.is_some()
    }

    /// The open disambiguation prompt.
    pub fn prompt(&self) -> Option<MessageId> {
        self.prompt
    }

    pub fn pending(&self) -> &[MessageId] {
        &self.pending
    }

    /// Queues a message for deletion once the lock is released.
    pub fn queue(&mut self, message: MessageId) {
        if !self.pending.contains(&message) {
            self.pending.push(message);
        }
    }

    /// Releases the lock and hands back every queued message.
    pub fn release(&mut self) -> Vec<MessageId> {
        self.prompt = None;
        self.candidates.clear();
        std::mem::take(&mut self.pending)
    }

    /// A lookup found nothing: no list to pick from, but queued messages stay
    /// queued until a later lookup resolves.
    pub fn lookup_failed(&mut self) {
        self.prompt = None;
        self.candidates.clear();
    }

    /// Display name of the candidate with `id`.
    pub fn candidate_name(&self, id: &str) -> Option<&str> {
        self.candidates
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.name.as_str())
    }
}
