//! State machine trait for small lifecycle enums.
//!
//! Used by the guest cycle (per-room edit state) so that every transition the
//! booking form performs is checked against one explicit table.

use super::ValidationError;

/// Trait for enums that represent state machines.
///
/// Implementors define the legal transitions and get a checked
/// `transition_to` for free.
///
/// # Example
///
/// ```ignore
/// impl StateMachine for PromptState {
///     fn can_transition_to(&self, target: &Self) -> bool {
///         matches!((self, target), (Hidden, Shown) | (Shown, Answered))
///     }
///
///     fn valid_transitions(&self) -> Vec<Self> {
///         match self {
///             Hidden => vec![Shown],
///             Shown => vec![Answered],
///             Answered => vec![],
///         }
///     }
/// }
///
/// let next = PromptState::Hidden.transition_to(PromptState::Shown)?;
/// ```
pub trait StateMachine: Sized + Copy + PartialEq + std::fmt::Debug {
    /// Returns true if transition from self to target is valid.
    fn can_transition_to(&self, target: &Self) -> bool;

    /// Returns all valid target states from current state.
    fn valid_transitions(&self) -> Vec<Self>;

    /// Performs transition with validation, returning error if invalid.
    fn transition_to(&self, target: Self) -> Result<Self, ValidationError> {
        if self.can_transition_to(&target) {
            Ok(target)
        } else {
            Err(ValidationError::invalid_format(
                "state_transition",
                format!("Cannot transition from {:?} to {:?}", self, target),
            ))
        }
    }

    /// Checks if current state is terminal (no valid outgoing transitions).
    fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum PromptState {
        Hidden,
        Shown,
        Answered,
    }

    impl StateMachine for PromptState {
        fn can_transition_to(&self, target: &Self) -> bool {
            use PromptState::*;
            matches!((self, target), (Hidden, Shown) | (Shown, Answered))
        }

        fn valid_transitions(&self) -> Vec<Self> {
            use PromptState::*;
            match self {
                Hidden => vec![Shown],
                Shown => vec![Answered],
                Answered => vec![],
            }
        }
    }

    #[test]
    fn transition_to_accepts_listed_target() {
        assert_eq!(
            PromptState::Hidden.transition_to(PromptState::Shown),
            Ok(PromptState::Shown)
        );
    }

    #[test]
    fn transition_to_rejects_skipped_state() {
        let err = PromptState::Hidden
            .transition_to(PromptState::Answered)
            .unwrap_err();
        assert!(err.to_string().contains("Cannot transition from Hidden to Answered"));
    }

    #[test]
    fn answered_is_terminal() {
        assert!(PromptState::Answered.is_terminal());
        assert!(!PromptState::Shown.is_terminal());
    }
}
