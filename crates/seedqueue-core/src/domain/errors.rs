//! Errors raised by entry operations.
//!
//! Both variants signal collaborator misuse. They are surfaced to the caller
//! immediately and never retried or swallowed inside the entry.

use thiserror::Error;

/// EntryError classifies the hard failures of the entry state machine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntryError {
    /// A thread-affine operation was invoked off the render thread.
    #[error("tried to {operation} off the render thread")]
    AffinityViolation { operation: &'static str },

    /// The entry is not in a state that allows the operation.
    #[error("illegal state: {0}")]
    IllegalState(String),
}

impl EntryError {
    pub fn affinity(operation: &'static str) -> Self {
        Self::AffinityViolation { operation }
    }

    pub fn illegal_state(message: impl Into<String>) -> Self {
        Self::IllegalState(message.into())
    }

    pub fn is_affinity_violation(&self) -> bool {
        matches!(self, Self::AffinityViolation { .. })
    }

    pub fn is_illegal_state(&self) -> bool {
        matches!(self, Self::IllegalState(_))
    }
}
