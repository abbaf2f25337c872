//! Matching context passed to algorithm factories.

use crate::interrupt::CancelToken;
use crate::models::Participant;

/// Participant snapshot and cancel token for one scheduling call.
///
/// Factories read only this snapshot, so calls on different contexts are
/// independent.
#[derive(Debug, Clone, Default)]
pub struct AssignmentContext {
    /// Participant directory at call time.
    pub participants: Vec<Participant>,
    /// Polled by matching loops.
    pub cancel: CancelToken,
}

impl AssignmentContext {
    /// Creates a context over a participant snapshot.
    pub fn new(participants: Vec<Participant>) -> Self {
        Self {
            participants,
            cancel: CancelToken::new(),
        }
    }

    /// Sets the cancel token.
    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Adds a participant.
    pub fn with_participant(mut self, participant: Participant) -> Self {
        self.participants.push(participant);
        self
    }
}
