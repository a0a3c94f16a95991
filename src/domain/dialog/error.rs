//! Error types for the dialog engine.

use thiserror::Error;

use crate::ports::SendError;

/// Errors raised by the dialog engine.
///
/// Failures thrown by host-supplied step, validator, or render code are
/// never swallowed: they propagate out of `begin`/`continue_dialog`/`end`
/// and abort the turn. State written by earlier steps stays written; there
/// is no transactional guarantee.
#[derive(Debug, Error)]
pub enum DialogError {
    /// `DialogSet::add` was called twice with the same id. The first
    /// registration stays intact.
    #[error("a dialog with id '{0}' is already registered")]
    DuplicateDialogId(String),

    /// `begin`/`continue_dialog` referenced an unregistered id.
    #[error("no dialog registered with id '{0}'")]
    DialogNotFound(String),

    /// An operation needed a current dialog instance but the stack is empty.
    #[error("no dialog instance is active on the stack")]
    NoActiveDialog,

    /// A dialog instance's private state failed to (de)serialize.
    #[error("dialog state error: {0}")]
    State(#[from] serde_json::Error),

    /// A host-supplied step or validator failed.
    #[error("step execution failed: {0}")]
    Step(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Outbound delivery failed inside a render hook or step.
    #[error("outbound send failed: {0}")]
    Send(#[from] SendError),
}

impl DialogError {
    /// Wraps a host-side failure as a step execution error.
    pub fn step(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        DialogError::Step(source.into())
    }
}
