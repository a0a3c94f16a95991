//! The dialog capability trait.

use async_trait::async_trait;
use serde_json::Value;

use super::context::DialogContext;
use super::error::DialogError;

/// Outcome of the stack after a turn's operation.
///
/// `active` is false exactly when the stack is empty after the operation;
/// `result` carries the value the outermost dialog handed up when it ended.
#[derive(Debug, Clone, PartialEq)]
pub struct DialogTurnResult {
    /// True while at least one dialog remains on the stack.
    pub active: bool,

    /// Result of the dialog that emptied the stack, if any.
    pub result: Option<Value>,
}

impl DialogTurnResult {
    pub(crate) fn active() -> Self {
        Self {
            active: true,
            result: None,
        }
    }

    pub(crate) fn complete(result: Option<Value>) -> Self {
        Self {
            active: false,
            result,
        }
    }
}

/// A reusable unit of conversation.
///
/// Each hook receives the per-turn [`DialogContext`] and drives the stack
/// through it. `continue_dialog` and `resume_dialog` are declared
/// capabilities with "end with result" defaults rather than optionally
/// present methods: a dialog that does not override `continue_dialog` is
/// implicitly ended on the user's next activity, its parent resuming with
/// no result, and a dialog that does not override `resume_dialog` forwards
/// a finished child's result straight to its own parent. Both defaults are
/// normal flow, not errors.
#[async_trait]
pub trait Dialog: Send + Sync {
    /// Called when a new instance of the dialog has been pushed onto the
    /// stack and is being activated. `args` are the values passed to
    /// `DialogContext::begin`.
    async fn begin_dialog(
        &self,
        dc: &mut DialogContext,
        args: Option<Value>,
    ) -> Result<(), DialogError>;

    /// Called when this dialog is current and a new activity arrived.
    async fn continue_dialog(&self, dc: &mut DialogContext) -> Result<(), DialogError> {
        dc.end(None).await
    }

    /// Called when a dialog this instance began has ended; `result` is the
    /// value the child handed up.
    async fn resume_dialog(
        &self,
        dc: &mut DialogContext,
        result: Option<Value>,
    ) -> Result<(), DialogError> {
        dc.end(result).await
    }
}
