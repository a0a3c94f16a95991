//! Per-turn dialog context.

use serde_json::{Map, Value};
use tracing::debug;

use crate::domain::prompts::PromptOptions;
use crate::domain::turn::TurnContext;

use super::dialog::DialogTurnResult;
use super::error::DialogError;
use super::instance::{ConversationState, DialogInstance, DialogStack};
use super::set::DialogSet;

/// The per-turn facade over one conversation's dialog stack.
///
/// A context is bound to exactly one turn and one stack. `begin`, `end`,
/// and `replace` are the only mutators of the stack; dialogs nest by
/// beginning children through the same context, so nesting depth equals
/// call-stack depth.
///
/// The context owns the stack for the duration of the turn. Call
/// [`commit`](Self::commit) when the turn is done to hand the stack back to
/// the conversation state before the host persists it.
pub struct DialogContext {
    dialogs: DialogSet,
    turn: TurnContext,
    stack: DialogStack,
    turn_result: DialogTurnResult,
}

impl DialogContext {
    pub(crate) fn new(dialogs: DialogSet, turn: TurnContext, stack: DialogStack) -> Self {
        let turn_result = if stack.is_empty() {
            DialogTurnResult::complete(None)
        } else {
            DialogTurnResult::active()
        };
        Self {
            dialogs,
            turn,
            stack,
            turn_result,
        }
    }

    /// The turn this context is bound to.
    pub fn turn(&self) -> &TurnContext {
        &self.turn
    }

    /// Read access to the dialog stack.
    pub fn stack(&self) -> &DialogStack {
        &self.stack
    }

    /// The current (topmost) dialog instance.
    pub fn current(&self) -> Option<&DialogInstance> {
        self.stack.current()
    }

    /// Outcome of the last operation this turn (`active` / `result`).
    pub fn turn_result(&self) -> &DialogTurnResult {
        &self.turn_result
    }

    /// Hands the stack back to the conversation state and returns the
    /// turn's final [`DialogTurnResult`].
    pub fn commit(self, state: &mut ConversationState) -> DialogTurnResult {
        state.stack = self.stack;
        self.turn_result
    }

    /// Starts a dialog: pushes a fresh instance with empty private state
    /// and invokes the dialog's begin hook with `args`.
    ///
    /// # Errors
    /// `DialogError::DialogNotFound` if `id` is not registered; failures
    /// from the begin hook propagate unchanged.
    pub async fn begin(&mut self, id: &str, args: Option<Value>) -> Result<(), DialogError> {
        let dialog = self
            .dialogs
            .find(id)
            .ok_or_else(|| DialogError::DialogNotFound(id.to_string()))?;

        debug!(dialog_id = id, depth = self.stack.depth(), "beginning dialog");
        self.stack.push(DialogInstance::new(id));
        self.turn_result = DialogTurnResult::active();
        dialog.begin_dialog(self, args).await
    }

    /// Starts a prompt dialog with the given options.
    pub async fn prompt(
        &mut self,
        id: &str,
        options: impl Into<PromptOptions>,
    ) -> Result<(), DialogError> {
        let args = serde_json::to_value(options.into())?;
        self.begin(id, Some(args)).await
    }

    /// Resumes whatever dialog is on top of the stack.
    ///
    /// An empty stack is a no-op resolving with `active = false`; no hook
    /// runs. Otherwise the top instance's dialog receives its continue
    /// hook, whose default implicitly ends the instance with no result.
    pub async fn continue_dialog(&mut self) -> Result<(), DialogError> {
        let Some(instance) = self.stack.current() else {
            self.turn_result = DialogTurnResult::complete(None);
            return Ok(());
        };

        let id = instance.id.clone();
        let dialog = self
            .dialogs
            .find(&id)
            .ok_or_else(|| DialogError::DialogNotFound(id.clone()))?;

        debug!(dialog_id = %id, depth = self.stack.depth(), "continuing dialog");
        self.turn_result = DialogTurnResult::active();
        dialog.continue_dialog(self).await
    }

    /// Ends the current dialog, handing `result` up.
    ///
    /// If a parent remains on the stack its resume hook receives `result`;
    /// this is the only channel by which a dialog learns a child's outcome.
    /// If the stack empties, `result` surfaces in the turn result instead.
    pub async fn end(&mut self, result: Option<Value>) -> Result<(), DialogError> {
        let ended = self.stack.pop();
        debug!(
            dialog_id = ended.as_ref().map(|i| i.id.as_str()).unwrap_or("<none>"),
            depth = self.stack.depth(),
            "ended dialog"
        );

        let Some(instance) = self.stack.current() else {
            self.turn_result = DialogTurnResult::complete(result);
            return Ok(());
        };

        let id = instance.id.clone();
        let dialog = self
            .dialogs
            .find(&id)
            .ok_or_else(|| DialogError::DialogNotFound(id))?;

        self.turn_result = DialogTurnResult::active();
        dialog.resume_dialog(self, result).await
    }

    /// Ends the current dialog and immediately begins `id` in its place.
    ///
    /// The parent is not resumed, so a dialog can loop back into itself (or
    /// a sibling) without unbounded stack growth.
    pub async fn replace(&mut self, id: &str, args: Option<Value>) -> Result<(), DialogError> {
        self.stack.pop();
        self.begin(id, args).await
    }

    /// Private state of the current instance.
    pub fn state(&self) -> Option<&Value> {
        self.stack.current().map(|instance| &instance.state)
    }

    /// Mutable private state of the current instance.
    pub(crate) fn state_mut(&mut self) -> Option<&mut Value> {
        self.stack.current_mut().map(|instance| &mut instance.state)
    }

    /// Replaces the private state of the current instance.
    pub fn set_state(&mut self, state: Value) -> Result<(), DialogError> {
        let instance = self.stack.current_mut().ok_or(DialogError::NoActiveDialog)?;
        instance.state = state;
        Ok(())
    }

    /// Scratch values of the current instance.
    ///
    /// Waterfall steps accumulate conversation data here, scoped to this
    /// instance and therefore to this one conversation; nothing is shared
    /// across conversations. Stored under the reserved `values` key of the
    /// instance state.
    pub fn values(&self) -> Option<&Map<String, Value>> {
        self.state()?.get("values")?.as_object()
    }

    /// Mutable scratch values of the current instance, created on first use.
    pub fn values_mut(&mut self) -> Result<&mut Map<String, Value>, DialogError> {
        let instance = self.stack.current_mut().ok_or(DialogError::NoActiveDialog)?;
        if !instance.state.is_object() {
            instance.state = Value::Object(Map::new());
        }
        let Value::Object(state) = &mut instance.state else {
            return Err(DialogError::NoActiveDialog);
        };
        let slot = state
            .entry("values")
            .or_insert_with(|| Value::Object(Map::new()));
        if !slot.is_object() {
            *slot = Value::Object(Map::new());
        }
        let Value::Object(values) = slot else {
            return Err(DialogError::NoActiveDialog);
        };
        Ok(values)
    }
}

impl std::fmt::Debug for DialogContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DialogContext")
            .field("depth", &self.stack.depth())
            .field("active", &self.turn_result.active)
            .finish()
    }
}
