//! Dialog registry.

use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::turn::TurnContext;

use super::context::DialogContext;
use super::dialog::Dialog;
use super::error::DialogError;
use super::instance::ConversationState;
use super::waterfall::{Waterfall, WaterfallStepFn};

/// A related set of dialogs that can all call each other.
///
/// Ids are unique within a set; registration is a startup-time concern and
/// fails synchronously on duplicates. Cloning a set is cheap (the dialogs
/// themselves are shared), which is how each per-turn context gets its own
/// handle on the registry.
#[derive(Clone, Default)]
pub struct DialogSet {
    dialogs: HashMap<String, Arc<dyn Dialog>>,
}

impl DialogSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a dialog under `id`.
    ///
    /// # Errors
    /// Returns `DialogError::DuplicateDialogId` if `id` is already taken;
    /// the prior registration is unaffected.
    pub fn add(
        &mut self,
        id: impl Into<String>,
        dialog: impl Dialog + 'static,
    ) -> Result<(), DialogError> {
        let id = id.into();
        if self.dialogs.contains_key(&id) {
            return Err(DialogError::DuplicateDialogId(id));
        }
        self.dialogs.insert(id, Arc::new(dialog));
        Ok(())
    }

    /// Registers an ordered list of step functions as a [`Waterfall`].
    pub fn add_waterfall(
        &mut self,
        id: impl Into<String>,
        steps: Vec<WaterfallStepFn>,
    ) -> Result<(), DialogError> {
        self.add(id, Waterfall::new(steps))
    }

    /// Looks up a previously registered dialog. Never fails; an unknown id
    /// simply yields `None`.
    pub fn find(&self, id: &str) -> Option<Arc<dyn Dialog>> {
        self.dialogs.get(id).cloned()
    }

    /// Number of registered dialogs.
    pub fn len(&self) -> usize {
        self.dialogs.len()
    }

    /// Returns true if nothing has been registered.
    pub fn is_empty(&self) -> bool {
        self.dialogs.is_empty()
    }

    /// Binds a per-turn [`DialogContext`] to this set and the given
    /// conversation state.
    ///
    /// The state's stack (lazily empty for a fresh conversation) moves into
    /// the context for the duration of the turn; hand it back with
    /// [`DialogContext::commit`] before persisting the state.
    pub fn create_context(
        &self,
        turn: TurnContext,
        state: &mut ConversationState,
    ) -> DialogContext {
        DialogContext::new(self.clone(), turn, std::mem::take(&mut state.stack))
    }
}

impl std::fmt::Debug for DialogSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut ids: Vec<&str> = self.dialogs.keys().map(String::as_str).collect();
        ids.sort_unstable();
        f.debug_struct("DialogSet").field("dialogs", &ids).finish()
    }
}
