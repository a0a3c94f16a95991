//! Packaging a multi-dialog flow as a single reusable dialog.

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use super::context::DialogContext;
use super::dialog::Dialog;
use super::error::DialogError;
use super::instance::ConversationState;
use super::set::DialogSet;

/// A dialog backed by its own private [`DialogSet`].
///
/// The composite keeps a nested conversation state (sub-stack included)
/// inside its own instance state on the outer stack, so the host sees one
/// opaque dialog while an arbitrary flow of prompts and waterfalls runs
/// within. When the inner root flow finishes, the composite ends on the
/// outer stack with the inner result.
pub struct CompositeDialog {
    dialogs: DialogSet,
    root_id: String,
}

impl CompositeDialog {
    /// Wraps `dialogs`, entering at `root_id` when begun.
    pub fn new(root_id: impl Into<String>, dialogs: DialogSet) -> Self {
        Self {
            dialogs,
            root_id: root_id.into(),
        }
    }

    fn load_inner(&self, dc: &DialogContext) -> Result<ConversationState, DialogError> {
        match dc.state() {
            Some(state) if !state.is_null() => Ok(serde_json::from_value(state.clone())?),
            _ => Ok(ConversationState::new()),
        }
    }

    fn store_inner(
        &self,
        dc: &mut DialogContext,
        inner: ConversationState,
    ) -> Result<(), DialogError> {
        dc.set_state(serde_json::to_value(inner)?)
    }
}

#[async_trait]
impl Dialog for CompositeDialog {
    async fn begin_dialog(
        &self,
        dc: &mut DialogContext,
        args: Option<Value>,
    ) -> Result<(), DialogError> {
        let mut inner = ConversationState::new();
        let mut inner_dc = self.dialogs.create_context(dc.turn().clone(), &mut inner);
        inner_dc.begin(&self.root_id, args).await?;
        let outcome = inner_dc.commit(&mut inner);

        debug!(root = %self.root_id, active = outcome.active, "composite began");
        self.store_inner(dc, inner)?;
        if outcome.active {
            Ok(())
        } else {
            dc.end(outcome.result).await
        }
    }

    async fn continue_dialog(&self, dc: &mut DialogContext) -> Result<(), DialogError> {
        let mut inner = self.load_inner(dc)?;
        let mut inner_dc = self.dialogs.create_context(dc.turn().clone(), &mut inner);
        inner_dc.continue_dialog().await?;
        let outcome = inner_dc.commit(&mut inner);

        self.store_inner(dc, inner)?;
        if outcome.active {
            Ok(())
        } else {
            debug!(root = %self.root_id, "composite finished");
            dc.end(outcome.result).await
        }
    }
}
