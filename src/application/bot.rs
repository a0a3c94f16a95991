//! Turn routing for the hotel concierge.

use serde_json::Value;
use tracing::debug;

use crate::domain::dialog::{ConversationState, DialogError, DialogSet};
use crate::domain::turn::TurnContext;

use super::flows::{check_in_dialog, guest_name, reserve_table_dialog, wake_up_dialog};

const CHECK_IN: &str = "checkInPrompt";
const RESERVE_TABLE: &str = "reservePrompt";
const WAKE_UP: &str = "wakeUpPrompt";

/// Key under which the guest profile lives in the conversation state.
const GUEST_INFO: &str = "guest_info";

/// The hotel concierge bot.
///
/// Routes each turn: an active dialog is resumed first; a guest without a
/// profile is checked in; otherwise the utterance is scanned for an intent
/// and the matching flow begins with the guest profile as args. Every flow
/// ends with an (extended) profile, which is stored back as `guest_info`.
pub struct ConciergeBot {
    dialogs: DialogSet,
}

impl ConciergeBot {
    /// Builds the bot with all flows registered.
    pub fn new() -> Result<Self, DialogError> {
        let mut dialogs = DialogSet::new();
        dialogs.add(CHECK_IN, check_in_dialog()?)?;
        dialogs.add(RESERVE_TABLE, reserve_table_dialog()?)?;
        dialogs.add(WAKE_UP, wake_up_dialog()?)?;
        Ok(Self { dialogs })
    }

    /// Runs one turn of conversation against the given state.
    pub async fn on_turn(
        &self,
        turn: &TurnContext,
        state: &mut ConversationState,
    ) -> Result<(), DialogError> {
        if !turn.is_message() {
            debug!(kind = ?turn.activity().kind, "ignoring non-message activity");
            return Ok(());
        }

        if !state.stack().is_empty() {
            return self.resume_active_dialog(turn, state).await;
        }

        if state.value(GUEST_INFO).is_none() {
            return self.begin_flow(turn, state, CHECK_IN, None).await;
        }

        let profile = state.value(GUEST_INFO).cloned();
        let utterance = turn.text().unwrap_or_default().to_lowercase();
        if utterance.contains("reserve table") {
            self.begin_flow(turn, state, RESERVE_TABLE, profile).await
        } else if utterance.contains("wake up") {
            self.begin_flow(turn, state, WAKE_UP, profile).await
        } else {
            let name = guest_name(profile.as_ref());
            turn.send_activity(format!(
                "Hi {name}! I can help you reserve a table or set a wake up call. \
                 Just say \"reserve table\" or \"wake up\"."
            ))
            .await?;
            Ok(())
        }
    }

    async fn resume_active_dialog(
        &self,
        turn: &TurnContext,
        state: &mut ConversationState,
    ) -> Result<(), DialogError> {
        let mut dc = self.dialogs.create_context(turn.clone(), state);
        dc.continue_dialog().await?;
        let outcome = dc.commit(state);

        if !outcome.active {
            Self::store_profile(state, outcome.result);
        }
        if !turn.responded() {
            turn.send_activity("Sorry, I don't understand.").await?;
        }
        Ok(())
    }

    async fn begin_flow(
        &self,
        turn: &TurnContext,
        state: &mut ConversationState,
        id: &str,
        args: Option<Value>,
    ) -> Result<(), DialogError> {
        debug!(dialog_id = id, "beginning flow");
        let mut dc = self.dialogs.create_context(turn.clone(), state);
        dc.begin(id, args).await?;
        let outcome = dc.commit(state);

        if !outcome.active {
            Self::store_profile(state, outcome.result);
        }
        Ok(())
    }

    fn store_profile(state: &mut ConversationState, result: Option<Value>) {
        if let Some(profile) = result {
            state.set_value(GUEST_INFO, profile);
        }
    }
}
