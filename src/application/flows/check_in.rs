//! Check-in flow: collect the guest's name and room number.

use std::sync::Arc;

use futures::future::BoxFuture;
use serde_json::{json, Value};

use crate::domain::dialog::{
    CompositeDialog, DialogContext, DialogError, DialogSet, StepOutcome, WaterfallStepFn,
};
use crate::domain::prompts::{number_prompt, PromptOptions, PromptValidator};

/// Builds the check-in dialog.
///
/// Ends with the guest profile `{ user_name, room }`, which the bot stores
/// for later flows to greet the guest by name and room.
pub fn check_in_dialog() -> Result<CompositeDialog, DialogError> {
    let mut dialogs = DialogSet::new();
    dialogs.add(
        "roomNumber",
        number_prompt().with_validator(room_range_validator()),
    )?;
    let steps: Vec<WaterfallStepFn> = vec![ask_name, ask_room, complete];
    dialogs.add_waterfall("checkIn", steps)?;
    Ok(CompositeDialog::new("checkIn", dialogs))
}

/// Accepts whole room numbers between 1 and 100; anything else falls back
/// to the prompt's retry text.
fn room_range_validator() -> PromptValidator {
    Arc::new(|_turn, value| {
        Box::pin(async move {
            let room = value.as_ref().and_then(Value::as_i64);
            match room {
                Some(room) if (1..=100).contains(&room) => Ok(Some(json!(room))),
                _ => Ok(None),
            }
        })
    })
}

fn ask_name(
    dc: &mut DialogContext,
    _input: Option<Value>,
) -> BoxFuture<'_, Result<StepOutcome, DialogError>> {
    Box::pin(async move {
        dc.turn().send_activity("What is your name?").await?;
        Ok(StepOutcome::Wait)
    })
}

fn ask_room(
    dc: &mut DialogContext,
    input: Option<Value>,
) -> BoxFuture<'_, Result<StepOutcome, DialogError>> {
    Box::pin(async move {
        let name = input
            .as_ref()
            .and_then(Value::as_str)
            .unwrap_or_default()
            .trim()
            .to_string();
        dc.values_mut()?.insert("user_name".into(), json!(name));
        dc.prompt(
            "roomNumber",
            PromptOptions::text(format!("Hi {name}. What room will you be staying in?"))
                .with_retry("Please enter a room number between 1 and 100."),
        )
        .await?;
        Ok(StepOutcome::Wait)
    })
}

fn complete(
    dc: &mut DialogContext,
    input: Option<Value>,
) -> BoxFuture<'_, Result<StepOutcome, DialogError>> {
    Box::pin(async move {
        let room = input.as_ref().and_then(Value::as_i64).unwrap_or_default();
        let name = dc
            .values()
            .and_then(|values| values.get("user_name"))
            .cloned()
            .unwrap_or(json!(""));

        dc.turn()
            .send_activity(format!(
                "Great, you are checked in. Enjoy your stay in room {room}!"
            ))
            .await?;
        dc.end(Some(json!({ "user_name": name, "room": room }))).await?;
        Ok(StepOutcome::Wait)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::http::BufferingSender;
    use crate::domain::dialog::ConversationState;
    use crate::domain::turn::{Activity, TurnContext};

    fn harness() -> (DialogSet, ConversationState, Arc<BufferingSender>) {
        let mut dialogs = DialogSet::new();
        dialogs.add("checkInPrompt", check_in_dialog().unwrap()).unwrap();
        (dialogs, ConversationState::new(), Arc::new(BufferingSender::new()))
    }

    async fn say(
        dialogs: &DialogSet,
        state: &mut ConversationState,
        sender: &Arc<BufferingSender>,
        text: &str,
    ) -> crate::domain::dialog::DialogTurnResult {
        let turn = TurnContext::new(Activity::message(text), sender.clone());
        let mut dc = dialogs.create_context(turn, state);
        if dc.stack().is_empty() {
            dc.begin("checkInPrompt", None).await.unwrap();
        } else {
            dc.continue_dialog().await.unwrap();
        }
        dc.commit(state)
    }

    #[tokio::test]
    async fn happy_path_collects_name_and_room() {
        let (dialogs, mut state, sender) = harness();

        say(&dialogs, &mut state, &sender, "hello").await;
        assert_eq!(sender.drain()[0].text, "What is your name?");

        say(&dialogs, &mut state, &sender, "Lee").await;
        assert_eq!(sender.drain()[0].text, "Hi Lee. What room will you be staying in?");

        let outcome = say(&dialogs, &mut state, &sender, "42").await;
        assert!(!outcome.active);
        assert_eq!(
            outcome.result,
            Some(json!({ "user_name": "Lee", "room": 42 }))
        );
        assert!(sender.drain()[0].text.contains("room 42"));
    }

    #[tokio::test]
    async fn out_of_range_room_retries_until_valid() {
        let (dialogs, mut state, sender) = harness();
        say(&dialogs, &mut state, &sender, "hello").await;
        say(&dialogs, &mut state, &sender, "Lee").await;
        sender.drain();

        let outcome = say(&dialogs, &mut state, &sender, "400").await;
        assert!(outcome.active);
        assert_eq!(
            sender.drain()[0].text,
            "Please enter a room number between 1 and 100."
        );

        let outcome = say(&dialogs, &mut state, &sender, "40").await;
        assert!(!outcome.active);
        assert_eq!(outcome.result, Some(json!({ "user_name": "Lee", "room": 40 })));
    }

    #[tokio::test]
    async fn non_numeric_room_retries() {
        let (dialogs, mut state, sender) = harness();
        say(&dialogs, &mut state, &sender, "hello").await;
        say(&dialogs, &mut state, &sender, "Lee").await;
        sender.drain();

        let outcome = say(&dialogs, &mut state, &sender, "the penthouse").await;
        assert!(outcome.active);
        assert_eq!(
            sender.drain()[0].text,
            "Please enter a room number between 1 and 100."
        );
    }
}
