//! Wake-up call flow: schedule an alarm for the guest's room.

use futures::future::BoxFuture;
use serde_json::{json, Value};

use crate::domain::dialog::{
    CompositeDialog, DialogContext, DialogError, DialogSet, StepOutcome, WaterfallStepFn,
};
use crate::domain::prompts::{datetime_prompt, PromptOptions};

use super::guest_name;

/// Builds the wake-up call dialog.
///
/// Begun with the guest profile as args; ends with the profile extended by
/// `alarm_time` (the first resolution of the recognized time).
pub fn wake_up_dialog() -> Result<CompositeDialog, DialogError> {
    let mut dialogs = DialogSet::new();
    dialogs.add("alarmTime", datetime_prompt())?;
    let steps: Vec<WaterfallStepFn> = vec![ask_time, confirm_time];
    dialogs.add_waterfall("wakeUp", steps)?;
    Ok(CompositeDialog::new("wakeUp", dialogs))
}

fn ask_time(
    dc: &mut DialogContext,
    input: Option<Value>,
) -> BoxFuture<'_, Result<StepOutcome, DialogError>> {
    Box::pin(async move {
        let profile = input.unwrap_or(Value::Null);
        let name = guest_name(Some(&profile));
        dc.values_mut()?.insert("profile".into(), profile);
        dc.prompt(
            "alarmTime",
            PromptOptions::text(format!(
                "Hello {name}, what time would you like your alarm set for?"
            ))
            .with_retry("Please enter a time, like 7:30 am."),
        )
        .await?;
        Ok(StepOutcome::Wait)
    })
}

fn confirm_time(
    dc: &mut DialogContext,
    input: Option<Value>,
) -> BoxFuture<'_, Result<StepOutcome, DialogError>> {
    Box::pin(async move {
        let time = input
            .as_ref()
            .and_then(|resolutions| resolutions.get(0))
            .and_then(|resolution| resolution.get("value"))
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let mut profile = dc
            .values()
            .and_then(|values| values.get("profile"))
            .cloned()
            .unwrap_or_else(|| json!({}));
        let room = profile.get("room").and_then(Value::as_i64).unwrap_or_default();

        dc.turn()
            .send_activity(format!("Your alarm is set to {time} for room {room}."))
            .await?;

        if let Value::Object(map) = &mut profile {
            map.insert("alarm_time".into(), json!(time));
        }
        dc.end(Some(profile)).await?;
        Ok(StepOutcome::Wait)
    })
}
