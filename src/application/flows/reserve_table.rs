//! Table reservation flow: pick one of the restaurant's six tables.

use futures::future::BoxFuture;
use serde_json::{json, Value};

use crate::domain::dialog::{
    CompositeDialog, DialogContext, DialogError, DialogSet, StepOutcome, WaterfallStepFn,
};
use crate::domain::prompts::{choice_prompt, PromptOptions};

use super::guest_name;

const TABLES: [&str; 6] = ["1", "2", "3", "4", "5", "6"];

/// Builds the table reservation dialog.
///
/// Begun with the guest profile as args; ends with the profile extended by
/// `table_number`.
pub fn reserve_table_dialog() -> Result<CompositeDialog, DialogError> {
    let mut dialogs = DialogSet::new();
    dialogs.add("tableChoice", choice_prompt())?;
    let steps: Vec<WaterfallStepFn> = vec![ask_table, confirm_table];
    dialogs.add_waterfall("reserveTable", steps)?;
    Ok(CompositeDialog::new("reserveTable", dialogs))
}

fn ask_table(
    dc: &mut DialogContext,
    input: Option<Value>,
) -> BoxFuture<'_, Result<StepOutcome, DialogError>> {
    Box::pin(async move {
        let profile = input.unwrap_or(Value::Null);
        let name = guest_name(Some(&profile));
        dc.values_mut()?.insert("profile".into(), profile);
        dc.prompt(
            "tableChoice",
            PromptOptions::text(format!(
                "Welcome {name}, which table would you like to reserve?"
            ))
            .with_choices(TABLES)
            .with_retry("Please choose a table between 1 and 6."),
        )
        .await?;
        Ok(StepOutcome::Wait)
    })
}

fn confirm_table(
    dc: &mut DialogContext,
    input: Option<Value>,
) -> BoxFuture<'_, Result<StepOutcome, DialogError>> {
    Box::pin(async move {
        let table = input
            .as_ref()
            .and_then(|choice| choice.get("value"))
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        dc.turn()
            .send_activity(format!(
                "Sounds great; we will reserve table number {table} for you."
            ))
            .await?;

        let mut profile = dc
            .values()
            .and_then(|values| values.get("profile"))
            .cloned()
            .unwrap_or_else(|| json!({}));
        if let Value::Object(map) = &mut profile {
            map.insert("table_number".into(), json!(table));
        }
        dc.end(Some(profile)).await?;
        Ok(StepOutcome::Wait)
    })
}
