//! Sequential multi-step dialogs.

use async_trait::async_trait;
use futures::future::BoxFuture;
use serde_json::{json, Value};
use tracing::debug;

use super::context::DialogContext;
use super::dialog::Dialog;
use super::error::DialogError;

/// What a waterfall step decided about turn flow.
pub enum StepOutcome {
    /// The step is waiting on the user (it began a prompt or child dialog,
    /// or simply wants the next activity). The turn ends here.
    Wait,

    /// Skip straight to the next step within the same turn, handing it the
    /// given value as its input. Only valid when the step began nothing.
    Skip(Option<Value>),
}

/// One step of a waterfall.
///
/// `input` is the begin args for step 0, the user's message text for a step
/// entered via a new activity, the finished child's result for a step
/// entered via resume, or the skipped value for a step entered via
/// [`StepOutcome::Skip`].
pub type WaterfallStepFn =
    for<'a> fn(&'a mut DialogContext, Option<Value>) -> BoxFuture<'a, Result<StepOutcome, DialogError>>;

/// A dialog that runs an ordered list of steps, one per resumption.
///
/// The cursor (index of the last step run) lives in the instance's private
/// state, so a conversation parks mid-sequence across process restarts.
/// Advancing past the last step ends the dialog, forwarding that
/// resumption's input value up as the waterfall's result.
pub struct Waterfall {
    steps: Vec<WaterfallStepFn>,
}

impl Waterfall {
    /// Creates a waterfall over the given steps.
    pub fn new(steps: Vec<WaterfallStepFn>) -> Self {
        Self { steps }
    }

    fn cursor(dc: &DialogContext) -> usize {
        dc.state()
            .and_then(|state| state.get("step"))
            .and_then(Value::as_u64)
            .unwrap_or(0) as usize
    }

    fn write_cursor(dc: &mut DialogContext, index: usize) -> Result<(), DialogError> {
        let state = dc.state_mut().ok_or(DialogError::NoActiveDialog)?;
        if let Value::Object(map) = state {
            map.insert("step".into(), json!(index));
        } else {
            *state = json!({ "step": index });
        }
        Ok(())
    }

    /// Runs steps starting at `index`, following skips, until a step waits
    /// or the sequence is exhausted.
    async fn run_from(
        &self,
        dc: &mut DialogContext,
        mut index: usize,
        mut input: Option<Value>,
    ) -> Result<(), DialogError> {
        loop {
            if index >= self.steps.len() {
                debug!(steps = self.steps.len(), "waterfall exhausted, ending");
                return dc.end(input).await;
            }
            Self::write_cursor(dc, index)?;
            debug!(step = index, "running waterfall step");
            match self.steps[index](dc, input).await? {
                StepOutcome::Wait => return Ok(()),
                StepOutcome::Skip(value) => {
                    index += 1;
                    input = value;
                }
            }
        }
    }
}

#[async_trait]
impl Dialog for Waterfall {
    async fn begin_dialog(
        &self,
        dc: &mut DialogContext,
        args: Option<Value>,
    ) -> Result<(), DialogError> {
        dc.set_state(json!({ "step": 0 }))?;
        self.run_from(dc, 0, args).await
    }

    async fn continue_dialog(&self, dc: &mut DialogContext) -> Result<(), DialogError> {
        // Non-message activities never advance a parked sequence.
        if !dc.turn().is_message() {
            return Ok(());
        }
        let next = Self::cursor(dc) + 1;
        let input = dc.turn().text().map(|text| Value::String(text.to_string()));
        self.run_from(dc, next, input).await
    }

    async fn resume_dialog(
        &self,
        dc: &mut DialogContext,
        result: Option<Value>,
    ) -> Result<(), DialogError> {
        let next = Self::cursor(dc) + 1;
        self.run_from(dc, next, result).await
    }
}
