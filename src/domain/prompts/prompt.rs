//! The generic prompt dialog shared by every prompt kind.

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use crate::domain::dialog::{Dialog, DialogContext, DialogError};
use crate::domain::turn::TurnContext;
use crate::ports::OutgoingMessage;

/// Rendering and retry configuration passed when a prompt is begun.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PromptOptions {
    /// Text sent when the prompt activates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,

    /// Spoken form of the initial prompt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speak: Option<String>,

    /// Text sent when a reply fails to recognize or validate. Falls back
    /// to the initial prompt text when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_prompt: Option<String>,

    /// Spoken form of the retry message. Falls back to `speak` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_speak: Option<String>,

    /// Candidate titles for a choice prompt; ignored by other prompt kinds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub choices: Option<Vec<String>>,
}

impl PromptOptions {
    /// Options with just an initial prompt text.
    pub fn text(prompt: impl Into<String>) -> Self {
        Self {
            prompt: Some(prompt.into()),
            ..Self::default()
        }
    }

    /// Sets the retry text.
    pub fn with_retry(mut self, retry: impl Into<String>) -> Self {
        self.retry_prompt = Some(retry.into());
        self
    }

    /// Sets the spoken form.
    pub fn with_speak(mut self, speak: impl Into<String>) -> Self {
        self.speak = Some(speak.into());
        self
    }

    /// Sets the spoken form of the retry message.
    pub fn with_retry_speak(mut self, retry_speak: impl Into<String>) -> Self {
        self.retry_speak = Some(retry_speak.into());
        self
    }

    /// Sets the candidate choices.
    pub fn with_choices<I, S>(mut self, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.choices = Some(choices.into_iter().map(Into::into).collect());
        self
    }
}

impl From<&str> for PromptOptions {
    fn from(prompt: &str) -> Self {
        Self::text(prompt)
    }
}

impl From<String> for PromptOptions {
    fn from(prompt: String) -> Self {
        Self::text(prompt)
    }
}

/// Extracts a typed value from the user's reply, or `None` when the reply
/// does not parse as this prompt's type.
pub trait PromptRecognizer: Send + Sync {
    fn recognize(&self, turn: &TurnContext, options: &PromptOptions) -> Option<Value>;
}

/// Host-supplied acceptance check run after recognition.
///
/// Receives the turn and the recognizer's output (`None` when recognition
/// failed). Resolving `Ok(Some(value))` completes the prompt with `value`,
/// `Ok(None)` keeps it waiting for another reply, and `Err` aborts the
/// turn. A validator that sends its own feedback suppresses the prompt's
/// built-in retry message for that turn.
pub type PromptValidator = Arc<
    dyn Fn(TurnContext, Option<Value>) -> BoxFuture<'static, Result<Option<Value>, DialogError>>
        + Send
        + Sync,
>;

/// A dialog that asks a question, waits for a reply, and retries until a
/// reply recognizes (and validates, when a validator is set).
///
/// The options given at begin time are persisted in the instance state, so
/// retry turns re-render faithfully after a process restart.
pub struct Prompt<R> {
    recognizer: R,
    validator: Option<PromptValidator>,
}

impl<R: PromptRecognizer> Prompt<R> {
    /// Creates a prompt over the given recognizer, with no validator.
    pub fn new(recognizer: R) -> Self {
        Self {
            recognizer,
            validator: None,
        }
    }

    /// Attaches an acceptance check.
    pub fn with_validator(mut self, validator: PromptValidator) -> Self {
        self.validator = Some(validator);
        self
    }

    fn options(dc: &DialogContext) -> Result<PromptOptions, DialogError> {
        let value = dc
            .state()
            .and_then(|state| state.get("options"))
            .cloned()
            .unwrap_or(Value::Null);
        if value.is_null() {
            return Ok(PromptOptions::default());
        }
        Ok(serde_json::from_value(value)?)
    }

    async fn render(
        dc: &DialogContext,
        options: &PromptOptions,
        retry: bool,
    ) -> Result<(), DialogError> {
        let (text, speak) = if retry {
            (
                options.retry_prompt.as_deref().or(options.prompt.as_deref()),
                options.retry_speak.as_deref().or(options.speak.as_deref()),
            )
        } else {
            (options.prompt.as_deref(), options.speak.as_deref())
        };
        let Some(text) = text else {
            return Ok(());
        };

        let mut message = OutgoingMessage::text(compose_prompt(text, options));
        if let Some(speak) = speak {
            message = message.with_speak(speak.to_string());
        }
        dc.turn().send(message).await?;
        Ok(())
    }
}

/// Appends a numbered choice list to the prompt text when choices are set.
fn compose_prompt(text: &str, options: &PromptOptions) -> String {
    match &options.choices {
        Some(choices) if !choices.is_empty() => {
            let mut body = String::from(text);
            for (index, choice) in choices.iter().enumerate() {
                body.push_str(&format!("\n{}. {}", index + 1, choice));
            }
            body
        }
        _ => text.to_string(),
    }
}

#[async_trait]
impl<R: PromptRecognizer + 'static> Dialog for Prompt<R> {
    async fn begin_dialog(
        &self,
        dc: &mut DialogContext,
        args: Option<Value>,
    ) -> Result<(), DialogError> {
        let options: PromptOptions = match args {
            Some(value) => serde_json::from_value(value)?,
            None => PromptOptions::default(),
        };
        dc.set_state(json!({ "options": options }))?;
        Self::render(dc, &options, false).await
    }

    async fn continue_dialog(&self, dc: &mut DialogContext) -> Result<(), DialogError> {
        if !dc.turn().is_message() {
            return Ok(());
        }
        let options = Self::options(dc)?;
        let recognized = self.recognizer.recognize(dc.turn(), &options);

        match &self.validator {
            Some(validator) => {
                let sent_before = dc.turn().sent_count();
                match validator(dc.turn().clone(), recognized).await? {
                    Some(value) => dc.end(Some(value)).await,
                    None => {
                        // A validator that already sent feedback owns the
                        // retry message for this turn.
                        if dc.turn().sent_count() == sent_before {
                            Self::render(dc, &options, true).await?;
                        }
                        debug!("prompt reply rejected by validator, waiting");
                        Ok(())
                    }
                }
            }
            None => match recognized {
                Some(value) => dc.end(Some(value)).await,
                None => {
                    Self::render(dc, &options, true).await?;
                    debug!("prompt reply not recognized, waiting");
                    Ok(())
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::http::BufferingSender;
    use crate::domain::dialog::{ConversationState, DialogSet};
    use crate::domain::turn::{Activity, ActivityKind};

    /// Recognizes replies containing "yes"; everything else fails.
    pub(super) struct YesRecognizer;

    impl PromptRecognizer for YesRecognizer {
        fn recognize(&self, turn: &TurnContext, _options: &PromptOptions) -> Option<Value> {
            let text = turn.text()?;
            text.to_lowercase().contains("yes").then(|| json!(true))
        }
    }

    fn harness() -> (DialogSet, ConversationState, Arc<BufferingSender>) {
        let mut dialogs = DialogSet::new();
        dialogs.add("confirm", Prompt::new(YesRecognizer)).unwrap();
        (dialogs, ConversationState::new(), Arc::new(BufferingSender::new()))
    }

    fn turn_on(sender: &Arc<BufferingSender>, activity: Activity) -> TurnContext {
        TurnContext::new(activity, sender.clone())
    }

    async fn begin(
        dialogs: &DialogSet,
        state: &mut ConversationState,
        sender: &Arc<BufferingSender>,
        options: PromptOptions,
    ) {
        let mut dc = dialogs.create_context(turn_on(sender, Activity::message("hi")), state);
        dc.prompt("confirm", options).await.unwrap();
        dc.commit(state);
    }

    mod rendering {
        use super::*;

        #[tokio::test]
        async fn begin_sends_the_prompt_text() {
            let (dialogs, mut state, sender) = harness();
            begin(&dialogs, &mut state, &sender, PromptOptions::text("Continue?")).await;

            let sent = sender.drain();
            assert_eq!(sent.len(), 1);
            assert_eq!(sent[0].text, "Continue?");
        }

        #[tokio::test]
        async fn speak_rides_along_on_the_initial_prompt() {
            let (dialogs, mut state, sender) = harness();
            begin(
                &dialogs,
                &mut state,
                &sender,
                PromptOptions::text("Continue?").with_speak("Shall we continue?"),
            )
            .await;

            let sent = sender.drain();
            assert_eq!(sent[0].speak.as_deref(), Some("Shall we continue?"));
        }

        #[tokio::test]
        async fn choices_render_as_a_numbered_list() {
            let options = PromptOptions::text("Pick one").with_choices(["red", "blue"]);
            assert_eq!(compose_prompt("Pick one", &options), "Pick one\n1. red\n2. blue");
        }
    }

    mod retry {
        use super::*;

        #[tokio::test]
        async fn unrecognized_reply_sends_the_retry_text_and_stays_active() {
            let (dialogs, mut state, sender) = harness();
            begin(
                &dialogs,
                &mut state,
                &sender,
                PromptOptions::text("Continue?").with_retry("Please say yes."),
            )
            .await;
            sender.drain();

            let mut dc =
                dialogs.create_context(turn_on(&sender, Activity::message("maybe")), &mut state);
            dc.continue_dialog().await.unwrap();

            let outcome = dc.commit(&mut state);
            assert!(outcome.active);
            let sent = sender.drain();
            assert_eq!(sent.len(), 1);
            assert_eq!(sent[0].text, "Please say yes.");
        }

        #[tokio::test]
        async fn retry_speak_rides_along_on_the_retry_message() {
            let (dialogs, mut state, sender) = harness();
            begin(
                &dialogs,
                &mut state,
                &sender,
                PromptOptions::text("Continue?")
                    .with_speak("Shall we continue?")
                    .with_retry("Please say yes.")
                    .with_retry_speak("I did not catch that."),
            )
            .await;
            sender.drain();

            let mut dc =
                dialogs.create_context(turn_on(&sender, Activity::message("maybe")), &mut state);
            dc.continue_dialog().await.unwrap();
            dc.commit(&mut state);

            let sent = sender.drain();
            assert_eq!(sent[0].text, "Please say yes.");
            assert_eq!(sent[0].speak.as_deref(), Some("I did not catch that."));
        }

        #[tokio::test]
        async fn retry_speak_falls_back_to_the_initial_speak() {
            let (dialogs, mut state, sender) = harness();
            begin(
                &dialogs,
                &mut state,
                &sender,
                PromptOptions::text("Continue?").with_speak("Shall we continue?"),
            )
            .await;
            sender.drain();

            let mut dc =
                dialogs.create_context(turn_on(&sender, Activity::message("maybe")), &mut state);
            dc.continue_dialog().await.unwrap();
            dc.commit(&mut state);

            assert_eq!(sender.drain()[0].speak.as_deref(), Some("Shall we continue?"));
        }

        #[tokio::test]
        async fn retry_falls_back_to_the_original_prompt_text() {
            let (dialogs, mut state, sender) = harness();
            begin(&dialogs, &mut state, &sender, PromptOptions::text("Continue?")).await;
            sender.drain();

            let mut dc =
                dialogs.create_context(turn_on(&sender, Activity::message("maybe")), &mut state);
            dc.continue_dialog().await.unwrap();
            dc.commit(&mut state);

            assert_eq!(sender.drain()[0].text, "Continue?");
        }

        #[tokio::test]
        async fn options_survive_a_serialization_round_trip_between_turns() {
            let (dialogs, mut state, sender) = harness();
            begin(
                &dialogs,
                &mut state,
                &sender,
                PromptOptions::text("Continue?").with_retry("Yes or no."),
            )
            .await;
            sender.drain();

            // Simulate the host persisting and reloading between turns.
            let text = serde_json::to_string(&state).unwrap();
            let mut state: ConversationState = serde_json::from_str(&text).unwrap();

            let mut dc =
                dialogs.create_context(turn_on(&sender, Activity::message("nah")), &mut state);
            dc.continue_dialog().await.unwrap();
            dc.commit(&mut state);

            assert_eq!(sender.drain()[0].text, "Yes or no.");
        }
    }

    mod completion {
        use super::*;

        #[tokio::test]
        async fn recognized_reply_ends_the_prompt_with_the_value() {
            let (dialogs, mut state, sender) = harness();
            begin(&dialogs, &mut state, &sender, PromptOptions::text("Continue?")).await;
            sender.drain();

            let mut dc =
                dialogs.create_context(turn_on(&sender, Activity::message("yes!")), &mut state);
            dc.continue_dialog().await.unwrap();

            let outcome = dc.commit(&mut state);
            assert!(!outcome.active);
            assert_eq!(outcome.result, Some(json!(true)));
            assert!(sender.drain().is_empty(), "no retry on success");
        }

        #[tokio::test]
        async fn non_message_activity_neither_completes_nor_retries() {
            let (dialogs, mut state, sender) = harness();
            begin(&dialogs, &mut state, &sender, PromptOptions::text("Continue?")).await;
            sender.drain();

            let mut dc = dialogs.create_context(
                turn_on(&sender, Activity::of_kind(ActivityKind::Typing)),
                &mut state,
            );
            dc.continue_dialog().await.unwrap();

            let outcome = dc.commit(&mut state);
            assert!(outcome.active);
            assert!(sender.drain().is_empty());
        }
    }

    mod validation {
        use super::*;

        fn min_length(min: usize) -> PromptValidator {
            Arc::new(move |turn: TurnContext, value: Option<Value>| {
                Box::pin(async move {
                    match value {
                        Some(value) => Ok(Some(value)),
                        None if turn.text().map_or(0, str::len) >= min => {
                            Ok(Some(json!(turn.text().unwrap_or_default())))
                        }
                        None => Ok(None),
                    }
                })
            })
        }

        fn scolding() -> PromptValidator {
            Arc::new(|turn: TurnContext, value: Option<Value>| {
                Box::pin(async move {
                    if value.is_some() {
                        return Ok(value);
                    }
                    turn.send_activity("That will not do.")
                        .await
                        .map_err(DialogError::from)?;
                    Ok(None)
                })
            })
        }

        #[tokio::test]
        async fn validator_can_accept_an_unrecognized_reply() {
            let mut dialogs = DialogSet::new();
            dialogs
                .add("confirm", Prompt::new(YesRecognizer).with_validator(min_length(3)))
                .unwrap();
            let mut state = ConversationState::new();
            let sender = Arc::new(BufferingSender::new());
            begin(&dialogs, &mut state, &sender, PromptOptions::text("Continue?")).await;
            sender.drain();

            let mut dc =
                dialogs.create_context(turn_on(&sender, Activity::message("certainly")), &mut state);
            dc.continue_dialog().await.unwrap();

            let outcome = dc.commit(&mut state);
            assert!(!outcome.active);
            assert_eq!(outcome.result, Some(json!("certainly")));
        }

        #[tokio::test]
        async fn validator_feedback_suppresses_the_builtin_retry() {
            let mut dialogs = DialogSet::new();
            dialogs
                .add("confirm", Prompt::new(YesRecognizer).with_validator(scolding()))
                .unwrap();
            let mut state = ConversationState::new();
            let sender = Arc::new(BufferingSender::new());
            begin(
                &dialogs,
                &mut state,
                &sender,
                PromptOptions::text("Continue?").with_retry("Built-in retry."),
            )
            .await;
            sender.drain();

            let mut dc =
                dialogs.create_context(turn_on(&sender, Activity::message("no")), &mut state);
            dc.continue_dialog().await.unwrap();

            let outcome = dc.commit(&mut state);
            assert!(outcome.active);
            let sent = sender.drain();
            assert_eq!(sent.len(), 1);
            assert_eq!(sent[0].text, "That will not do.");
        }

        #[tokio::test]
        async fn silent_validator_rejection_falls_back_to_the_retry_text() {
            let silent: PromptValidator =
                Arc::new(|_turn, _value| Box::pin(async { Ok(None) }));
            let mut dialogs = DialogSet::new();
            dialogs
                .add("confirm", Prompt::new(YesRecognizer).with_validator(silent))
                .unwrap();
            let mut state = ConversationState::new();
            let sender = Arc::new(BufferingSender::new());
            begin(
                &dialogs,
                &mut state,
                &sender,
                PromptOptions::text("Continue?").with_retry("Built-in retry."),
            )
            .await;
            sender.drain();

            let mut dc =
                dialogs.create_context(turn_on(&sender, Activity::message("yes")), &mut state);
            dc.continue_dialog().await.unwrap();
            dc.commit(&mut state);

            assert_eq!(sender.drain()[0].text, "Built-in retry.");
        }

        #[tokio::test]
        async fn validator_error_aborts_the_turn() {
            let failing: PromptValidator = Arc::new(|_turn, _value| {
                Box::pin(async { Err(DialogError::step("validator exploded")) })
            });
            let mut dialogs = DialogSet::new();
            dialogs
                .add("confirm", Prompt::new(YesRecognizer).with_validator(failing))
                .unwrap();
            let mut state = ConversationState::new();
            let sender = Arc::new(BufferingSender::new());
            begin(&dialogs, &mut state, &sender, PromptOptions::text("Continue?")).await;
            sender.drain();

            let mut dc =
                dialogs.create_context(turn_on(&sender, Activity::message("yes")), &mut state);
            let err = dc.continue_dialog().await.unwrap_err();
            assert!(matches!(err, DialogError::Step(_)));
        }
    }
}
