//! Free-text prompt.

use serde_json::Value;

use crate::domain::turn::TurnContext;

use super::prompt::{Prompt, PromptOptions, PromptRecognizer};

/// Accepts the trimmed message text.
///
/// An empty or whitespace-only reply fails to recognize, so the prompt
/// retries instead of completing with nothing. Further constraints belong
/// in a validator.
#[derive(Debug, Default)]
pub struct TextRecognizer;

impl PromptRecognizer for TextRecognizer {
    fn recognize(&self, turn: &TurnContext, _options: &PromptOptions) -> Option<Value> {
        let text = turn.text()?.trim();
        (!text.is_empty()).then(|| Value::String(text.to_string()))
    }
}

/// A prompt that resolves with the user's message text.
pub type TextPrompt = Prompt<TextRecognizer>;

/// Creates a text prompt.
pub fn text_prompt() -> TextPrompt {
    Prompt::new(TextRecognizer)
}
