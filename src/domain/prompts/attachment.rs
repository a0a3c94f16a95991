//! Attachment prompt.

use serde_json::Value;

use crate::domain::turn::TurnContext;

use super::prompt::{Prompt, PromptOptions, PromptRecognizer};

/// Collects the activity's attachment list.
///
/// Always recognizes on a message turn, handing over whatever attachments
/// arrived (possibly none). Hosts that require at least one attachment
/// enforce that in a validator, where they can also send tailored feedback.
#[derive(Debug, Default)]
pub struct AttachmentRecognizer;

impl PromptRecognizer for AttachmentRecognizer {
    fn recognize(&self, turn: &TurnContext, _options: &PromptOptions) -> Option<Value> {
        serde_json::to_value(turn.attachments()).ok()
    }
}

/// A prompt that resolves with the reply's attachment list.
pub type AttachmentPrompt = Prompt<AttachmentRecognizer>;

/// Creates an attachment prompt.
pub fn attachment_prompt() -> AttachmentPrompt {
    Prompt::new(AttachmentRecognizer)
}
