//! Typed prompt dialogs: ask, recognize, validate, retry.

mod attachment;
mod choice;
mod datetime;
mod number;
mod prompt;
mod text;

pub use attachment::{attachment_prompt, AttachmentPrompt, AttachmentRecognizer};
pub use choice::{choice_prompt, ChoicePrompt, ChoiceRecognizer, FoundChoice};
pub use datetime::{datetime_prompt, DateTimePrompt, DateTimeRecognizer, DateTimeResolution};
pub use number::{number_prompt, NumberPrompt, NumberRecognizer};
pub use prompt::{Prompt, PromptOptions, PromptRecognizer, PromptValidator};
pub use text::{text_prompt, TextPrompt, TextRecognizer};
