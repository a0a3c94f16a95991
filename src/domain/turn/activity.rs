//! Incoming activity types.

use serde::{Deserialize, Serialize};

/// Classification of an incoming activity.
///
/// Only `Message` activities carry user input that advances waterfalls and
/// prompts; the remaining kinds flow through the engine without consuming
/// a step or a retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    /// A user message with text and/or attachments.
    #[default]
    Message,

    /// A channel or system event.
    Event,

    /// A typing indicator.
    Typing,

    /// The channel signalled the end of the conversation.
    EndOfConversation,
}

impl ActivityKind {
    /// Returns true for activities that carry user input.
    pub fn is_message(&self) -> bool {
        matches!(self, Self::Message)
    }
}

/// A file or media item carried by a turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    /// MIME type of the attachment content.
    pub content_type: String,

    /// Location of the content, when hosted by the channel.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_url: Option<String>,

    /// Display name of the attachment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// One incoming activity, already classified by the channel boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    /// What kind of activity this is.
    pub kind: ActivityKind,

    /// Raw message text, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Attachments carried by the turn, in channel order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,

    /// Locale of the sending user, e.g. `en-us`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
}

impl Activity {
    /// Creates a message activity with the given text.
    pub fn message(text: impl Into<String>) -> Self {
        Self {
            kind: ActivityKind::Message,
            text: Some(text.into()),
            attachments: Vec::new(),
            locale: None,
        }
    }

    /// Creates an activity of the given non-message kind.
    pub fn of_kind(kind: ActivityKind) -> Self {
        Self {
            kind,
            text: None,
            attachments: Vec::new(),
            locale: None,
        }
    }

    /// Adds attachments to the activity.
    pub fn with_attachments(mut self, attachments: Vec<Attachment>) -> Self {
        self.attachments = attachments;
        self
    }

    /// Sets the user locale.
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod classification {
        use super::*;

        #[test]
        fn message_is_message() {
            assert!(ActivityKind::Message.is_message());
        }

        #[test]
        fn event_typing_and_end_are_not_messages() {
            assert!(!ActivityKind::Event.is_message());
            assert!(!ActivityKind::Typing.is_message());
            assert!(!ActivityKind::EndOfConversation.is_message());
        }

        #[test]
        fn default_kind_is_message() {
            assert_eq!(ActivityKind::default(), ActivityKind::Message);
        }
    }

    mod serde_format {
        use super::*;

        #[test]
        fn kind_serializes_to_snake_case() {
            let json = serde_json::to_string(&ActivityKind::EndOfConversation).unwrap();
            assert_eq!(json, "\"end_of_conversation\"");
        }

        #[test]
        fn message_activity_round_trips() {
            let activity = Activity::message("hello").with_locale("en-us");
            let json = serde_json::to_string(&activity).unwrap();
            let back: Activity = serde_json::from_str(&json).unwrap();
            assert_eq!(back, activity);
        }

        #[test]
        fn missing_attachments_deserialize_to_empty() {
            let activity: Activity =
                serde_json::from_str(r#"{"kind":"message","text":"hi"}"#).unwrap();
            assert!(activity.attachments.is_empty());
        }
    }
}
