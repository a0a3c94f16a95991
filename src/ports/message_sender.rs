//! Message Sender Port - Interface for outbound message delivery.
//!
//! Render hooks and bot logic deliver text through this port. The engine
//! never talks to a channel directly; the channel adapter decides what
//! delivery means (HTTP response, websocket push, console write, ...).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A message on its way to the user.
///
/// `speak` carries an optional speech variant for voice channels. The
/// engine transports it verbatim; rendering is a channel concern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutgoingMessage {
    /// Display text of the message.
    pub text: String,

    /// Optional SSML/speech variant of the message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speak: Option<String>,
}

impl OutgoingMessage {
    /// Creates a plain text message.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            speak: None,
        }
    }

    /// Attaches a speech variant.
    pub fn with_speak(mut self, speak: impl Into<String>) -> Self {
        self.speak = Some(speak.into());
        self
    }
}

/// Errors that can occur while delivering a message.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SendError {
    #[error("message delivery failed: {0}")]
    Delivery(String),
}

/// Port for delivering messages to the user.
#[async_trait]
pub trait MessageSender: Send + Sync {
    /// Deliver a single message.
    ///
    /// # Errors
    /// Returns `SendError` if the channel rejects the message.
    async fn send(&self, message: OutgoingMessage) -> Result<(), SendError>;
}
