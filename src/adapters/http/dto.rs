//! HTTP DTOs for the message channel.
//!
//! These types decouple the wire format from domain types, allowing independent evolution.

use serde::{Deserialize, Serialize};

use crate::domain::turn::{Activity, ActivityKind, Attachment};
use crate::ports::OutgoingMessage;

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// One posted activity.
///
/// Everything but the payload is optional: a missing `kind` defaults to a
/// message, and a missing `conversation_id` starts a fresh conversation
/// under a server-generated id (echoed back in the response).
#[derive(Debug, Clone, Deserialize)]
pub struct ActivityRequest {
    #[serde(default)]
    pub kind: ActivityKind,
    #[serde(default)]
    pub conversation_id: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    #[serde(default)]
    pub locale: Option<String>,
}

impl ActivityRequest {
    /// Converts the wire activity into the domain activity.
    pub fn into_activity(self) -> Activity {
        let mut activity = Activity::of_kind(self.kind);
        activity.text = self.text;
        activity.attachments = self.attachments;
        activity.locale = self.locale;
        activity
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

/// One message the bot produced during the turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplyResponse {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speak: Option<String>,
}

impl From<OutgoingMessage> for ReplyResponse {
    fn from(message: OutgoingMessage) -> Self {
        Self {
            text: message.text,
            speak: message.speak,
        }
    }
}

/// The full outcome of one turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnResponse {
    pub conversation_id: String,
    pub replies: Vec<ReplyResponse>,
}

/// Health probe payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

/// Standard error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            code: "BAD_REQUEST".to_string(),
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            code: "INTERNAL_ERROR".to_string(),
            message: message.into(),
        }
    }
}
