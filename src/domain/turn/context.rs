//! Per-turn context.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::ports::{MessageSender, OutgoingMessage, SendError};

use super::activity::{Activity, Attachment};

/// Facade over one turn of conversation.
///
/// Owns the classified incoming [`Activity`] and the outbound sender, and
/// counts how many messages have been sent during the turn. The counter
/// backs two behaviors: prompt validators that reply themselves suppress
/// the automatic retry render, and hosts can fall back to a default reply
/// when nothing responded.
///
/// Cloning is cheap; clones share the same sent counter.
#[derive(Clone)]
pub struct TurnContext {
    activity: Arc<Activity>,
    sender: Arc<dyn MessageSender>,
    sent: Arc<AtomicUsize>,
}

impl TurnContext {
    /// Creates a context for one turn.
    pub fn new(activity: Activity, sender: Arc<dyn MessageSender>) -> Self {
        Self {
            activity: Arc::new(activity),
            sender,
            sent: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// The classified incoming activity.
    pub fn activity(&self) -> &Activity {
        &self.activity
    }

    /// Returns true if this turn carries a user message.
    pub fn is_message(&self) -> bool {
        self.activity.kind.is_message()
    }

    /// Raw text of the incoming activity, if any.
    pub fn text(&self) -> Option<&str> {
        self.activity.text.as_deref()
    }

    /// Attachments carried by the turn, in channel order.
    pub fn attachments(&self) -> &[Attachment] {
        &self.activity.attachments
    }

    /// Locale of the sending user, if the channel provided one.
    pub fn locale(&self) -> Option<&str> {
        self.activity.locale.as_deref()
    }

    /// Number of messages sent so far during this turn.
    pub fn sent_count(&self) -> usize {
        self.sent.load(Ordering::SeqCst)
    }

    /// Returns true if anything has been sent during this turn.
    pub fn responded(&self) -> bool {
        self.sent_count() > 0
    }

    /// Delivers a message through the channel sender.
    pub async fn send(&self, message: OutgoingMessage) -> Result<(), SendError> {
        self.sender.send(message).await?;
        self.sent.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    /// Delivers a plain text message.
    pub async fn send_activity(&self, text: impl Into<String> + Send) -> Result<(), SendError> {
        self.send(OutgoingMessage::text(text)).await
    }
}

impl std::fmt::Debug for TurnContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TurnContext")
            .field("kind", &self.activity.kind)
            .field("sent", &self.sent_count())
            .finish()
    }
}
