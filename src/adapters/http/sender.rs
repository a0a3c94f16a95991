//! Buffering message sender.

use async_trait::async_trait;
use std::sync::Mutex;

use crate::ports::{MessageSender, OutgoingMessage, SendError};

/// Collects outgoing messages in order instead of delivering them.
///
/// The web channel runs a whole turn against one of these and then ships
/// the buffered messages back in the HTTP response body. Tests use it to
/// assert on exactly what a dialog said.
#[derive(Debug, Default)]
pub struct BufferingSender {
    sent: Mutex<Vec<OutgoingMessage>>,
}

impl BufferingSender {
    /// Creates an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes everything buffered so far, oldest first.
    pub fn drain(&self) -> Vec<OutgoingMessage> {
        let mut sent = self.sent.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        std::mem::take(&mut *sent)
    }
}

#[async_trait]
impl MessageSender for BufferingSender {
    async fn send(&self, message: OutgoingMessage) -> Result<(), SendError> {
        let mut sent = self.sent.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        sent.push(message);
        Ok(())
    }
}
