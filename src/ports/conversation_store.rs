//! Conversation Store Port - Interface for persisting conversation state.
//!
//! The engine holds no state between turns; everything that must survive a
//! turn boundary lives in the host-persisted `ConversationState`. This port
//! defines how that object is saved and loaded, keyed by conversation id.

use async_trait::async_trait;

use crate::domain::dialog::ConversationState;

/// Errors that can occur during conversation storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to serialize conversation state: {0}")]
    Serialization(String),

    #[error("failed to deserialize conversation state: {0}")]
    Deserialization(String),

    #[error("storage io error: {0}")]
    Io(String),
}

/// Port for persisting and loading per-conversation state.
///
/// Serializing concurrent turns on the same conversation id is the caller's
/// responsibility; the store itself makes no ordering guarantees beyond
/// last-write-wins.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Load the state for a conversation.
    ///
    /// Returns `None` for a conversation that has never been saved, which
    /// callers treat as a fresh conversation.
    async fn load(&self, conversation_id: &str) -> Result<Option<ConversationState>, StoreError>;

    /// Save the state for a conversation, replacing any previous value.
    async fn save(
        &self,
        conversation_id: &str,
        state: &ConversationState,
    ) -> Result<(), StoreError>;

    /// Discard the state for a conversation.
    ///
    /// This is the only way to abandon a conversation mid-flow: the next
    /// turn starts from an empty stack.
    async fn clear(&self, conversation_id: &str) -> Result<(), StoreError>;
}
