//! In-Memory Conversation Store Adapter
//!
//! Keeps each conversation's state in a process-local map.
//! Useful for testing and development; state is lost on restart.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::dialog::ConversationState;
use crate::ports::{ConversationStore, StoreError};

/// In-memory storage for conversation state
#[derive(Debug, Clone, Default)]
pub struct MemoryConversationStore {
    states: Arc<RwLock<HashMap<String, ConversationState>>>,
}

impl MemoryConversationStore {
    /// Create a new in-memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of conversations currently held
    pub async fn len(&self) -> usize {
        self.states.read().await.len()
    }

    /// Returns true when no conversation is held
    pub async fn is_empty(&self) -> bool {
        self.states.read().await.is_empty()
    }
}

#[async_trait]
impl ConversationStore for MemoryConversationStore {
    async fn load(&self, conversation_id: &str) -> Result<Option<ConversationState>, StoreError> {
        let states = self.states.read().await;
        Ok(states.get(conversation_id).cloned())
    }

    async fn save(
        &self,
        conversation_id: &str,
        state: &ConversationState,
    ) -> Result<(), StoreError> {
        let mut states = self.states.write().await;
        states.insert(conversation_id.to_string(), state.clone());
        Ok(())
    }

    async fn clear(&self, conversation_id: &str) -> Result<(), StoreError> {
        let mut states = self.states.write().await;
        states.remove(conversation_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn load_of_an_unknown_conversation_is_none() {
        let store = MemoryConversationStore::new();
        assert!(store.load("conv-1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let store = MemoryConversationStore::new();
        let mut state = ConversationState::new();
        state.set_value("topic", json!(true));

        store.save("conv-1", &state).await.unwrap();
        let loaded = store.load("conv-1").await.unwrap().unwrap();

        assert_eq!(loaded.value("topic"), Some(&json!(true)));
    }

    #[tokio::test]
    async fn conversations_are_isolated() {
        let store = MemoryConversationStore::new();
        let mut first = ConversationState::new();
        first.set_value("who", json!("alice"));
        let mut second = ConversationState::new();
        second.set_value("who", json!("bob"));

        store.save("conv-a", &first).await.unwrap();
        store.save("conv-b", &second).await.unwrap();

        let a = store.load("conv-a").await.unwrap().unwrap();
        let b = store.load("conv-b").await.unwrap().unwrap();
        assert_eq!(a.value("who"), Some(&json!("alice")));
        assert_eq!(b.value("who"), Some(&json!("bob")));
    }

    #[tokio::test]
    async fn clear_forgets_only_that_conversation() {
        let store = MemoryConversationStore::new();
        store.save("conv-a", &ConversationState::new()).await.unwrap();
        store.save("conv-b", &ConversationState::new()).await.unwrap();

        store.clear("conv-a").await.unwrap();

        assert!(store.load("conv-a").await.unwrap().is_none());
        assert!(store.load("conv-b").await.unwrap().is_some());
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn concurrent_access_is_safe() {
        let store = MemoryConversationStore::new();
        let writer = store.clone();
        let reader = store.clone();

        let write = tokio::spawn(async move {
            writer.save("conv-1", &ConversationState::new()).await.unwrap();
        });
        let read = tokio::spawn(async move {
            tokio::time::sleep(tokio::time::Duration::from_millis(10)).await;
            reader.load("conv-1").await.unwrap();
        });

        write.await.unwrap();
        read.await.unwrap();
    }
}
