//! File-based Conversation Store Adapter
//!
//! Persists each conversation's state as one YAML file on disk, so parked
//! dialogs survive process restarts and are easy to inspect by hand.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::domain::dialog::ConversationState;
use crate::ports::{ConversationStore, StoreError};

/// File-backed storage for conversation state
#[derive(Debug, Clone)]
pub struct FileConversationStore {
    base_path: PathBuf,
}

impl FileConversationStore {
    /// Create a file store rooted at `base_path`
    ///
    /// # Example
    /// ```ignore
    /// let store = FileConversationStore::new("./data/conversations");
    /// ```
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    /// File path holding a conversation's state
    fn state_file_path(&self, conversation_id: &str) -> PathBuf {
        self.base_path
            .join(format!("{}.yaml", sanitize_id(conversation_id)))
    }

    async fn ensure_base_dir(&self) -> Result<(), StoreError> {
        fs::create_dir_all(&self.base_path)
            .await
            .map_err(|e| StoreError::Io(e.to_string()))
    }
}

/// Conversation ids come from the channel and may contain anything; keep
/// only filename-safe characters so an id cannot escape the base directory.
fn sanitize_id(conversation_id: &str) -> String {
    conversation_id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[async_trait]
impl ConversationStore for FileConversationStore {
    async fn load(&self, conversation_id: &str) -> Result<Option<ConversationState>, StoreError> {
        let file_path = self.state_file_path(conversation_id);
        if !file_path.exists() {
            return Ok(None);
        }

        let yaml = fs::read_to_string(&file_path)
            .await
            .map_err(|e| StoreError::Io(e.to_string()))?;

        let state = serde_yaml::from_str(&yaml)
            .map_err(|e| StoreError::Deserialization(e.to_string()))?;

        Ok(Some(state))
    }

    async fn save(
        &self,
        conversation_id: &str,
        state: &ConversationState,
    ) -> Result<(), StoreError> {
        self.ensure_base_dir().await?;

        let yaml = serde_yaml::to_string(state)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        fs::write(self.state_file_path(conversation_id), yaml)
            .await
            .map_err(|e| StoreError::Io(e.to_string()))?;

        Ok(())
    }

    async fn clear(&self, conversation_id: &str) -> Result<(), StoreError> {
        let file_path = self.state_file_path(conversation_id);
        if file_path.exists() {
            fs::remove_file(&file_path)
                .await
                .map_err(|e| StoreError::Io(e.to_string()))?;
        }
        Ok(())
    }
}
