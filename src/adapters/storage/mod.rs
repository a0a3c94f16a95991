//! Conversation state storage adapters.

mod file_conversation_store;
mod memory_conversation_store;

pub use file_conversation_store::FileConversationStore;
pub use memory_conversation_store::MemoryConversationStore;
