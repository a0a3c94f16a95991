//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the engine and the outside world. Adapters implement these ports.
//!
//! - `ConversationStore` - Persistence for per-conversation state
//! - `MessageSender` - Outbound delivery of messages to the user

mod conversation_store;
mod message_sender;

pub use conversation_store::{ConversationStore, StoreError};
pub use message_sender::{MessageSender, OutgoingMessage, SendError};
