//! Dialog activation records and the per-conversation stack.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One activation record on a conversation's dialog stack.
///
/// `state` is exclusively owned by the dialog that created the instance.
/// No other dialog reads or writes it; the only channel by which a parent
/// learns anything from a child is the result value passed on `end`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogInstance {
    /// Id of the dialog this instance is for.
    pub id: String,

    /// The instance's persisted private state.
    #[serde(default)]
    pub state: Value,
}

impl DialogInstance {
    /// Creates a fresh instance with empty private state.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            state: Value::Null,
        }
    }
}

/// Ordered call stack of dialog instances; the last element is current.
///
/// The stack is mutated only through `begin` (push), `end` (pop), and
/// `replace` (pop + push) on the dialog context. Mutators are crate-private
/// so no host code can rewrite frames by index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DialogStack(Vec<DialogInstance>);

impl DialogStack {
    /// Creates an empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of instances on the stack.
    pub fn depth(&self) -> usize {
        self.0.len()
    }

    /// Returns true if no dialog is active.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The current (topmost) instance.
    pub fn current(&self) -> Option<&DialogInstance> {
        self.0.last()
    }

    /// Iterates the stack bottom-up.
    pub fn iter(&self) -> impl Iterator<Item = &DialogInstance> {
        self.0.iter()
    }

    pub(crate) fn current_mut(&mut self) -> Option<&mut DialogInstance> {
        self.0.last_mut()
    }

    pub(crate) fn push(&mut self, instance: DialogInstance) {
        self.0.push(instance);
    }

    pub(crate) fn pop(&mut self) -> Option<DialogInstance> {
        self.0.pop()
    }
}

/// The single host-persisted object for one conversation.
///
/// The engine lazily maintains the `stack` field and treats every other
/// field as opaque host property. The key `stack` is reserved; host values
/// must not reuse it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversationState {
    /// The dialog call stack, empty for a fresh conversation.
    #[serde(default)]
    pub(crate) stack: DialogStack,

    /// Host-owned values, opaque to the engine.
    #[serde(flatten)]
    values: Map<String, Value>,
}

impl ConversationState {
    /// Creates state for a fresh conversation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read access to the dialog stack.
    pub fn stack(&self) -> &DialogStack {
        &self.stack
    }

    /// Reads a host-owned value.
    pub fn value(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Writes a host-owned value.
    pub fn set_value(&mut self, key: impl Into<String>, value: Value) {
        self.values.insert(key.into(), value);
    }

    /// Removes a host-owned value, returning it if present.
    pub fn remove_value(&mut self, key: &str) -> Option<Value> {
        self.values.remove(key)
    }
}
