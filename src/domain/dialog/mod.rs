//! Dialog engine module.
//!
//! The core orchestration machinery: a per-conversation stack of dialog
//! activation records, a registry of reusable dialogs, and the per-turn
//! context through which dialogs begin, continue, end, and replace each
//! other. Waterfalls execute ordered step lists; composites delegate to a
//! private registry over a nested sub-stack.

mod composite;
mod context;
mod dialog;
mod error;
mod instance;
mod set;
mod waterfall;

pub use composite::CompositeDialog;
pub use context::DialogContext;
pub use dialog::{Dialog, DialogTurnResult};
pub use error::DialogError;
pub use instance::{ConversationState, DialogInstance, DialogStack};
pub use set::DialogSet;
pub use waterfall::{StepOutcome, Waterfall, WaterfallStepFn};
