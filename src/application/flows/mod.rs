//! Guest-facing conversation flows.
//!
//! Each flow is a [`CompositeDialog`](crate::domain::dialog::CompositeDialog)
//! with its own private dialog registry, so prompt ids never collide across
//! flows. All per-conversation data lives in instance state; nothing is
//! shared between conversations.

pub mod check_in;
pub mod reserve_table;
pub mod wake_up;

pub use check_in::check_in_dialog;
pub use reserve_table::reserve_table_dialog;
pub use wake_up::wake_up_dialog;

use serde_json::Value;

/// Reads the guest's name out of a profile value, with a neutral fallback.
pub(crate) fn guest_name(profile: Option<&Value>) -> String {
    profile
        .and_then(|p| p.get("user_name"))
        .and_then(Value::as_str)
        .unwrap_or("guest")
        .to_string()
}
