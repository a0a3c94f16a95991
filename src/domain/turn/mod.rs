//! Turn boundary module.
//!
//! One turn is one request/response cycle between the user and the agent.
//! The channel adapter classifies each incoming request into an [`Activity`]
//! exactly once; the engine only ever branches on the resulting
//! [`ActivityKind`], never on raw channel payloads.

mod activity;
mod context;

pub use activity::{Activity, ActivityKind, Attachment};
pub use context::TurnContext;
