//! Application layer - the concierge bot and its conversation flows.

pub mod bot;
pub mod flows;

pub use bot::ConciergeBot;
