//! HTTP adapter - the web channel over the dialog runtime.
//!
//! Exposes one message endpoint per the request/reply transcript model:
//! the caller posts an activity, the turn runs to completion, and every
//! message the bot produced during the turn comes back in the response.

pub mod dto;
pub mod handlers;
pub mod routes;
pub mod sender;

pub use handlers::ChannelState;
pub use routes::channel_routes;
pub use sender::BufferingSender;
