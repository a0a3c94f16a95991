//! HTTP routes for the message channel.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{health, post_message, ChannelState};

/// Creates the channel router with all endpoints.
pub fn channel_routes(state: ChannelState) -> Router {
    Router::new()
        .route("/api/messages", post(post_message))
        .route("/health", get(health))
        .with_state(state)
}
