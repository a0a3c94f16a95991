//! Concierge server binary.
//!
//! Loads configuration, wires the bot to the configured storage backend,
//! and serves the message channel over HTTP.

use std::sync::Arc;
use std::time::Duration;

use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use concierge::adapters::http::{channel_routes, ChannelState};
use concierge::adapters::storage::{FileConversationStore, MemoryConversationStore};
use concierge::application::ConciergeBot;
use concierge::config::{AppConfig, StorageBackend};
use concierge::ports::ConversationStore;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level)),
        )
        .init();

    let store: Arc<dyn ConversationStore> = match config.storage.backend {
        StorageBackend::Memory => Arc::new(MemoryConversationStore::new()),
        StorageBackend::File => Arc::new(FileConversationStore::new(&config.storage.path)),
    };
    let bot = Arc::new(ConciergeBot::new()?);

    let app = channel_routes(ChannelState::new(bot, store))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )));

    let addr = config.server.socket_addr();
    info!(%addr, backend = ?config.storage.backend, "concierge listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
