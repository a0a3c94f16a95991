//! HTTP handlers for the message channel.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tokio::sync::Mutex;
use tracing::{error, info};
use uuid::Uuid;

use crate::application::ConciergeBot;
use crate::domain::dialog::DialogError;
use crate::domain::turn::{Activity, ActivityKind, TurnContext};
use crate::ports::{ConversationStore, StoreError};

use super::dto::{ActivityRequest, ErrorResponse, HealthResponse, TurnResponse};
use super::sender::BufferingSender;

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

/// Shared state of the message channel.
#[derive(Clone)]
pub struct ChannelState {
    bot: Arc<ConciergeBot>,
    store: Arc<dyn ConversationStore>,
    locks: Arc<Mutex<HashMap<String, Arc<Mutex<()>>>>>,
}

impl ChannelState {
    pub fn new(bot: Arc<ConciergeBot>, store: Arc<dyn ConversationStore>) -> Self {
        Self {
            bot,
            store,
            locks: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Lock guarding one conversation's load-run-save cycle.
    ///
    /// Turns for the same conversation serialize on this lock; turns for
    /// different conversations run concurrently.
    async fn conversation_lock(&self, conversation_id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        locks
            .entry(conversation_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Drops the conversation's lock entry once no turn holds it, keeping
    /// the map bounded by the number of in-flight conversations.
    async fn release_conversation_lock(&self, conversation_id: &str) {
        let mut locks = self.locks.lock().await;
        if let Some(lock) = locks.get(conversation_id) {
            if Arc::strong_count(lock) == 1 {
                locks.remove(conversation_id);
            }
        }
    }

    #[cfg(test)]
    async fn held_locks(&self) -> usize {
        self.locks.lock().await.len()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/messages - Run one turn of conversation
pub async fn post_message(
    State(state): State<ChannelState>,
    Json(request): Json<ActivityRequest>,
) -> Response {
    let conversation_id = request
        .conversation_id
        .clone()
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    let kind = request.kind;
    let activity = request.into_activity();

    let lock = state.conversation_lock(&conversation_id).await;
    let response = {
        let _guard = lock.lock().await;
        run_turn(&state, &conversation_id, kind, activity).await
    };
    drop(lock);
    state.release_conversation_lock(&conversation_id).await;
    response
}

/// One load-run-save cycle; runs under the conversation's lock.
async fn run_turn(
    state: &ChannelState,
    conversation_id: &str,
    kind: ActivityKind,
    activity: Activity,
) -> Response {
    let mut conversation = match state.store.load(conversation_id).await {
        Ok(loaded) => loaded.unwrap_or_default(),
        Err(e) => return handle_store_error(e),
    };

    let sender = Arc::new(BufferingSender::new());
    let turn = TurnContext::new(activity, sender.clone());
    if let Err(e) = state.bot.on_turn(&turn, &mut conversation).await {
        return handle_dialog_error(e);
    }

    // End-of-conversation turns forget the conversation instead of
    // persisting whatever the dialogs left behind.
    let persisted = if kind == ActivityKind::EndOfConversation {
        state.store.clear(conversation_id).await
    } else {
        state.store.save(conversation_id, &conversation).await
    };
    if let Err(e) = persisted {
        return handle_store_error(e);
    }

    let replies: Vec<_> = sender.drain().into_iter().map(Into::into).collect();
    info!(%conversation_id, replies = replies.len(), "turn completed");

    let response = TurnResponse {
        conversation_id: conversation_id.to_string(),
        replies,
    };
    (StatusCode::OK, Json(response)).into_response()
}

/// GET /health - Liveness probe
pub async fn health() -> Response {
    let response = HealthResponse {
        status: "ok".to_string(),
    };
    (StatusCode::OK, Json(response)).into_response()
}

// ════════════════════════════════════════════════════════════════════════════
// Error handling
// ════════════════════════════════════════════════════════════════════════════

fn handle_store_error(error: StoreError) -> Response {
    error!(%error, "conversation store failure");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::internal("conversation storage failed")),
    )
        .into_response()
}

fn handle_dialog_error(error: DialogError) -> Response {
    match error {
        DialogError::DialogNotFound(_) | DialogError::DuplicateDialogId(_) => {
            error!(%error, "dialog registry misconfigured");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::internal("bot is misconfigured")),
            )
                .into_response()
        }
        other => {
            error!(error = %other, "turn aborted");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::internal("turn failed")),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::MemoryConversationStore;

    fn channel_state() -> ChannelState {
        ChannelState::new(
            Arc::new(ConciergeBot::new().unwrap()),
            Arc::new(MemoryConversationStore::new()),
        )
    }

    fn message_request(conversation_id: &str, text: &str) -> ActivityRequest {
        ActivityRequest {
            kind: ActivityKind::Message,
            conversation_id: Some(conversation_id.to_string()),
            text: Some(text.to_string()),
            attachments: Vec::new(),
            locale: None,
        }
    }

    #[tokio::test]
    async fn lock_entries_are_dropped_after_the_turn() {
        let state = channel_state();

        post_message(State(state.clone()), Json(message_request("conv-1", "hi"))).await;
        post_message(State(state.clone()), Json(message_request("conv-2", "hi"))).await;

        assert_eq!(state.held_locks().await, 0, "idle conversations keep no lock");

        // The conversations themselves survive; only the locks are gone.
        post_message(State(state.clone()), Json(message_request("conv-1", "Lee"))).await;
        assert_eq!(state.held_locks().await, 0);
    }

    #[test]
    fn store_errors_map_to_500() {
        let response = handle_store_error(StoreError::Io("disk gone".into()));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn dialog_errors_map_to_500() {
        let response = handle_dialog_error(DialogError::NoActiveDialog);
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
