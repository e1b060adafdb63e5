// rest/routes/chat.rs — POST /clear-chat: reset a session's history
// without discarding its crawl corpus or first analysis.

use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;

use crate::error::ApiError;
use crate::AppContext;

#[derive(Deserialize)]
pub struct ClearChatRequest {
    pub session_id: Option<String>,
}

pub async fn clear_chat(
    State(ctx): State<Arc<AppContext>>,
    Json(body): Json<ClearChatRequest>,
) -> Result<Json<Value>, ApiError> {
    let session_id = body.session_id.unwrap_or_default();

    let prior = ctx
        .store
        .clear_history(&session_id)
        .await
        .ok_or_else(|| ApiError::NotFound("session_id not found".into()))?;
    info!(session_id = %session_id, cleared = prior, "chat history cleared");

    Ok(Json(json!({
        "status": "success",
        "message": format!("Chat history cleared ({prior} messages)"),
        "session_id": session_id,
    })))
}
