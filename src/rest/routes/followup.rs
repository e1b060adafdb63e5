// rest/routes/followup.rs — POST /followup: one conversation turn over
// an existing session.

use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;

use crate::error::ApiError;
use crate::llm::FollowupPayload;
use crate::prompts;
use crate::AppContext;

#[derive(Deserialize)]
pub struct FollowupRequest {
    pub session_id: Option<String>,
    pub followup_prompt: Option<String>,
}

pub async fn followup(
    State(ctx): State<Arc<AppContext>>,
    Json(body): Json<FollowupRequest>,
) -> Result<Json<Value>, ApiError> {
    let instruction = body
        .followup_prompt
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| ApiError::Validation("followup_prompt is required".into()))?;

    let session_id = body.session_id.unwrap_or_default();
    let sess = ctx
        .store
        .get(&session_id)
        .await
        .ok_or_else(|| ApiError::NotFound("session_id not found".into()))?;
    info!(
        session_id = %session_id,
        history_turns = sess.history.len(),
        "follow-up turn"
    );

    let prompt = prompts::fetch_prompt_text(&ctx.docs, &ctx.config.followup_prompt_url)
        .await
        .map_err(|e| ApiError::Upstream(format!("instruction document fetch failed: {e}")))?;

    let payload = FollowupPayload {
        first_output: sess.first_output,
        last_followup: sess.last_followup,
        conversation_history: sess.history,
        user_instruction: instruction.clone(),
    };

    let result = ctx
        .model
        .followup(&prompt, &payload)
        .await
        .map_err(|e| ApiError::Upstream(format!("model call failed: {e}")))?;

    // The session may have been evicted while the model call ran.
    if !ctx
        .store
        .record_followup(&session_id, instruction, result.clone())
        .await
    {
        return Err(ApiError::NotFound("session_id not found".into()));
    }

    Ok(Json(json!({ "result": result })))
}
