// rest/routes/analyze.rs — POST /analyze: crawl a site, run the initial
// analysis, create (or fully replace) the session.

use axum::{extract::State, Json};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::crawl::{Crawler, HttpFetcher};
use crate::error::ApiError;
use crate::prompts;
use crate::session::Session;
use crate::AppContext;

#[derive(Deserialize)]
pub struct AnalyzeRequest {
    pub site_url: Option<String>,
    pub session_id: Option<String>,
}

pub async fn analyze(
    State(ctx): State<Arc<AppContext>>,
    Json(body): Json<AnalyzeRequest>,
) -> Result<Json<Value>, ApiError> {
    // Opportunistic eviction: expired first, then capacity.
    ctx.store.evict_expired(Utc::now()).await;
    ctx.store.evict_over_capacity().await;

    let site_url = body
        .site_url
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| ApiError::Validation("site_url is required".into()))?;

    // Reuse the caller's session id only if it still exists.
    let session_id = match body.session_id {
        Some(id) if ctx.store.contains(&id).await => {
            info!(session_id = %id, "reusing session id");
            id
        }
        _ => Uuid::new_v4().to_string(),
    };

    let prompt = prompts::fetch_prompt_text(&ctx.docs, &ctx.config.main_prompt_url)
        .await
        .map_err(|e| ApiError::Upstream(format!("instruction document fetch failed: {e}")))?;

    let fetcher = HttpFetcher::new(ctx.config.fetch_timeout())
        .map_err(|e| ApiError::Upstream(format!("crawl client setup failed: {e}")))?;
    let outcome = Crawler::new(fetcher)
        .with_limits(ctx.config.max_pages, ctx.config.max_depth)
        .crawl(&site_url)
        .await;
    if !outcome.skipped.is_empty() {
        warn!(
            session_id = %session_id,
            skipped = outcome.skipped.len(),
            "crawl skipped pages"
        );
    }

    let result = ctx
        .model
        .analyze(&prompt, &outcome.result)
        .await
        .map_err(|e| ApiError::Upstream(format!("model call failed: {e}")))?;

    let pages = outcome.result.count;
    ctx.store
        .put(session_id.clone(), Session::new(outcome.result, result.clone()))
        .await;
    info!(session_id = %session_id, pages, "analysis stored");

    Ok(Json(json!({
        "session_id": session_id,
        "result": result,
        "pages": pages,
    })))
}
