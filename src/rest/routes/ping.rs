use axum::{extract::State, Json};
use chrono::Utc;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::AppContext;

pub async fn ping(State(ctx): State<Arc<AppContext>>) -> Json<Value> {
    Json(json!({
        "status": "alive",
        "timestamp": Utc::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        "sessions": ctx.store.len().await,
    }))
}
