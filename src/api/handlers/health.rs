use axum::{extract::State, response::IntoResponse, Json};
use crate::state::AppState;
use std::sync::Arc;

pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let token_cached = state.token_cache.current().await.is_some();
    Json(serde_json::json!({
        "status": "ok",
        "channel_manager": {
            "configured": state.config.channel_manager.is_configured(),
            "token_cached": token_cached,
        }
    }))
}
