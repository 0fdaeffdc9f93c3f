use axum::{extract::State, Extension, Json};
use std::sync::Arc;

use crate::{
    error::AppResult,
    middleware::request_id::RequestId,
    models::{ChatReply, ChatRequest},
    routes::AppState,
};

/// Handler for the recommendation chat endpoint
pub async fn chat(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<ChatRequest>,
) -> AppResult<Json<ChatReply>> {
    tracing::info!(request_id = %request_id, "Processing recommendation chat");

    let reply = state.recommender.chat(&request.message).await?;
    Ok(Json(reply))
}
