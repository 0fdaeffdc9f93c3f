use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Extension, Json,
};
use chrono::Utc;
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
    models::{BookingDraft, Ticket},
    routes::{extract::Draft, AppState},
    services::ticket::{load_movie, ticket_file_name},
};

async fn render(state: &AppState, draft: &BookingDraft) -> AppResult<Ticket> {
    let movie = load_movie(&state.movies, draft).await?;
    state.tickets.render(draft, movie, Utc::now())
}

pub async fn show(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Draft(draft): Draft,
) -> AppResult<Json<Ticket>> {
    let ticket = render(&state, &draft).await?;

    tracing::info!(
        request_id = %request_id,
        booking_id = %ticket.booking_id,
        total = ticket.total,
        total_source = ?ticket.total_source,
        "Ticket rendered"
    );

    Ok(Json(ticket))
}

/// Ticket document as a JSON attachment
pub async fn download(
    State(state): State<Arc<AppState>>,
    Draft(draft): Draft,
) -> AppResult<Response> {
    let ticket = render(&state, &draft).await?;
    let file = state.tickets.ticket_file(&ticket);

    let body = serde_json::to_string_pretty(&file)
        .map_err(|e| AppError::Internal(format!("Ticket file encoding error: {}", e)))?;
    let disposition = format!("attachment; filename=\"{}\"", ticket_file_name(&ticket));

    Ok((
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response())
}
