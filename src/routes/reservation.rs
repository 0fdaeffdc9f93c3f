use axum::{extract::State, Extension, Json};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
    models::{BookingDraft, Seat, SeatTier, Stage},
    routes::{extract::Draft, AppState},
    services::{seat_map::SeatMap, selection::Selection},
};

/// Seat selection page
#[derive(Debug, Serialize)]
pub struct ReservationView {
    pub draft: BookingDraft,
    pub columns: usize,
    /// Row letter → seats, front row first
    pub rows: IndexMap<char, Vec<Seat>>,
    pub prices: IndexMap<SeatTier, u32>,
    pub selection: Selection,
    pub subtotal: u32,
    pub free_count: usize,
}

#[derive(Debug, Deserialize)]
pub struct ToggleRequest {
    pub seat: String,
    #[serde(default)]
    pub occupied: bool,
    /// Seats the client currently shows as taken
    #[serde(default)]
    pub occupied_seats: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ToggleResponse {
    /// False when the seat was occupied and nothing changed
    pub toggled: bool,
    pub selection: Selection,
    pub subtotal: u32,
    pub free_count: usize,
    pub next: String,
}

fn tier_prices() -> IndexMap<SeatTier, u32> {
    [SeatTier::Standard, SeatTier::Premium, SeatTier::Vip]
        .into_iter()
        .map(|tier| (tier, tier.price()))
        .collect()
}

fn build_seat_map(state: &AppState) -> SeatMap {
    state
        .layout
        .build(&mut rand::thread_rng(), state.booking.occupancy_rate)
}

/// Seat map for a showing with simulated occupancy. Missing movie, time or
/// cinema fall back to the configured showing.
pub async fn seat_map(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Draft(draft): Draft,
) -> Json<ReservationView> {
    let draft = draft.with_defaults(&state.booking);
    let seat_map = build_seat_map(&state);
    let selection: Selection = draft.seats.iter().cloned().collect();

    let rows = seat_map
        .rows()
        .into_iter()
        .map(|(row, seats)| (row, seats.into_iter().cloned().collect()))
        .collect();

    tracing::debug!(
        request_id = %request_id,
        seats = seat_map.len(),
        selected = selection.len(),
        "Seat map built"
    );

    Json(ReservationView {
        columns: seat_map.columns(),
        rows,
        prices: tier_prices(),
        subtotal: selection.total(&seat_map),
        free_count: selection.free_count(&seat_map),
        selection,
        draft,
    })
}

/// Flips one seat in the draft's selection. Free seats are counted against
/// the occupancy the client reports.
pub async fn toggle(
    State(state): State<Arc<AppState>>,
    Draft(mut draft): Draft,
    Json(request): Json<ToggleRequest>,
) -> AppResult<Json<ToggleResponse>> {
    if state.catalog.get(&request.seat).is_none() {
        return Err(AppError::InvalidInput(format!(
            "Unknown seat {}",
            request.seat
        )));
    }

    let seat_map = state.layout.with_occupied(&request.occupied_seats);
    let occupied = request.occupied
        || seat_map
            .get(&request.seat)
            .is_some_and(|seat| seat.occupied);

    let mut selection: Selection = draft.seats.iter().cloned().collect();
    let toggled = selection.toggle(&request.seat, occupied);
    draft.seats = selection.to_vec();

    Ok(Json(ToggleResponse {
        toggled,
        subtotal: selection.total(&state.catalog),
        free_count: selection.free_count(&seat_map),
        next: draft.link(Stage::SeatSelection)?,
        selection,
    }))
}
