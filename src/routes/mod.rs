use std::sync::Arc;

use axum::{
    http::StatusCode,
    middleware,
    routing::{delete, get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    config::BookingConfig,
    middleware::request_id::{make_span_with_request_id, request_id_middleware},
    services::{
        backend::BackendApi,
        payment::PaymentProcessor,
        providers::MovieProvider,
        recommendations::Recommender,
        seat_map::{SeatLayout, SeatMap},
        ticket::TicketRenderer,
    },
};

pub mod account;
pub mod auth;
pub mod booking;
pub mod extract;
pub mod movies;
pub mod recommendations;
pub mod reservation;
pub mod ticket;

/// Shared, read-only application state
pub struct AppState {
    pub movies: Arc<dyn MovieProvider>,
    pub backend: Arc<dyn BackendApi>,
    pub recommender: Arc<dyn Recommender>,
    pub payments: Arc<dyn PaymentProcessor>,
    pub layout: SeatLayout,
    /// Every seat of `layout`, free, for price lookups
    pub catalog: SeatMap,
    pub tickets: TicketRenderer,
    pub booking: BookingConfig,
}

impl AppState {
    pub fn new(
        movies: Arc<dyn MovieProvider>,
        backend: Arc<dyn BackendApi>,
        recommender: Arc<dyn Recommender>,
        payments: Arc<dyn PaymentProcessor>,
        layout: SeatLayout,
        booking: BookingConfig,
    ) -> Self {
        Self {
            movies,
            backend,
            recommender,
            payments,
            catalog: layout.catalog(),
            tickets: TicketRenderer::new(&layout, &booking),
            layout,
            booking,
        }
    }
}

/// Creates the application router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .nest("/api", account_routes())
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(CorsLayer::very_permissive()),
        )
}

/// Booking core under /api/v1
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/movies/popular", get(movies::popular))
        .route("/movies/:id", get(movies::details))
        .route("/movies/:id/showtimes", get(movies::showtimes))
        .route("/reservation", get(reservation::seat_map))
        .route("/reservation/toggle", post(reservation::toggle))
        .route("/booking/seats", post(booking::confirm_seats))
        .route("/booking/personal-info", post(booking::personal_info))
        .route("/booking/payment", post(booking::payment))
        .route("/confirmation", get(booking::confirmation))
        .route("/ticket", get(ticket::show))
        .route("/ticket/download", get(ticket::download))
        .route("/recommendations/chat", post(recommendations::chat))
}

/// Account backend proxy under /api
fn account_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/login", post(auth::login))
        .route("/auth/register", post(auth::register))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me))
        .route("/user/user-profile", get(account::user_profile))
        .route(
            "/movies",
            get(account::catalog).post(account::create_catalog_movie),
        )
        .route(
            "/users/watchlist",
            get(account::watchlist).post(account::add_to_watchlist),
        )
        .route("/users/watchlist/:id", delete(account::remove_from_watchlist))
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
