use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::{
    error::AppResult,
    models::{CatalogPage, UserProfile, WatchlistEntry},
    routes::{extract::Session, AppState},
    services::backend::CatalogQuery,
};

pub async fn user_profile(
    State(state): State<Arc<AppState>>,
    session: Session,
) -> AppResult<Json<UserProfile>> {
    let profile = state.backend.user_profile(session.require()?).await?;
    Ok(Json(profile))
}

pub async fn catalog(
    State(state): State<Arc<AppState>>,
    session: Session,
    Query(query): Query<CatalogQuery>,
) -> AppResult<Json<CatalogPage>> {
    let page = state.backend.catalog(session.require()?, &query).await?;
    Ok(Json(page))
}

pub async fn create_catalog_movie(
    State(state): State<Arc<AppState>>,
    session: Session,
    Json(movie): Json<Value>,
) -> AppResult<Json<Value>> {
    let created = state
        .backend
        .create_catalog_movie(session.require()?, &movie)
        .await?;
    Ok(Json(created))
}

pub async fn watchlist(
    State(state): State<Arc<AppState>>,
    session: Session,
) -> AppResult<Json<Vec<WatchlistEntry>>> {
    let entries = state.backend.watchlist(session.require()?).await?;
    Ok(Json(entries))
}

pub async fn add_to_watchlist(
    State(state): State<Arc<AppState>>,
    session: Session,
    Json(entry): Json<WatchlistEntry>,
) -> AppResult<Json<Value>> {
    let added = state
        .backend
        .add_to_watchlist(session.require()?, &entry)
        .await?;

    tracing::info!(movie_id = entry.movie_id, "Added to watchlist");
    Ok(Json(added))
}

pub async fn remove_from_watchlist(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path(movie_id): Path<u64>,
) -> AppResult<Json<Value>> {
    state
        .backend
        .remove_from_watchlist(session.require()?, movie_id)
        .await?;

    tracing::info!(movie_id, "Removed from watchlist");
    Ok(Json(json!({ "message": "Movie removed from watchlist" })))
}
