use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    error::AppResult,
    models::{Movie, MoviePage, Showtimes},
    routes::AppState,
    services::showtimes,
};

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    page: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct DateQuery {
    date: Option<NaiveDate>,
}

pub async fn popular(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PageQuery>,
) -> AppResult<Json<MoviePage>> {
    let page = state.movies.popular(params.page.unwrap_or(1)).await?;
    Ok(Json(page))
}

pub async fn details(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> AppResult<Json<Movie>> {
    let movie = state.movies.get_movie(id).await?;
    Ok(Json(movie))
}

/// Demo cinemas for the movie; today when no date is given
pub async fn showtimes(
    Path(id): Path<u64>,
    Query(params): Query<DateQuery>,
) -> Json<Showtimes> {
    let date = params.date.unwrap_or_else(|| Utc::now().date_naive());
    Json(showtimes::showtimes(id, date))
}
