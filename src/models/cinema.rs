use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A cinema and the times it shows a movie on a given day
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CinemaShowtimes {
    pub id: u32,
    pub name: String,
    pub address: String,
    pub distance_km: f64,
    pub rating: f64,
    pub times: Vec<String>,
    /// Projection format → ticket price
    pub prices: IndexMap<String, u32>,
}

/// Showtimes listing for one movie
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Showtimes {
    pub movie_id: u64,
    pub date: NaiveDate,
    /// Nine-day strip centred on `date`
    pub days: Vec<NaiveDate>,
    pub cinemas: Vec<CinemaShowtimes>,
}
