use serde::{Deserialize, Serialize};

const IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p";

/// Movie details as returned to the client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Movie {
    pub id: u64,
    pub title: String,
    pub overview: Option<String>,
    pub release_date: Option<String>,
    /// Minutes
    pub runtime: Option<u32>,
    pub vote_average: Option<f64>,
    pub poster_url: Option<String>,
    pub backdrop_url: Option<String>,
}

impl Movie {
    /// Runtime formatted as "2h 28min"
    pub fn runtime_label(&self) -> Option<String> {
        self.runtime
            .filter(|m| *m > 0)
            .map(|m| format!("{}h {}min", m / 60, m % 60))
    }

    /// Rating on a five point scale, one decimal
    pub fn rating_out_of_five(&self) -> Option<f64> {
        self.vote_average.map(|v| (v / 2.0 * 10.0).round() / 10.0)
    }
}

/// One entry of a listing page
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieSummary {
    pub id: u64,
    pub title: String,
    pub poster_url: Option<String>,
    pub release_date: Option<String>,
    pub vote_average: Option<f64>,
}

/// A page of movie summaries
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MoviePage {
    pub page: u32,
    pub total_pages: u32,
    pub results: Vec<MovieSummary>,
}

// ============================================================================
// TMDB API Types
// ============================================================================

/// Raw response from GET /movie/{id}
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbMovie {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
}

/// Raw response from GET /movie/popular and /discover/movie
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbPage {
    pub page: u32,
    #[serde(default)]
    pub total_pages: u32,
    pub results: Vec<TmdbMovie>,
}

fn image_url(size: &str, path: Option<String>) -> Option<String> {
    path.filter(|p| !p.is_empty())
        .map(|p| format!("{}/{}{}", IMAGE_BASE_URL, size, p))
}

impl From<TmdbMovie> for Movie {
    fn from(raw: TmdbMovie) -> Self {
        Movie {
            id: raw.id,
            title: raw.title,
            overview: raw.overview.filter(|o| !o.is_empty()),
            release_date: raw.release_date.filter(|d| !d.is_empty()),
            runtime: raw.runtime,
            vote_average: raw.vote_average,
            poster_url: image_url("w500", raw.poster_path),
            backdrop_url: image_url("w1280", raw.backdrop_path),
        }
    }
}

impl From<TmdbMovie> for MovieSummary {
    fn from(raw: TmdbMovie) -> Self {
        MovieSummary {
            id: raw.id,
            title: raw.title,
            poster_url: image_url("w500", raw.poster_path),
            release_date: raw.release_date.filter(|d| !d.is_empty()),
            vote_average: raw.vote_average,
        }
    }
}

impl From<TmdbPage> for MoviePage {
    fn from(raw: TmdbPage) -> Self {
        MoviePage {
            page: raw.page,
            total_pages: raw.total_pages,
            results: raw.results.into_iter().map(MovieSummary::from).collect(),
        }
    }
}
