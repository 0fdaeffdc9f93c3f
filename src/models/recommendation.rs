use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatRequest {
    pub message: String,
}

/// Movie suggested by the recommendation backend
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecommendedMovie {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub tmdb_url: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub director: Option<String>,
    #[serde(default)]
    pub main_cast: Vec<String>,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub vote_count: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatReply {
    #[serde(default)]
    pub movies: Vec<RecommendedMovie>,
    pub assistant_message: String,
    #[serde(default)]
    pub mood: String,
    #[serde(default)]
    pub total_movies: usize,
}
