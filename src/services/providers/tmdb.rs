/// TMDB movie metadata provider
///
/// API Flow:
/// 1. Details: /movie/{id} → title, overview, runtime, artwork
/// 2. Listing: /movie/popular?page= → paged summaries
use crate::{
    cached,
    cache::{Cache, CacheKey},
    error::{AppError, AppResult},
    models::{Movie, MoviePage, TmdbMovie, TmdbPage},
    services::providers::MovieProvider,
};
use reqwest::{Client as HttpClient, Response, StatusCode};

const DETAILS_CACHE_TTL: u64 = 86400; // 24 hours
const POPULAR_CACHE_TTL: u64 = 3600; // 1 hour

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    language: String,
    cache: Cache,
}

impl TmdbProvider {
    pub fn new(cache: Cache, api_key: String, api_url: String, language: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
            language,
            cache,
        }
    }

    async fn get(&self, path: &str, extra: &[(&str, String)]) -> AppResult<Response> {
        let url = format!("{}{}", self.api_url, path);

        let mut query = vec![
            ("api_key", self.api_key.clone()),
            ("language", self.language.clone()),
        ];
        query.extend(extra.iter().map(|(k, v)| (*k, v.clone())));

        let response = self.http_client.get(&url).query(&query).send().await?;
        Ok(response)
    }
}

async fn check_status(response: Response) -> AppResult<Response> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    Err(AppError::ExternalApi(format!(
        "TMDB API returned status {}: {}",
        status, body
    )))
}

#[async_trait::async_trait]
impl MovieProvider for TmdbProvider {
    async fn get_movie(&self, id: u64) -> AppResult<Movie> {
        cached!(
            self.cache,
            CacheKey::MovieDetails {
                id,
                language: self.language.clone(),
            },
            DETAILS_CACHE_TTL,
            async move {
                let response = self.get(&format!("/movie/{}", id), &[]).await?;

                if response.status() == StatusCode::NOT_FOUND {
                    return Err(AppError::NotFound(format!("Movie {} not found", id)));
                }
                let response = check_status(response).await?;

                let raw: TmdbMovie = response.json().await?;
                let movie = Movie::from(raw);

                tracing::info!(
                    movie_id = id,
                    title = %movie.title,
                    provider = "tmdb",
                    "Movie details fetched"
                );

                Ok(movie)
            }
        )
    }

    async fn popular(&self, page: u32) -> AppResult<MoviePage> {
        if page == 0 {
            return Err(AppError::InvalidInput("Pages start at 1".to_string()));
        }

        cached!(
            self.cache,
            CacheKey::PopularMovies {
                page,
                language: self.language.clone(),
            },
            POPULAR_CACHE_TTL,
            async move {
                let response = self
                    .get("/movie/popular", &[("page", page.to_string())])
                    .await?;
                let response = check_status(response).await?;

                let raw: TmdbPage = response.json().await?;
                let listing = MoviePage::from(raw);

                tracing::info!(
                    page,
                    results = listing.results.len(),
                    provider = "tmdb",
                    "Popular movies fetched"
                );

                Ok::<MoviePage, AppError>(listing)
            }
        )
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}
