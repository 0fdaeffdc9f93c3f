use reqwest::Client as HttpClient;

use crate::{
    error::{AppError, AppResult},
    models::{ChatReply, ChatRequest},
};

/// Conversational movie recommendations.
///
/// The user's free-text message is forwarded to the recommendation backend,
/// which answers with a short assistant message, the mood it detected and a
/// list of matching movies.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait Recommender: Send + Sync {
    async fn chat(&self, message: &str) -> AppResult<ChatReply>;
}

#[derive(Clone)]
pub struct HttpRecommender {
    http_client: HttpClient,
    api_url: String,
}

impl HttpRecommender {
    pub fn new(api_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_url: api_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait::async_trait]
impl Recommender for HttpRecommender {
    async fn chat(&self, message: &str) -> AppResult<ChatReply> {
        let message = message.trim();
        if message.is_empty() {
            return Err(AppError::InvalidInput("Message cannot be empty".to_string()));
        }

        let url = format!("{}/api/movies/recommend", self.api_url);
        let response = self
            .http_client
            .post(&url)
            .json(&ChatRequest {
                message: message.to_string(),
            })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "Recommendation API returned status {}: {}",
                status, body
            )));
        }

        let reply: ChatReply = response.json().await?;

        tracing::info!(
            mood = %reply.mood,
            movies = reply.movies.len(),
            "Recommendations received"
        );

        Ok(reply)
    }
}
