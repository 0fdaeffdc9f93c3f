//! Client for the account backend: authentication, profile, catalog and
//! watchlist. Requests that act for a user carry their bearer token.

use reqwest::{Client as HttpClient, RequestBuilder, Response, StatusCode};
use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    models::{CatalogPage, Credentials, LoginResponse, Registration, UserProfile, WatchlistEntry},
};

const DEFAULT_PAGE_SIZE: u32 = 10;

/// Catalog listing parameters as received from the client
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct CatalogQuery {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub size: Option<u32>,
}

impl CatalogQuery {
    /// Backend query parameters: zero-based page, newest releases first
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("page", self.page.unwrap_or(0).to_string()),
            ("size", self.size.unwrap_or(DEFAULT_PAGE_SIZE).to_string()),
            ("sortBy", "releaseDate".to_string()),
            ("direction", "desc".to_string()),
        ];

        if let Some(search) = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            params.push(("title", search.to_string()));
        }

        params
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait BackendApi: Send + Sync {
    async fn login(&self, credentials: &Credentials) -> AppResult<LoginResponse>;

    async fn register(&self, registration: &Registration) -> AppResult<serde_json::Value>;

    async fn user_profile(&self, token: &str) -> AppResult<UserProfile>;

    async fn catalog(&self, token: &str, query: &CatalogQuery) -> AppResult<CatalogPage>;

    /// Adds a movie to the backend catalog. The body is forwarded untouched.
    async fn create_catalog_movie(
        &self,
        token: &str,
        movie: &serde_json::Value,
    ) -> AppResult<serde_json::Value>;

    async fn watchlist(&self, token: &str) -> AppResult<Vec<WatchlistEntry>>;

    async fn add_to_watchlist(
        &self,
        token: &str,
        entry: &WatchlistEntry,
    ) -> AppResult<serde_json::Value>;

    async fn remove_from_watchlist(&self, token: &str, movie_id: u64) -> AppResult<()>;
}

#[derive(Clone)]
pub struct HttpBackend {
    http_client: HttpClient,
    api_url: String,
}

impl HttpBackend {
    pub fn new(api_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_url: api_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    async fn send(&self, request: RequestBuilder) -> AppResult<Response> {
        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(AppError::Unauthorized);
        }

        let body = response.text().await.unwrap_or_default();
        tracing::warn!(status = %status, body = %body, "Backend request failed");
        Err(AppError::ExternalApi(format!(
            "Backend API returned status {}: {}",
            status, body
        )))
    }
}

#[async_trait::async_trait]
impl BackendApi for HttpBackend {
    async fn login(&self, credentials: &Credentials) -> AppResult<LoginResponse> {
        let request = self.http_client.post(self.url("/auth/login")).json(credentials);
        let login: LoginResponse = self.send(request).await?.json().await?;

        if login.token.is_none() {
            return Err(AppError::ExternalApi(
                "Backend login returned no token".to_string(),
            ));
        }

        tracing::info!(email = %credentials.email, "User logged in");
        Ok(login)
    }

    async fn register(&self, registration: &Registration) -> AppResult<serde_json::Value> {
        let request = self
            .http_client
            .post(self.url("/auth/register"))
            .json(registration);
        let body = self.send(request).await?.json().await?;

        tracing::info!(email = %registration.email, "User registered");
        Ok(body)
    }

    async fn user_profile(&self, token: &str) -> AppResult<UserProfile> {
        let request = self
            .http_client
            .get(self.url("/user/user-profile"))
            .bearer_auth(token);
        Ok(self.send(request).await?.json().await?)
    }

    async fn catalog(&self, token: &str, query: &CatalogQuery) -> AppResult<CatalogPage> {
        let request = self
            .http_client
            .get(self.url("/movies"))
            .query(&query.to_params())
            .bearer_auth(token);
        Ok(self.send(request).await?.json().await?)
    }

    async fn create_catalog_movie(
        &self,
        token: &str,
        movie: &serde_json::Value,
    ) -> AppResult<serde_json::Value> {
        let request = self
            .http_client
            .post(self.url("/movies"))
            .json(movie)
            .bearer_auth(token);
        let created = self.send(request).await?.json().await?;

        tracing::info!("Catalog movie created");
        Ok(created)
    }

    async fn watchlist(&self, token: &str) -> AppResult<Vec<WatchlistEntry>> {
        let request = self
            .http_client
            .get(self.url("/users/watchlist"))
            .bearer_auth(token);
        Ok(self.send(request).await?.json().await?)
    }

    async fn add_to_watchlist(
        &self,
        token: &str,
        entry: &WatchlistEntry,
    ) -> AppResult<serde_json::Value> {
        let request = self
            .http_client
            .post(self.url("/users/watchlist"))
            .json(entry)
            .bearer_auth(token);
        let response = self.send(request).await?;

        // The backend answers an add with an empty body
        let text = response.text().await?;
        if text.trim().is_empty() {
            return Ok(serde_json::json!({ "movieId": entry.movie_id }));
        }
        serde_json::from_str(&text)
            .map_err(|e| AppError::ExternalApi(format!("Failed to parse backend response: {}", e)))
    }

    async fn remove_from_watchlist(&self, token: &str, movie_id: u64) -> AppResult<()> {
        let request = self
            .http_client
            .delete(self.url(&format!("/users/watchlist/{}", movie_id)))
            .bearer_auth(token);
        self.send(request).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_catalog_params_defaults() {
        let params = CatalogQuery::default().to_params();
        assert_eq!(
            params,
            vec![
                ("page", "0".to_string()),
                ("size", "10".to_string()),
                ("sortBy", "releaseDate".to_string()),
                ("direction", "desc".to_string()),
            ]
        );
    }

    #[test]
    fn test_catalog_params_search_trimmed() {
        let query = CatalogQuery {
            search: Some("  dune ".to_string()),
            page: Some(2),
            size: Some(12),
        };
        let params = query.to_params();
        assert!(params.contains(&("title", "dune".to_string())));
        assert!(params.contains(&("page", "2".to_string())));

        let blank = CatalogQuery {
            search: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(!blank.to_params().iter().any(|(k, _)| *k == "title"));
    }

    #[tokio::test]
    async fn test_login_returns_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .and(body_json(serde_json::json!({"email": "ada@example.com", "password": "pw"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "token": "jwt",
                "firstName": "Ada"
            })))
            .mount(&server)
            .await;

        let backend = HttpBackend::new(server.uri());
        let login = backend
            .login(&Credentials {
                email: "ada@example.com".to_string(),
                password: "pw".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(login.token.as_deref(), Some("jwt"));
        assert_eq!(login.user["firstName"], "Ada");
    }

    #[tokio::test]
    async fn test_login_without_token_fails() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"firstName": "Ada"})))
            .mount(&server)
            .await;

        let backend = HttpBackend::new(server.uri());
        let result = backend
            .login(&Credentials {
                email: "ada@example.com".to_string(),
                password: "pw".to_string(),
            })
            .await;

        assert!(matches!(result, Err(AppError::ExternalApi(_))));
    }

    #[tokio::test]
    async fn test_profile_sends_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/user/user-profile"))
            .and(header("authorization", "Bearer jwt"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "firstName": "Ada",
                "lastName": "Lovelace",
                "email": "ada@example.com",
                "role": "USER"
            })))
            .mount(&server)
            .await;

        let profile = HttpBackend::new(server.uri()).user_profile("jwt").await.unwrap();
        assert_eq!(profile.last_name, "Lovelace");
    }

    #[tokio::test]
    async fn test_rejected_token_is_unauthorized() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/watchlist"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let result = HttpBackend::new(server.uri()).watchlist("expired").await;
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_catalog_query_forwarded() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/movies"))
            .and(query_param("sortBy", "releaseDate"))
            .and(query_param("direction", "desc"))
            .and(query_param("title", "dune"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "content": [{"id": 7, "title": "Dune"}],
                "totalPages": 1,
                "totalElements": 1,
                "number": 0
            })))
            .mount(&server)
            .await;

        let query = CatalogQuery {
            search: Some("dune".to_string()),
            ..Default::default()
        };
        let page = HttpBackend::new(server.uri()).catalog("jwt", &query).await.unwrap();
        assert_eq!(page.content[0].title, "Dune");
        assert_eq!(page.total_elements, 1);
    }

    #[tokio::test]
    async fn test_create_catalog_movie_forwards_body() {
        let server = MockServer::start().await;
        let movie = serde_json::json!({"title": "Arrival", "releaseDate": "2016-11-11"});
        Mock::given(method("POST"))
            .and(path("/movies"))
            .and(header("authorization", "Bearer jwt"))
            .and(body_json(movie.clone()))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "id": 12,
                "title": "Arrival"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let created = HttpBackend::new(server.uri())
            .create_catalog_movie("jwt", &movie)
            .await
            .unwrap();
        assert_eq!(created["id"], 12);
    }

    #[tokio::test]
    async fn test_create_catalog_movie_forbidden() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/movies"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let result = HttpBackend::new(server.uri())
            .create_catalog_movie("jwt", &serde_json::json!({"title": "Arrival"}))
            .await;
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_add_to_watchlist_empty_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/users/watchlist"))
            .and(body_json(serde_json::json!({"movieId": 42})))
            .respond_with(ResponseTemplate::new(201))
            .mount(&server)
            .await;

        let body = HttpBackend::new(server.uri())
            .add_to_watchlist("jwt", &WatchlistEntry { movie_id: 42 })
            .await
            .unwrap();
        assert_eq!(body["movieId"], 42);
    }

    #[tokio::test]
    async fn test_remove_from_watchlist() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/users/watchlist/42"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        HttpBackend::new(server.uri())
            .remove_from_watchlist("jwt", 42)
            .await
            .unwrap();
    }
}
