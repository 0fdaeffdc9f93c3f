use serde::{Deserialize, Serialize};

/// Profile returned by the backend for the signed-in user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

/// Backend login response: a bearer token plus whatever user fields it sends
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: Option<String>,
    #[serde(flatten)]
    pub user: serde_json::Map<String, serde_json::Value>,
}

/// Movie record as stored in the backend catalog
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CatalogMovie {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub poster_url: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
}

/// Paged catalog listing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CatalogPage {
    pub content: Vec<CatalogMovie>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_elements: u64,
    #[serde(default)]
    pub number: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WatchlistEntry {
    pub movie_id: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_response_keeps_user_fields() {
        let raw = serde_json::json!({
            "token": "jwt-token",
            "firstName": "Ada",
            "role": "USER"
        });

        let response: LoginResponse = serde_json::from_value(raw).unwrap();
        assert_eq!(response.token.as_deref(), Some("jwt-token"));
        assert_eq!(response.user["firstName"], "Ada");
        assert!(!response.user.contains_key("token"));
    }

    #[test]
    fn test_catalog_page_defaults() {
        let raw = serde_json::json!({
            "content": [{"id": 7, "title": "Dune", "posterUrl": "/dune.jpg"}]
        });

        let page: CatalogPage = serde_json::from_value(raw).unwrap();
        assert_eq!(page.content[0].poster_url.as_deref(), Some("/dune.jpg"));
        assert_eq!(page.total_pages, 0);
    }
}
