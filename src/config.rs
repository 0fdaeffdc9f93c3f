use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Movie metadata provider (TMDB) API key
    pub tmdb_api_key: String,

    /// Movie metadata provider base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// Language requested for movie detail lookups
    #[serde(default = "default_tmdb_language")]
    pub tmdb_language: String,

    /// Backend REST API (auth, profile, catalog, watchlist)
    #[serde(default = "default_backend_api_url")]
    pub backend_api_url: String,

    /// Chat recommendation backend
    #[serde(default = "default_recommend_api_url")]
    pub recommend_api_url: String,

    /// Redis connection URL. Caching is disabled when unset.
    #[serde(default)]
    pub redis_url: Option<String>,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_rust_log")]
    pub rust_log: String,

    /// Fixed fee added to every booking
    #[serde(default = "default_service_fee")]
    pub service_fee: u32,

    /// Simulated payment processing time
    #[serde(default = "default_payment_delay_ms")]
    pub payment_delay_ms: u64,

    /// Probability that a seat shows up as already booked
    #[serde(default = "default_occupancy_rate")]
    pub occupancy_rate: f64,

    #[serde(default = "default_movie_id")]
    pub default_movie_id: String,

    #[serde(default = "default_time")]
    pub default_time: String,

    #[serde(default = "default_cinema")]
    pub default_cinema: String,
}

/// Booking flow settings taken from [`Config`]
#[derive(Debug, Clone, PartialEq)]
pub struct BookingConfig {
    pub service_fee: u32,
    pub payment_delay_ms: u64,
    pub occupancy_rate: f64,
    pub default_movie_id: String,
    pub default_time: String,
    pub default_cinema: String,
}

impl Default for BookingConfig {
    fn default() -> Self {
        default_booking()
    }
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_tmdb_language() -> String {
    "fr-FR".to_string()
}

fn default_backend_api_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_recommend_api_url() -> String {
    "http://localhost:8088".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_rust_log() -> String {
    "cinema_booking=debug,tower_http=info".to_string()
}

fn default_service_fee() -> u32 {
    5
}

fn default_payment_delay_ms() -> u64 {
    2000
}

fn default_occupancy_rate() -> f64 {
    0.18
}

fn default_movie_id() -> String {
    "385687".to_string()
}

fn default_time() -> String {
    "13:00 VF".to_string()
}

fn default_cinema() -> String {
    "Pathé Californie".to_string()
}

fn default_booking() -> BookingConfig {
    BookingConfig {
        service_fee: default_service_fee(),
        payment_delay_ms: default_payment_delay_ms(),
        occupancy_rate: default_occupancy_rate(),
        default_movie_id: default_movie_id(),
        default_time: default_time(),
        default_cinema: default_cinema(),
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let config = envy::from_env::<Config>()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

        if !(0.0..=1.0).contains(&config.occupancy_rate) {
            anyhow::bail!(
                "OCCUPANCY_RATE must be between 0 and 1, got {}",
                config.occupancy_rate
            );
        }

        Ok(config)
    }

    /// Booking flow settings
    pub fn booking(&self) -> BookingConfig {
        BookingConfig {
            service_fee: self.service_fee,
            payment_delay_ms: self.payment_delay_ms,
            occupancy_rate: self.occupancy_rate,
            default_movie_id: self.default_movie_id.clone(),
            default_time: self.default_time.clone(),
            default_cinema: self.default_cinema.clone(),
        }
    }
}
