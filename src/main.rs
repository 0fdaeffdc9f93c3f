use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cinema_booking::{
    cache::{create_redis_client, Cache, CacheWriterHandle},
    config::Config,
    routes::{create_router, AppState},
    services::{
        backend::HttpBackend, payment::SimulatedPayment, providers::TmdbProvider,
        recommendations::HttpRecommender, seat_map::SeatLayout,
    },
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.rust_log))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting cinema booking API");

    // A bad layout is a deployment mistake, never a per-request failure
    let layout = SeatLayout::cinema_default().context("Invalid seat layout")?;
    tracing::info!(
        seats = layout.catalog().len(),
        columns = layout.columns(),
        "Seat layout loaded"
    );

    let (cache, cache_writer): (Cache, Option<CacheWriterHandle>) = match &config.redis_url {
        Some(url) => {
            let (cache, handle) = Cache::new(create_redis_client(url)?);
            tracing::info!("Redis cache enabled");
            (cache, Some(handle))
        }
        None => {
            tracing::warn!("REDIS_URL not set, movie metadata will not be cached");
            (Cache::disabled(), None)
        }
    };

    let booking = config.booking();
    let state = Arc::new(AppState::new(
        Arc::new(TmdbProvider::new(
            cache,
            config.tmdb_api_key.clone(),
            config.tmdb_api_url.clone(),
            config.tmdb_language.clone(),
        )),
        Arc::new(HttpBackend::new(config.backend_api_url.clone())),
        Arc::new(HttpRecommender::new(config.recommend_api_url.clone())),
        Arc::new(SimulatedPayment::new(Duration::from_millis(
            booking.payment_delay_ms,
        ))),
        layout,
        booking,
    ));

    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(handle) = cache_writer {
        handle.shutdown().await;
    }

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
