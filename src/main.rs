use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use movie_recommender::{
    config::Config,
    db::{self, Cache, CacheWriterHandle},
    routes::{create_router, AppState},
    services::{
        providers::{tmdb::build_http_client, TmdbProvider},
        Enricher, RateLimiter, RecommendationEngine,
    },
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;

    // Nothing is served without the catalog and matrix
    let engine = match load_engine(&config) {
        Ok(engine) => engine,
        Err(e) => {
            tracing::error!(error = %e, "Model files could not be loaded");
            return Err(e.into());
        }
    };

    let (enricher, cache_writer) = build_enricher(&config)?;

    let state = AppState {
        engine: Arc::new(engine),
        enricher,
        default_recommendations: config.default_recommendations,
        max_recommendations: config.max_recommendations,
    };
    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(handle) = cache_writer {
        handle.shutdown().await;
    }
    tracing::info!("Server stopped");

    Ok(())
}

fn load_engine(config: &Config) -> movie_recommender::error::AppResult<RecommendationEngine> {
    let catalog = db::load_catalog(&config.catalog_path)?;
    let similarity = db::load_similarity(&config.similarity_path)?;
    RecommendationEngine::new(catalog, similarity)
}

fn build_enricher(config: &Config) -> anyhow::Result<(Enricher, Option<CacheWriterHandle>)> {
    let http_client = build_http_client(config.request_timeout())?;
    let limiter = Arc::new(RateLimiter::new(config.fetch_delay()));

    let mut provider = TmdbProvider::new(
        http_client,
        config.tmdb_api_key.clone(),
        config.tmdb_api_url.clone(),
        config.tmdb_language.clone(),
    )
    .with_rate_limiter(limiter.clone());

    let mut cache_writer = None;
    if let Some(redis_url) = &config.redis_url {
        let client = db::create_redis_client(redis_url)?;
        let (cache, handle) = Cache::with_timeout(client, config.cache_timeout());
        provider = provider.with_cache(cache, config.metadata_cache_ttl_secs);
        cache_writer = Some(handle);
    }

    tracing::info!(
        delay_ms = limiter.delay().as_millis() as u64,
        timeout_secs = config.request_timeout_secs,
        concurrency = config.enrich_concurrency,
        cache = cache_writer.is_some(),
        "Metadata provider configured"
    );

    let enricher = Enricher::new(Arc::new(provider), config.tmdb_image_base_url.clone())
        .with_concurrency(config.enrich_concurrency);

    Ok((enricher, cache_writer))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
