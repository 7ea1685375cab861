/// TMDB (The Movie Database) metadata provider
///
/// API Flow:
/// 1. Details: GET /3/movie/{id}?api_key=...&language=... → title, overview,
///    vote_average, genres, poster_path
///
/// Each outbound call first passes the shared rate limiter. Successful
/// responses are cached in Redis when a cache is configured; cache hits make
/// no outbound call and skip the limiter.
use std::{sync::Arc, time::Duration};

use reqwest::Client as HttpClient;

use crate::{
    cached,
    db::{Cache, CacheKey},
    error::{AppError, AppResult},
    models::{MovieId, MovieMetadata},
    services::{providers::MetadataProvider, rate_limit::RateLimiter},
};

const DEFAULT_CACHE_TTL: u64 = 86_400; // 1 day

/// Builds the shared HTTP client with a fixed per-request timeout
pub fn build_http_client(timeout: Duration) -> AppResult<HttpClient> {
    Ok(HttpClient::builder().timeout(timeout).build()?)
}

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    language: String,
    limiter: Arc<RateLimiter>,
    cache: Option<Cache>,
    cache_ttl: u64,
}

impl TmdbProvider {
    /// Creates a provider with no rate limiting and no cache
    pub fn new(http_client: HttpClient, api_key: String, api_url: String, language: String) -> Self {
        Self {
            http_client,
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
            language,
            limiter: Arc::new(RateLimiter::disabled()),
            cache: None,
            cache_ttl: DEFAULT_CACHE_TTL,
        }
    }

    pub fn with_rate_limiter(mut self, limiter: Arc<RateLimiter>) -> Self {
        self.limiter = limiter;
        self
    }

    pub fn with_cache(mut self, cache: Cache, ttl: u64) -> Self {
        self.cache = Some(cache);
        self.cache_ttl = ttl;
        self
    }

    fn details_url(&self, id: MovieId) -> String {
        format!("{}/3/movie/{}", self.api_url, id)
    }

    async fn fetch_from_api(&self, id: MovieId) -> AppResult<MovieMetadata> {
        self.limiter.wait().await;

        let response = self
            .http_client
            .get(self.details_url(id))
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("language", self.language.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "TMDB API returned status {}: {}",
                status, body
            )));
        }

        let metadata: MovieMetadata = response.json().await?;

        tracing::info!(
            movie_id = %id,
            title = metadata.title.as_deref().unwrap_or_default(),
            provider = self.name(),
            "Movie details fetched"
        );

        Ok(metadata)
    }
}

#[async_trait::async_trait]
impl MetadataProvider for TmdbProvider {
    async fn fetch(&self, id: MovieId) -> AppResult<MovieMetadata> {
        let key = CacheKey::MovieDetails {
            id,
            language: self.language.clone(),
        };

        cached!(&self.cache, key, self.cache_ttl, async move {
            self.fetch_from_api(id).await
        })
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}
