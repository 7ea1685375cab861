use serde::Deserialize;
use std::time::Duration;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Path to the serialized movie catalog (JSON array of `{movie_id, title}`)
    #[serde(default = "default_catalog_path")]
    pub catalog_path: String,

    /// Path to the serialized similarity matrix (JSON array of rows)
    #[serde(default = "default_similarity_path")]
    pub similarity_path: String,

    /// TMDB API key
    pub tmdb_api_key: String,

    /// TMDB API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// Base URL poster paths are appended to
    #[serde(default = "default_tmdb_image_base_url")]
    pub tmdb_image_base_url: String,

    /// Language parameter sent with every TMDB request
    #[serde(default = "default_tmdb_language")]
    pub tmdb_language: String,

    /// Per-call timeout for metadata requests
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Delay before each outbound metadata request; 0 disables it
    #[serde(default = "default_fetch_delay_ms")]
    pub fetch_delay_ms: u64,

    /// Number of enrichments allowed in flight per request
    #[serde(default = "default_enrich_concurrency")]
    pub enrich_concurrency: usize,

    /// Result count used when a request does not pass `k`
    #[serde(default = "default_recommendations")]
    pub default_recommendations: usize,

    /// Upper bound on `k`
    #[serde(default = "default_max_recommendations")]
    pub max_recommendations: usize,

    /// Redis connection URL; metadata caching is disabled when unset
    #[serde(default)]
    pub redis_url: Option<String>,

    /// TTL for cached metadata responses
    #[serde(default = "default_metadata_cache_ttl_secs")]
    pub metadata_cache_ttl_secs: u64,

    /// Bound on each Redis read or write; a slower read counts as a miss
    #[serde(default = "default_cache_timeout_ms")]
    pub cache_timeout_ms: u64,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_catalog_path() -> String {
    "model/movie_list.json".to_string()
}

fn default_similarity_path() -> String {
    "model/similarity.json".to_string()
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org".to_string()
}

fn default_tmdb_image_base_url() -> String {
    "https://image.tmdb.org/t/p/w500".to_string()
}

fn default_tmdb_language() -> String {
    "en-US".to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_fetch_delay_ms() -> u64 {
    1000
}

fn default_enrich_concurrency() -> usize {
    1
}

fn default_recommendations() -> usize {
    5
}

fn default_max_recommendations() -> usize {
    20
}

fn default_metadata_cache_ttl_secs() -> u64 {
    86_400
}

fn default_cache_timeout_ms() -> u64 {
    250
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let config = envy::from_env::<Config>()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.enrich_concurrency == 0 {
            anyhow::bail!("ENRICH_CONCURRENCY must be at least 1");
        }
        if self.cache_timeout_ms == 0 {
            anyhow::bail!("CACHE_TIMEOUT_MS must be at least 1");
        }
        if self.default_recommendations == 0
            || self.default_recommendations > self.max_recommendations
        {
            anyhow::bail!(
                "DEFAULT_RECOMMENDATIONS must be between 1 and MAX_RECOMMENDATIONS ({})",
                self.max_recommendations
            );
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn fetch_delay(&self) -> Duration {
        Duration::from_millis(self.fetch_delay_ms)
    }

    pub fn cache_timeout(&self) -> Duration {
        Duration::from_millis(self.cache_timeout_ms)
    }
}
