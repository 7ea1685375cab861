/// Movie metadata provider abstraction
///
/// The enrichment layer only needs one capability: given a movie id, return
/// its metadata or an error. TMDB is the production implementation; tests
/// substitute fast deterministic stubs.
use crate::{
    error::AppResult,
    models::{MovieId, MovieMetadata},
};

pub mod tmdb;

pub use tmdb::TmdbProvider;

/// Trait for movie metadata sources
///
/// Implementations own their transport policy (timeouts, rate limiting,
/// caching). Any failure is reported as an error; deciding what to show
/// instead is left to the caller.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Fetch metadata for a single movie
    async fn fetch(&self, id: MovieId) -> AppResult<MovieMetadata>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
