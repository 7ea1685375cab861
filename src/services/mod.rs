pub mod enrichment;
pub mod providers;
pub mod rate_limit;
pub mod recommendations;

pub use enrichment::{EnrichOutcome, Enricher};
pub use rate_limit::RateLimiter;
pub use recommendations::{RankedMovie, RecommendationEngine, RecommendationResult};
