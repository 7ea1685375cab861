use serde::{Deserialize, Serialize};
use std::fmt::Display;

pub mod catalog;
pub mod detail;
pub mod similarity;

pub use catalog::Catalog;
pub use detail::EnrichedDetail;
pub use similarity::SimilarityMatrix;

/// External stable identifier of a movie (TMDB numeric id)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MovieId(pub u64);

impl Display for MovieId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A catalog entry. `position` is the row/column index in the similarity matrix.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovieRecord {
    pub position: usize,
    pub id: MovieId,
    pub title: String,
}

/// On-disk shape of a catalog entry; position is implied by array order
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogEntry {
    pub movie_id: MovieId,
    pub title: String,
}

// ============================================================================
// TMDB API Types
// ============================================================================

/// Response from GET /3/movie/{id}
///
/// Every field is optional: a missing field is substituted with a placeholder
/// during enrichment rather than failing the decode.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MovieMetadata {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub genres: Option<Vec<Genre>>,
    #[serde(default)]
    pub poster_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Genre {
    #[serde(default)]
    pub id: Option<u64>,
    pub name: String,
}
