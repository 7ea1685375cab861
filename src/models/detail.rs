use serde::{Deserialize, Serialize};

use super::MovieMetadata;

pub const NO_IMAGE_POSTER: &str = "https://via.placeholder.com/500x750?text=No+Image";
pub const ERROR_POSTER: &str = "https://via.placeholder.com/500x750?text=Error";
pub const UNKNOWN_TITLE: &str = "Unknown";
pub const ERROR_TITLE: &str = "Error";
pub const NO_OVERVIEW: &str = "No description available";
pub const ERROR_OVERVIEW: &str = "Could not fetch movie details.";
pub const NOT_AVAILABLE: &str = "N/A";

/// Display-ready movie details. Every field is always populated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedDetail {
    pub poster_url: String,
    pub title: String,
    pub overview: String,
    pub rating: String,
    pub genre: String,
}

impl EnrichedDetail {
    /// Builds details from a metadata response, substituting placeholders
    /// for absent or empty fields
    pub fn from_metadata(metadata: MovieMetadata, image_base_url: &str) -> Self {
        let poster_url = match non_empty(metadata.poster_path) {
            Some(path) => format!(
                "{}/{}",
                image_base_url.trim_end_matches('/'),
                path.trim_start_matches('/')
            ),
            None => NO_IMAGE_POSTER.to_string(),
        };

        let genre = metadata
            .genres
            .map(|genres| {
                genres
                    .into_iter()
                    .map(|g| g.name)
                    .filter(|name| !name.trim().is_empty())
                    .collect::<Vec<_>>()
                    .join(", ")
            })
            .and_then(|joined| non_empty(Some(joined)))
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());

        Self {
            poster_url,
            title: non_empty(metadata.title).unwrap_or_else(|| UNKNOWN_TITLE.to_string()),
            overview: non_empty(metadata.overview).unwrap_or_else(|| NO_OVERVIEW.to_string()),
            rating: metadata
                .vote_average
                .filter(|v| v.is_finite())
                .map(|v| format!("{:.1}", v))
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            genre,
        }
    }

    /// Placeholder details used when the metadata fetch failed
    pub fn fetch_failed() -> Self {
        Self {
            poster_url: ERROR_POSTER.to_string(),
            title: ERROR_TITLE.to_string(),
            overview: ERROR_OVERVIEW.to_string(),
            rating: NOT_AVAILABLE.to_string(),
            genre: NOT_AVAILABLE.to_string(),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}
