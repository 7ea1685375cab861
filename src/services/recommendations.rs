use std::cmp::Ordering;

use crate::{
    error::{AppError, AppResult},
    models::{Catalog, MovieRecord, SimilarityMatrix},
};

/// A recommended movie with its 1-based rank and similarity to the query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedMovie<'a> {
    pub rank: usize,
    pub movie: &'a MovieRecord,
    pub score: f64,
}

/// Ranked recommendations, best first. Empty when the title is unknown.
pub type RecommendationResult<'a> = Vec<RankedMovie<'a>>;

/// Ranks catalog movies by precomputed similarity
///
/// Owns the catalog and matrix for the lifetime of the process; both are
/// read-only once the engine is built.
#[derive(Debug)]
pub struct RecommendationEngine {
    catalog: Catalog,
    similarity: SimilarityMatrix,
}

impl RecommendationEngine {
    /// Creates an engine, checking that matrix rows line up with catalog positions
    pub fn new(catalog: Catalog, similarity: SimilarityMatrix) -> AppResult<Self> {
        if catalog.len() != similarity.size() {
            return Err(AppError::artifact(
                "similarity matrix",
                format!(
                    "matrix is {0}x{0} but the catalog has {1} movies",
                    similarity.size(),
                    catalog.len()
                ),
            ));
        }

        Ok(Self {
            catalog,
            similarity,
        })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Returns the `k` movies most similar to `title`
    ///
    /// Scores are non-increasing; equal scores keep ascending position order.
    /// The queried movie is filtered out by position, so the result holds
    /// even when another movie outscores its self-similarity.
    pub fn recommend(&self, title: &str, k: usize) -> RecommendationResult<'_> {
        let Some(position) = self.catalog.resolve_position(title) else {
            tracing::debug!(title = %title, "Title not in catalog");
            return Vec::new();
        };

        let Some(row) = self.similarity.row(position) else {
            return Vec::new();
        };

        let mut candidates: Vec<(usize, f64)> = row
            .iter()
            .copied()
            .enumerate()
            .filter(|&(other, _)| other != position)
            .collect();

        let k = k.min(candidates.len());
        if k == 0 {
            return Vec::new();
        }

        // Partition the top k to the front, then order only those.
        if k < candidates.len() {
            candidates.select_nth_unstable_by(k - 1, rank_order);
            candidates.truncate(k);
        }
        candidates.sort_by(rank_order);

        candidates
            .into_iter()
            .enumerate()
            .filter_map(|(i, (other, score))| {
                self.catalog.get(other).map(|movie| RankedMovie {
                    rank: i + 1,
                    movie,
                    score,
                })
            })
            .collect()
    }
}

/// Descending score, then ascending position
fn rank_order(a: &(usize, f64), b: &(usize, f64)) -> Ordering {
    b.1.partial_cmp(&a.1)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.0.cmp(&b.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CatalogEntry, MovieId};

    fn catalog_of(titles: &[&str]) -> Catalog {
        Catalog::new(
            titles
                .iter()
                .enumerate()
                .map(|(i, title)| CatalogEntry {
                    movie_id: MovieId(i as u64 + 1),
                    title: title.to_string(),
                })
                .collect(),
        )
    }

    fn create_test_engine() -> RecommendationEngine {
        let catalog = catalog_of(&["A", "B", "C", "D"]);
        let similarity = SimilarityMatrix::from_rows(vec![
            vec![1.0, 0.8, 0.8, 0.3],
            vec![0.8, 1.0, 0.5, 0.1],
            vec![0.8, 0.5, 1.0, 0.6],
            vec![0.3, 0.1, 0.6, 1.0],
        ])
        .unwrap();
        RecommendationEngine::new(catalog, similarity).unwrap()
    }

    fn positions(result: &RecommendationResult<'_>) -> Vec<usize> {
        result.iter().map(|r| r.movie.position).collect()
    }

    /// Deterministic pseudo-random matrix with a unit diagonal
    fn generated_matrix(n: usize, seed: u64) -> SimilarityMatrix {
        let mut state = seed;
        let mut next = move || {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            // Coarse buckets so ties actually occur
            ((state >> 33) % 10) as f64 / 10.0
        };
        let rows: Vec<Vec<f64>> = (0..n)
            .map(|i| (0..n).map(|j| if i == j { 1.0 } else { next() }).collect())
            .collect();
        SimilarityMatrix::from_rows(rows).unwrap()
    }

    #[test]
    fn test_tie_broken_by_ascending_position() {
        let engine = create_test_engine();
        let result = engine.recommend("A", 2);

        assert_eq!(positions(&result), vec![1, 2]);
        assert_eq!(result[0].rank, 1);
        assert_eq!(result[1].rank, 2);
        assert_eq!(result[0].score, 0.8);
        assert_eq!(result[1].movie.id, MovieId(3));
    }

    #[test]
    fn test_unknown_title_is_empty() {
        let engine = create_test_engine();
        assert!(engine.recommend("Z", 5).is_empty());
    }

    #[test]
    fn test_result_length_capped_at_catalog_size_minus_one() {
        let engine = create_test_engine();
        let result = engine.recommend("C", 10);
        assert_eq!(positions(&result), vec![0, 3, 1]);
    }

    #[test]
    fn test_k_zero_is_empty() {
        let engine = create_test_engine();
        assert!(engine.recommend("A", 0).is_empty());
    }

    #[test]
    fn test_single_movie_catalog_has_no_recommendations() {
        let engine = RecommendationEngine::new(
            catalog_of(&["Solo"]),
            SimilarityMatrix::from_rows(vec![vec![1.0]]).unwrap(),
        )
        .unwrap();
        assert!(engine.recommend("Solo", 5).is_empty());
    }

    #[test]
    fn test_self_excluded_even_when_not_maximal() {
        let engine = RecommendationEngine::new(
            catalog_of(&["A", "B", "C"]),
            SimilarityMatrix::from_rows(vec![
                vec![0.4, 0.9, 0.2],
                vec![0.9, 1.0, 0.1],
                vec![0.2, 0.1, 1.0],
            ])
            .unwrap(),
        )
        .unwrap();

        let result = engine.recommend("A", 2);
        assert_eq!(positions(&result), vec![1, 2]);
    }

    #[test]
    fn test_duplicate_title_uses_first_row() {
        let engine = RecommendationEngine::new(
            catalog_of(&["Twin", "Other", "Twin"]),
            SimilarityMatrix::from_rows(vec![
                vec![1.0, 0.9, 0.1],
                vec![0.9, 1.0, 0.2],
                vec![0.1, 0.2, 1.0],
            ])
            .unwrap(),
        )
        .unwrap();

        let result = engine.recommend("Twin", 2);
        assert_eq!(positions(&result), vec![1, 2]);
    }

    #[test]
    fn test_size_mismatch_rejected() {
        let err = RecommendationEngine::new(
            catalog_of(&["A", "B", "C"]),
            SimilarityMatrix::from_rows(vec![vec![1.0, 0.5], vec![0.5, 1.0]]).unwrap(),
        )
        .unwrap_err();
        assert!(matches!(err, AppError::ArtifactLoad { .. }));
    }

    #[test]
    fn test_recommend_is_idempotent() {
        let engine = create_test_engine();
        assert_eq!(engine.recommend("D", 3), engine.recommend("D", 3));
    }

    #[test]
    fn test_ranking_properties_hold_for_every_title() {
        let n = 40;
        let titles: Vec<String> = (0..n).map(|i| format!("Movie {i}")).collect();
        let refs: Vec<&str> = titles.iter().map(String::as_str).collect();
        let engine =
            RecommendationEngine::new(catalog_of(&refs), generated_matrix(n, 42)).unwrap();

        for (position, title) in titles.iter().enumerate() {
            for k in [1, 5, 39, 50] {
                let result = engine.recommend(title, k);
                assert_eq!(result.len(), k.min(n - 1));
                assert!(result.iter().all(|r| r.movie.position != position));

                for pair in result.windows(2) {
                    assert!(pair[0].score >= pair[1].score);
                    if pair[0].score == pair[1].score {
                        assert!(pair[0].movie.position < pair[1].movie.position);
                    }
                }
            }
        }
    }

    #[test]
    fn test_top_k_matches_full_stable_sort() {
        let n = 25;
        let titles: Vec<String> = (0..n).map(|i| format!("Movie {i}")).collect();
        let refs: Vec<&str> = titles.iter().map(String::as_str).collect();
        let matrix = generated_matrix(n, 7);
        let row: Vec<f64> = matrix.row(3).unwrap().to_vec();
        let engine = RecommendationEngine::new(catalog_of(&refs), matrix).unwrap();

        let mut expected: Vec<(usize, f64)> = row.into_iter().enumerate().collect();
        expected.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap());
        let expected: Vec<usize> = expected
            .into_iter()
            .map(|(pos, _)| pos)
            .filter(|&pos| pos != 3)
            .take(6)
            .collect();

        assert_eq!(positions(&engine.recommend("Movie 3", 6)), expected);
    }
}
