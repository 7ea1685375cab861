use std::collections::HashMap;

use super::{CatalogEntry, MovieRecord};

/// Ordered collection of movies indexed by position
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    movies: Vec<MovieRecord>,
    /// Title → first position carrying that title
    by_title: HashMap<String, usize>,
}

impl Catalog {
    /// Builds a catalog from entries in position order
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        let mut movies = Vec::with_capacity(entries.len());
        let mut by_title = HashMap::with_capacity(entries.len());

        for (position, entry) in entries.into_iter().enumerate() {
            by_title.entry(entry.title.clone()).or_insert(position);
            movies.push(MovieRecord {
                position,
                id: entry.movie_id,
                title: entry.title,
            });
        }

        Self { movies, by_title }
    }

    /// Resolves a title to its position; duplicates resolve to the first occurrence
    pub fn resolve_position(&self, title: &str) -> Option<usize> {
        self.by_title.get(title).copied()
    }

    pub fn get(&self, position: usize) -> Option<&MovieRecord> {
        self.movies.get(position)
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MovieRecord> {
        self.movies.iter()
    }

    /// Case-insensitive substring match over titles, in position order
    pub fn search<'a>(&'a self, query: &str) -> impl Iterator<Item = &'a MovieRecord> + 'a {
        let needle = query.trim().to_lowercase();
        self.movies
            .iter()
            .filter(move |movie| needle.is_empty() || movie.title.to_lowercase().contains(&needle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MovieId;

    fn entry(id: u64, title: &str) -> CatalogEntry {
        CatalogEntry {
            movie_id: MovieId(id),
            title: title.to_string(),
        }
    }

    fn create_test_catalog() -> Catalog {
        Catalog::new(vec![
            entry(19995, "Avatar"),
            entry(285, "Pirates of the Caribbean: At World's End"),
            entry(206647, "Spectre"),
            entry(49026, "The Dark Knight Rises"),
        ])
    }

    #[test]
    fn test_positions_follow_insertion_order() {
        let catalog = create_test_catalog();
        assert_eq!(catalog.len(), 4);
        for (expected, movie) in catalog.iter().enumerate() {
            assert_eq!(movie.position, expected);
        }
        assert_eq!(catalog.get(2).unwrap().id, MovieId(206647));
        assert!(catalog.get(4).is_none());
    }

    #[test]
    fn test_resolve_position_found() {
        let catalog = create_test_catalog();
        assert_eq!(catalog.resolve_position("Spectre"), Some(2));
    }

    #[test]
    fn test_resolve_position_is_exact_match() {
        let catalog = create_test_catalog();
        assert_eq!(catalog.resolve_position("spectre"), None);
        assert_eq!(catalog.resolve_position("Spectre "), None);
        assert_eq!(catalog.resolve_position("Titanic"), None);
    }

    #[test]
    fn test_resolve_position_duplicate_titles_pick_first() {
        let catalog = Catalog::new(vec![
            entry(1, "Hamlet"),
            entry(2, "Heat"),
            entry(3, "Hamlet"),
        ]);
        assert_eq!(catalog.resolve_position("Hamlet"), Some(0));
        assert_eq!(catalog.get(2).unwrap().title, "Hamlet");
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let catalog = create_test_catalog();
        let titles: Vec<&str> = catalog.search("the").map(|m| m.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "Pirates of the Caribbean: At World's End",
                "The Dark Knight Rises"
            ]
        );
    }

    #[test]
    fn test_search_blank_query_returns_everything() {
        let catalog = create_test_catalog();
        assert_eq!(catalog.search("  ").count(), 4);
    }

    #[test]
    fn test_empty_catalog() {
        let catalog = Catalog::new(vec![]);
        assert!(catalog.is_empty());
        assert_eq!(catalog.resolve_position("Avatar"), None);
    }
}
