use serde::de::DeserializeOwned;
use std::{fs::File, io::BufReader, path::Path};

use crate::{
    error::{AppError, AppResult},
    models::{Catalog, CatalogEntry, SimilarityMatrix},
};

/// Loads the movie catalog: a JSON array of `{movie_id, title}` in position order
pub fn load_catalog(path: impl AsRef<Path>) -> AppResult<Catalog> {
    let path = path.as_ref();
    let entries: Vec<CatalogEntry> = read_json(path)?;

    if entries.is_empty() {
        return Err(AppError::artifact(path.display().to_string(), "catalog is empty"));
    }

    let catalog = Catalog::new(entries);
    tracing::info!(path = %path.display(), movies = catalog.len(), "Loaded movie catalog");
    Ok(catalog)
}

/// Loads the similarity matrix: a JSON array of equally sized numeric rows
pub fn load_similarity(path: impl AsRef<Path>) -> AppResult<SimilarityMatrix> {
    let path = path.as_ref();
    let rows: Vec<Vec<f64>> = read_json(path)?;

    let matrix = SimilarityMatrix::from_rows(rows)
        .map_err(|e| AppError::artifact(path.display().to_string(), e))?;

    tracing::info!(path = %path.display(), size = matrix.size(), "Loaded similarity matrix");
    Ok(matrix)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> AppResult<T> {
    let file = File::open(path).map_err(|e| AppError::artifact(path.display().to_string(), e))?;
    serde_json::from_reader(BufReader::new(file))
        .map_err(|e| AppError::artifact(path.display().to_string(), e))
}
