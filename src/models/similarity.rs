/// Square similarity matrix, row-major. Entry (i, j) is the similarity between
/// catalog positions i and j.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatrix {
    size: usize,
    scores: Vec<f64>,
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum MatrixShapeError {
    #[error("row {row} has {len} columns, expected {expected}")]
    NotSquare {
        row: usize,
        len: usize,
        expected: usize,
    },

    #[error("entry ({row}, {col}) is not a finite number")]
    NonFinite { row: usize, col: usize },
}

impl SimilarityMatrix {
    /// Builds a matrix from rows, rejecting ragged or non-finite input
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, MatrixShapeError> {
        let size = rows.len();
        let mut scores = Vec::with_capacity(size * size);

        for (row, values) in rows.into_iter().enumerate() {
            if values.len() != size {
                return Err(MatrixShapeError::NotSquare {
                    row,
                    len: values.len(),
                    expected: size,
                });
            }
            if let Some(col) = values.iter().position(|v| !v.is_finite()) {
                return Err(MatrixShapeError::NonFinite { row, col });
            }
            scores.extend(values);
        }

        Ok(Self { size, scores })
    }

    /// Number of rows (and columns)
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn row(&self, index: usize) -> Option<&[f64]> {
        if index >= self.size {
            return None;
        }
        let start = index * self.size;
        Some(&self.scores[start..start + self.size])
    }
}
