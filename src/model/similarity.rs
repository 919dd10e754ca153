use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::utils::math::vector::math::cosine_from_parts;
use crate::vectorizer::VectorMatrix;

/// Dense N×N cosine similarity matrix, row-major.
///
/// `sim[i][j] == sim[j][i]`, values in [0, 1], diagonal 1.0 for rows with
/// a non-zero vector and 0.0 for all-zero rows.
///
/// Memory is O(N²): the whole design assumes a corpus of thousands of
/// movies, not millions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityMatrix {
    n: usize,
    values: Vec<f32>,
}

impl SimilarityMatrix {
    /// Compute every pairwise cosine similarity of `matrix`'s rows.
    ///
    /// O(N²·D) where D is the number of non-zero terms per row;
    /// rows are filled in parallel.
    pub fn build(matrix: &VectorMatrix) -> Self {
        let rows = matrix.rows();
        let n = rows.len();
        if n == 0 {
            return Self { n, values: Vec::new() };
        }
        let norms: Vec<f64> = rows.par_iter().map(|row| row.norm()).collect();

        let mut values = vec![0_f32; n * n];
        values
            .par_chunks_mut(n)
            .enumerate()
            .for_each(|(i, out)| {
                let row_i = &rows[i];
                for (j, cell) in out.iter_mut().enumerate() {
                    *cell = if i == j {
                        // 自己類似度は 1.0 固定、ゼロベクトルだけ 0.0
                        if norms[i] == 0.0 { 0.0 } else { 1.0 }
                    } else {
                        let dot = row_i.dot(&rows[j]);
                        cosine_from_parts(dot, norms[i], norms[j]).clamp(0.0, 1.0) as f32
                    };
                }
            });
        info!(movies = n, cells = n * n, "computed similarity matrix");
        Self { n, values }
    }

    /// number of rows (= columns)
    #[inline]
    pub fn len(&self) -> usize {
        self.n
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Similarity row of movie `i`
    #[inline]
    pub fn row(&self, i: usize) -> Option<&[f32]> {
        if i >= self.n {
            return None;
        }
        self.values.get(i * self.n..(i + 1) * self.n)
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> Option<f32> {
        self.row(i).and_then(|row| row.get(j).copied())
    }

    /// true when the backing buffer really holds N×N cells
    pub(crate) fn is_well_formed(&self) -> bool {
        self.n.checked_mul(self.n) == Some(self.values.len())
    }
}
