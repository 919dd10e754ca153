use std::cmp::Ordering;

use num::Num;

use super::SpVec;

impl<N> SpVec<N>
where
    N: Num + Copy + Into<f64>,
{
    /// ドット積
    /// d(a, b) = Σ(a_i * b_i)
    ///
    /// Accumulated in f64, merging both index lists in ascending order
    /// so that `a.dot(b)` and `b.dot(a)` are bit-identical.
    #[inline]
    pub fn dot(&self, other: &Self) -> f64 {
        debug_assert_eq!(self.len(), other.len(), "dimension mismatch");
        let mut a_it = self.raw_iter().fuse();
        let mut b_it = other.raw_iter().fuse();
        let mut a_next = a_it.next();
        let mut b_next = b_it.next();
        let mut dot = 0_f64;
        while let (Some((ia, va)), Some((ib, vb))) = (a_next, b_next) {
            match ia.cmp(&ib) {
                Ordering::Equal => {
                    let (va, vb): (f64, f64) = (va.into(), vb.into());
                    dot += va * vb;
                    a_next = a_it.next();
                    b_next = b_it.next();
                }
                Ordering::Less => a_next = a_it.next(),
                Ordering::Greater => b_next = b_it.next(),
            }
        }
        dot
    }

    /// ||a|| = sqrt(Σ(a_i^2))
    #[inline]
    pub fn norm(&self) -> f64 {
        self.raw_iter()
            .map(|(_, v)| {
                let v: f64 = v.into();
                v * v
            })
            .sum::<f64>()
            .sqrt()
    }

    /// コサイン類似度
    /// cos(θ) = Σ(a_i * b_i) / (||a|| * ||b||)
    ///
    /// Zero vectors score 0.0 against everything, never NaN.
    #[inline]
    pub fn cosine_similarity(&self, other: &Self) -> f64 {
        cosine_from_parts(self.dot(other), self.norm(), other.norm())
    }
}

/// cosine from a precomputed dot product and norms, with the zero-norm guard
#[inline]
pub fn cosine_from_parts(dot: f64, norm_a: f64, norm_b: f64) -> f64 {
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dot_only_counts_shared_indices() {
        let a = SpVec::from_pairs(6, vec![(0, 1.0_f32), (2, 2.0), (5, 3.0)]);
        let b = SpVec::from_pairs(6, vec![(2, 4.0_f32), (3, 7.0), (5, 1.0)]);
        assert_eq!(a.dot(&b), 11.0);
        assert_eq!(a.dot(&b), b.dot(&a));
    }

    #[test]
    fn cosine_of_parallel_and_orthogonal_vectors() {
        let a = SpVec::from_pairs(3, vec![(0, 1.0_f64), (1, 1.0)]);
        let b = SpVec::from_pairs(3, vec![(0, 3.0_f64), (1, 3.0)]);
        let c = SpVec::from_pairs(3, vec![(2, 5.0_f64)]);
        assert!((a.cosine_similarity(&b) - 1.0).abs() < 1e-12);
        assert_eq!(a.cosine_similarity(&c), 0.0);
    }

    #[test]
    fn zero_vector_never_yields_nan() {
        let zero: SpVec<f32> = SpVec::new(3);
        let a = SpVec::from_pairs(3, vec![(1, 2.0_f32)]);
        assert_eq!(zero.cosine_similarity(&a), 0.0);
        assert_eq!(zero.cosine_similarity(&zero), 0.0);
        assert_eq!(cosine_from_parts(0.0, 0.0, 0.0), 0.0);
    }
}
