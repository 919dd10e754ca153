pub mod math;

use num::Num;
use serde::{Deserialize, Serialize};

/// SpVec はゼロ要素を持たない疎ベクトルです
/// indices と values を並列に持ち、
/// indices は昇順でソートされていることを保証します
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpVec<N>
where
    N: Num + Copy,
{
    /// logical dimension
    len: usize,
    inds: Vec<u32>,
    vals: Vec<N>,
}

impl<N> SpVec<N>
where
    N: Num + Copy,
{
    /// Empty (all-zero) vector of dimension `len`
    #[inline]
    pub fn new(len: usize) -> Self {
        SpVec {
            len,
            inds: Vec::new(),
            vals: Vec::new(),
        }
    }

    /// Build from `(index, value)` pairs in any order.
    /// Zero values are dropped, duplicate indices are summed.
    ///
    /// # Arguments
    /// * `len` - logical dimension, every index must be below it
    /// * `pairs` - non-zero entries
    pub fn from_pairs(len: usize, mut pairs: Vec<(u32, N)>) -> Self {
        pairs.sort_unstable_by_key(|(idx, _)| *idx);
        let mut inds: Vec<u32> = Vec::with_capacity(pairs.len());
        let mut vals: Vec<N> = Vec::with_capacity(pairs.len());
        for (idx, val) in pairs {
            debug_assert!((idx as usize) < len, "index {idx} out of dimension {len}");
            if inds.last() == Some(&idx) {
                if let Some(last) = vals.last_mut() {
                    *last = *last + val;
                }
            } else {
                inds.push(idx);
                vals.push(val);
            }
        }
        // 合算でゼロになったものも落とす
        let mut vec = SpVec { len, inds, vals };
        vec.retain_non_zero();
        vec
    }

    fn retain_non_zero(&mut self) {
        if self.vals.iter().all(|v| !v.is_zero()) {
            return;
        }
        let (inds, vals): (Vec<u32>, Vec<N>) = self
            .inds
            .iter()
            .zip(self.vals.iter())
            .filter(|(_, v)| !v.is_zero())
            .map(|(i, v)| (*i, *v))
            .unzip();
        self.inds = inds;
        self.vals = vals;
    }

    /// logical dimension
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// number of stored (non-zero) entries
    #[inline]
    pub fn nnz(&self) -> usize {
        self.inds.len()
    }

    /// true when every element is zero
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.inds.is_empty()
    }

    /// Value at `index`, zero when not stored
    #[inline]
    pub fn get(&self, index: usize) -> N {
        match self.inds.binary_search(&(index as u32)) {
            Ok(pos) => self.vals[pos],
            Err(_) => N::zero(),
        }
    }

    /// Iterate the stored entries in ascending index order
    #[inline]
    pub fn raw_iter(&self) -> impl Iterator<Item = (usize, N)> + '_ {
        self.inds
            .iter()
            .zip(self.vals.iter())
            .map(|(i, v)| (*i as usize, *v))
    }

    /// Apply `f` to every stored value, then drop entries that became zero
    pub fn map_values<M, F>(&self, f: F) -> SpVec<M>
    where
        M: Num + Copy,
        F: Fn(N) -> M,
    {
        let mut vec = SpVec {
            len: self.len,
            inds: self.inds.clone(),
            vals: self.vals.iter().map(|v| f(*v)).collect(),
        };
        vec.retain_non_zero();
        vec
    }
}
