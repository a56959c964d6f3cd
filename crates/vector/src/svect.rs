// This software is licensed under a dual license model:
//
// GNU Affero General Public License v3 (AGPLv3): You may use, modify, and
// distribute this software under the terms of the AGPLv3.
//
// Elastic License v2 (ELv2): You may also use, modify, and distribute this
// software under the Elastic License v2, which has specific restrictions.
//
// We welcome any commercial collaboration or support. For inquiries
// regarding the licenses, please contact us at:
// vectorchord-inquiry@tensorchord.ai
//
// Copyright (c) 2025 TensorChord Inc.

use crate::floating;
use crate::{VectorBorrowed, VectorOwned};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Keys of a sparse vector, e.g. `u32` feature ids or `String` terms.
pub trait SparseKey:
    Ord + Clone + Send + Sync + std::fmt::Debug + Serialize + for<'a> Deserialize<'a> + 'static
{
}

impl<K> SparseKey for K where
    K: Ord + Clone + Send + Sync + std::fmt::Debug + Serialize + for<'a> Deserialize<'a> + 'static
{
}

/// A sparse vector: only nonzero entries are stored, sorted by key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SVectOwned<K> {
    indexes: Vec<K>,
    values: Vec<f32>,
}

impl<K: SparseKey> SVectOwned<K> {
    #[inline(always)]
    pub fn new(indexes: Vec<K>, values: Vec<f32>) -> Self {
        Self::new_checked(indexes, values).expect("invalid data")
    }

    /// Requires strictly ascending keys and no explicit zeros.
    pub fn new_checked(indexes: Vec<K>, values: Vec<f32>) -> Option<Self> {
        if indexes.len() != values.len() {
            return None;
        }
        if !indexes.windows(2).all(|w| w[0] < w[1]) {
            return None;
        }
        if values.iter().any(|&x| x == 0.0) {
            return None;
        }
        Some(Self { indexes, values })
    }

    /// Builds a vector from unordered entries; repeated keys are summed.
    pub fn from_entries(entries: impl IntoIterator<Item = (K, f32)>) -> Self {
        let mut map = BTreeMap::<K, f32>::new();
        for (key, value) in entries {
            *map.entry(key).or_insert(0.0) += value;
        }
        let (indexes, values): (Vec<K>, Vec<f32>) = map.into_iter().filter(|&(_, v)| v != 0.0).unzip();
        Self { indexes, values }
    }

    #[inline(always)]
    pub fn indexes(&self) -> &[K] {
        &self.indexes
    }

    #[inline(always)]
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub fn get(&self, key: &K) -> f32 {
        match self.indexes.binary_search(key) {
            Ok(i) => self.values[i],
            Err(_) => 0.0,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, f32)> {
        self.indexes.iter().zip(self.values.iter().copied())
    }
}

impl<K: SparseKey> VectorOwned for SVectOwned<K> {
    type Borrowed<'a> = SVectBorrowed<'a, K>;

    #[inline(always)]
    fn as_borrowed(&self) -> SVectBorrowed<'_, K> {
        SVectBorrowed {
            indexes: &self.indexes,
            values: &self.values,
        }
    }

    #[inline(always)]
    fn zeros_like(&self) -> Self {
        Self {
            indexes: Vec::new(),
            values: Vec::new(),
        }
    }

    fn add_inplace(&mut self, rhs: SVectBorrowed<'_, K>) {
        let (indexes, values) =
            floating::vector_add_sparse(&self.indexes, &self.values, rhs.indexes, rhs.values);
        self.indexes = indexes;
        self.values = values;
    }

    fn mul_scalar_inplace(&mut self, rhs: f32) {
        if rhs == 0.0 {
            self.indexes.clear();
            self.values.clear();
            return;
        }
        floating::vector_mul_scalar_inplace(&mut self.values, rhs);
    }
}

#[derive(Debug, PartialEq)]
pub struct SVectBorrowed<'a, K> {
    indexes: &'a [K],
    values: &'a [f32],
}

impl<K> Clone for SVectBorrowed<'_, K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K> Copy for SVectBorrowed<'_, K> {}

impl<'a, K: SparseKey> SVectBorrowed<'a, K> {
    #[inline(always)]
    pub fn indexes(&self) -> &'a [K] {
        self.indexes
    }

    #[inline(always)]
    pub fn values(&self) -> &'a [f32] {
        self.values
    }
}

impl<K: SparseKey> VectorBorrowed for SVectBorrowed<'_, K> {
    type Owned = SVectOwned<K>;

    fn own(&self) -> SVectOwned<K> {
        SVectOwned {
            indexes: self.indexes.to_vec(),
            values: self.values.to_vec(),
        }
    }

    #[inline(always)]
    fn dims(&self) -> Option<usize> {
        None
    }

    #[inline(always)]
    fn norm(&self) -> f32 {
        floating::reduce_sum_of_x2(self.values).sqrt()
    }

    #[inline(always)]
    fn operator_dot(self, rhs: Self) -> f32 {
        floating::reduce_sum_of_xy_sparse(self.indexes, self.values, rhs.indexes, rhs.values)
    }

    #[inline(always)]
    fn operator_l2s(self, rhs: Self) -> f32 {
        floating::reduce_sum_of_d2_sparse(self.indexes, self.values, rhs.indexes, rhs.values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulate_inserts_missing_keys() {
        let a = SVectOwned::from_entries([("apple".to_string(), 1.0), ("pear".to_string(), 2.0)]);
        let b = SVectOwned::from_entries([("fig".to_string(), 4.0), ("pear".to_string(), -2.0)]);
        let mut sum = a.zeros_like();
        sum.add_inplace(a.as_borrowed());
        sum.add_inplace(b.as_borrowed());
        assert_eq!(sum.indexes(), &["apple".to_string(), "fig".to_string()]);
        assert_eq!(sum.values(), &[1.0, 4.0]);
        sum.mul_scalar_inplace(0.5);
        assert_eq!(sum.get(&"fig".to_string()), 2.0);
        assert_eq!(sum.get(&"pear".to_string()), 0.0);
    }

    #[test]
    fn from_entries_sorts_and_merges() {
        let v = SVectOwned::from_entries([(7u32, 1.0), (2, 3.0), (7, 1.0), (5, 0.0)]);
        assert_eq!(v.indexes(), &[2, 7]);
        assert_eq!(v.values(), &[3.0, 2.0]);
        assert_eq!(v.iter().count(), 2);
    }

    #[test]
    fn new_checked_enforces_layout() {
        assert!(SVectOwned::new_checked(vec![1u32, 3], vec![1.0, 2.0]).is_some());
        assert!(SVectOwned::new_checked(vec![3u32, 1], vec![1.0, 2.0]).is_none());
        assert!(SVectOwned::new_checked(vec![1u32, 1], vec![1.0, 2.0]).is_none());
        assert!(SVectOwned::new_checked(vec![1u32], vec![0.0]).is_none());
        assert!(SVectOwned::new_checked(vec![1u32], vec![1.0, 2.0]).is_none());
    }

    #[test]
    fn norm_and_operators() {
        let x = SVectOwned::new(vec![0u32, 4], vec![3.0, 4.0]);
        let y = SVectOwned::new(vec![4u32, 9], vec![1.0, 2.0]);
        let (x, y) = (x.as_borrowed(), y.as_borrowed());
        assert_eq!(x.norm(), 5.0);
        assert_eq!(x.dims(), None);
        assert_eq!(x.operator_dot(y), 4.0);
        assert_eq!(x.operator_l2s(y), 9.0 + 9.0 + 4.0);
        assert_eq!(x.own().as_borrowed(), x);
    }
}
