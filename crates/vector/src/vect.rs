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

/// A dense vector: every dimension is stored, in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VectOwned(Vec<f32>);

impl VectOwned {
    #[inline(always)]
    pub fn new(slice: Vec<f32>) -> Self {
        Self::new_checked(slice).expect("invalid data")
    }

    #[inline(always)]
    pub fn new_checked(slice: Vec<f32>) -> Option<Self> {
        if slice.is_empty() {
            return None;
        }
        Some(Self(slice))
    }

    #[inline(always)]
    pub fn slice(&self) -> &[f32] {
        self.0.as_slice()
    }

    #[inline(always)]
    pub fn slice_mut(&mut self) -> &mut [f32] {
        self.0.as_mut_slice()
    }

    #[inline(always)]
    pub fn into_vec(self) -> Vec<f32> {
        self.0
    }
}

impl VectorOwned for VectOwned {
    type Borrowed<'a> = VectBorrowed<'a>;

    #[inline(always)]
    fn as_borrowed(&self) -> VectBorrowed<'_> {
        VectBorrowed(self.0.as_slice())
    }

    #[inline(always)]
    fn zeros_like(&self) -> Self {
        Self(vec![0.0; self.0.len()])
    }

    #[inline(always)]
    fn add_inplace(&mut self, rhs: VectBorrowed<'_>) {
        floating::vector_add_inplace(&mut self.0, rhs.0);
    }

    #[inline(always)]
    fn mul_scalar_inplace(&mut self, rhs: f32) {
        floating::vector_mul_scalar_inplace(&mut self.0, rhs);
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(transparent)]
pub struct VectBorrowed<'a>(&'a [f32]);

impl<'a> VectBorrowed<'a> {
    #[inline(always)]
    pub fn new(slice: &'a [f32]) -> Self {
        Self::new_checked(slice).expect("invalid data")
    }

    #[inline(always)]
    pub fn new_checked(slice: &'a [f32]) -> Option<Self> {
        if slice.is_empty() {
            return None;
        }
        Some(Self(slice))
    }

    #[inline(always)]
    pub fn slice(&self) -> &'a [f32] {
        self.0
    }
}

impl VectorBorrowed for VectBorrowed<'_> {
    type Owned = VectOwned;

    #[inline(always)]
    fn own(&self) -> VectOwned {
        VectOwned(self.0.to_vec())
    }

    #[inline(always)]
    fn dims(&self) -> Option<usize> {
        Some(self.0.len())
    }

    #[inline(always)]
    fn norm(&self) -> f32 {
        floating::reduce_sum_of_x2(self.0).sqrt()
    }

    #[inline(always)]
    fn operator_dot(self, rhs: Self) -> f32 {
        floating::reduce_sum_of_xy(self.0, rhs.0)
    }

    #[inline(always)]
    fn operator_l2s(self, rhs: Self) -> f32 {
        floating::reduce_sum_of_d2(self.0, rhs.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arithmetic() {
        let mut sum = VectOwned::new(vec![1.0, 2.0, 3.0]).zeros_like();
        assert_eq!(sum.slice(), &[0.0, 0.0, 0.0]);
        sum.add_inplace(VectBorrowed::new(&[1.0, 2.0, 3.0]));
        sum.add_inplace(VectBorrowed::new(&[3.0, 2.0, 1.0]));
        assert_eq!(sum.slice(), &[4.0, 4.0, 4.0]);
        sum.mul_scalar_inplace(0.5);
        assert_eq!(sum.into_vec(), vec![2.0, 2.0, 2.0]);
    }

    #[test]
    fn norm_and_operators() {
        let x = VectOwned::new(vec![3.0, 4.0]);
        let y = VectOwned::new(vec![0.0, 1.0]);
        assert_eq!(x.as_borrowed().norm(), 5.0);
        assert_eq!(x.as_borrowed().dims(), Some(2));
        assert_eq!(x.as_borrowed().operator_dot(y.as_borrowed()), 4.0);
        assert_eq!(x.as_borrowed().operator_l2s(y.as_borrowed()), 18.0);
        assert_eq!(y.as_borrowed().own(), y);
    }

    #[test]
    fn rejects_empty() {
        assert!(VectOwned::new_checked(Vec::new()).is_none());
        assert!(VectBorrowed::new_checked(&[]).is_none());
    }
}
