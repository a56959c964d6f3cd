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

mod floating;

pub mod metric;
pub mod svect;
pub mod vect;

/// An owned observation that can serve as a point or as a centroid.
///
/// Centroids are rebuilt every iteration by accumulating points into a
/// [`VectorOwned::zeros_like`] value and scaling it, so both operations
/// mutate the receiver only.
pub trait VectorOwned:
    Clone + Send + Sync + std::fmt::Debug + serde::Serialize + for<'a> serde::Deserialize<'a> + 'static
{
    type Borrowed<'a>: VectorBorrowed<Owned = Self>;

    fn as_borrowed(&self) -> Self::Borrowed<'_>;

    /// The additive identity with the same shape as `self`.
    fn zeros_like(&self) -> Self;

    fn add_inplace(&mut self, rhs: Self::Borrowed<'_>);

    fn mul_scalar_inplace(&mut self, rhs: f32);
}

pub trait VectorBorrowed: Copy {
    type Owned: VectorOwned;

    fn own(&self) -> Self::Owned;

    /// Number of dimensions, or `None` when the key space is open.
    fn dims(&self) -> Option<usize>;

    fn norm(&self) -> f32;

    fn operator_dot(self, rhs: Self) -> f32;

    fn operator_l2s(self, rhs: Self) -> f32;
}
