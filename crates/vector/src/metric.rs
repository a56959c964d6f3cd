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

//! Reference metrics. Every one of them is a dissimilarity.

use crate::{VectorBorrowed, VectorOwned};
use distance::{DistanceError, DistanceFunction};
use serde::{Deserialize, Serialize};

/// Squared Euclidean distance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct L2s;

/// Euclidean distance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct L2;

/// Negative inner product.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Dot;

/// `1 - cosine similarity`. Undefined for vectors with zero magnitude.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cos;

fn check_dims<B: VectorBorrowed>(lhs: B, rhs: B) -> Result<(), DistanceError> {
    match (lhs.dims(), rhs.dims()) {
        (Some(l), Some(r)) if l != r => Err(DistanceError::DimensionMismatch { lhs: l, rhs: r }),
        _ => Ok(()),
    }
}

impl<V: VectorOwned> DistanceFunction<V> for L2s {
    fn distance(&self, lhs: &V, rhs: &V) -> Result<f32, DistanceError> {
        let (lhs, rhs) = (lhs.as_borrowed(), rhs.as_borrowed());
        check_dims(lhs, rhs)?;
        Ok(lhs.operator_l2s(rhs))
    }

    #[inline(always)]
    fn seeding_weight(&self, dis: f32) -> f64 {
        dis.max(0.0) as f64
    }
}

impl<V: VectorOwned> DistanceFunction<V> for L2 {
    fn distance(&self, lhs: &V, rhs: &V) -> Result<f32, DistanceError> {
        let (lhs, rhs) = (lhs.as_borrowed(), rhs.as_borrowed());
        check_dims(lhs, rhs)?;
        Ok(lhs.operator_l2s(rhs).sqrt())
    }
}

impl<V: VectorOwned> DistanceFunction<V> for Dot {
    fn distance(&self, lhs: &V, rhs: &V) -> Result<f32, DistanceError> {
        let (lhs, rhs) = (lhs.as_borrowed(), rhs.as_borrowed());
        check_dims(lhs, rhs)?;
        Ok(-lhs.operator_dot(rhs))
    }
}

impl<V: VectorOwned> DistanceFunction<V> for Cos {
    fn distance(&self, lhs: &V, rhs: &V) -> Result<f32, DistanceError> {
        let (lhs, rhs) = (lhs.as_borrowed(), rhs.as_borrowed());
        check_dims(lhs, rhs)?;
        let (x, y) = (lhs.norm(), rhs.norm());
        if x == 0.0 || y == 0.0 {
            return Err(DistanceError::ZeroMagnitude);
        }
        Ok(1.0 - lhs.operator_dot(rhs) / (x * y))
    }
}

/// A metric chosen at runtime, e.g. from configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    #[default]
    L2s,
    L2,
    Dot,
    Cos,
}

impl<V: VectorOwned> DistanceFunction<V> for Metric {
    #[inline]
    fn distance(&self, lhs: &V, rhs: &V) -> Result<f32, DistanceError> {
        match self {
            Metric::L2s => L2s.distance(lhs, rhs),
            Metric::L2 => L2.distance(lhs, rhs),
            Metric::Dot => Dot.distance(lhs, rhs),
            Metric::Cos => Cos.distance(lhs, rhs),
        }
    }

    #[inline]
    fn seeding_weight(&self, dis: f32) -> f64 {
        match self {
            Metric::L2s => DistanceFunction::<V>::seeding_weight(&L2s, dis),
            Metric::L2 => DistanceFunction::<V>::seeding_weight(&L2, dis),
            Metric::Dot => DistanceFunction::<V>::seeding_weight(&Dot, dis),
            Metric::Cos => DistanceFunction::<V>::seeding_weight(&Cos, dis),
        }
    }
}
