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

//! Distance values and the contract every clustering metric implements.

use thiserror::Error;

/// A totally ordered `f32` distance.
///
/// The bit pattern is remapped so that integer comparison agrees with the
/// float order, `-0.0 < 0.0` and every positive NaN sorts after infinity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Distance(i32);

impl Distance {
    pub const ZERO: Self = Distance::from_f32(0.0f32);
    pub const INFINITY: Self = Distance::from_f32(f32::INFINITY);
    pub const NEG_INFINITY: Self = Distance::from_f32(f32::NEG_INFINITY);
    pub const NAN: Self = Distance::from_f32(f32::NAN);

    #[inline(always)]
    pub const fn from_f32(value: f32) -> Self {
        let bits = value.to_bits() as i32;
        let mask = ((bits >> 31) as u32) >> 1;
        let res = bits ^ (mask as i32);
        Self(res)
    }

    #[inline(always)]
    pub const fn to_f32(self) -> f32 {
        let bits = self.0;
        let mask = ((bits >> 31) as u32) >> 1;
        let res = bits ^ (mask as i32);
        f32::from_bits(res as u32)
    }
}

impl From<f32> for Distance {
    #[inline(always)]
    fn from(value: f32) -> Self {
        Distance::from_f32(value)
    }
}

impl From<Distance> for f32 {
    #[inline(always)]
    fn from(value: Distance) -> Self {
        Distance::to_f32(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DistanceError {
    /// The metric divides by a norm and one operand has none.
    #[error("distance is undefined for a vector with zero magnitude")]
    ZeroMagnitude,
    /// Dense operands of different lengths.
    #[error("operands have mismatched dimensions: {lhs} and {rhs}")]
    DimensionMismatch { lhs: usize, rhs: usize },
}

/// A dissimilarity between two vectors: lower means closer.
///
/// Implementations must be pure. They are invoked concurrently from every
/// worker of a clustering run, on disjoint points but the same centroids.
/// Similarities are expressed as `1 - similarity` or as a negation.
pub trait DistanceFunction<V: ?Sized>: Sync {
    fn distance(&self, lhs: &V, rhs: &V) -> Result<f32, DistanceError>;

    /// Weight of a point in K-Means++ seeding, given its distance to the
    /// closest centroid chosen so far.
    ///
    /// The weight is the squared Euclidean distance for Euclidean metrics.
    /// Metrics that already return a squared distance override this.
    /// Negative and NaN distances weigh nothing.
    #[inline(always)]
    fn seeding_weight(&self, dis: f32) -> f64 {
        let dis = dis.max(0.0) as f64;
        dis * dis
    }
}

impl<V: ?Sized, F> DistanceFunction<V> for F
where
    F: Fn(&V, &V) -> Result<f32, DistanceError> + Sync,
{
    #[inline(always)]
    fn distance(&self, lhs: &V, rhs: &V) -> Result<f32, DistanceError> {
        self(lhs, rhs)
    }
}

#[test]
fn distance_conversions() {
    assert_eq!(Distance::from(0.0f32), Distance::ZERO);
    assert_eq!(Distance::from(f32::INFINITY), Distance::INFINITY);
    assert_eq!(Distance::from(f32::NEG_INFINITY), Distance::NEG_INFINITY);
    for i in -100..100 {
        let val = (i as f32) * 0.1;
        assert_eq!(f32::from(Distance::from(val)).to_bits(), val.to_bits());
    }
    assert_eq!(
        f32::from(Distance::from(-0.0f32)).to_bits(),
        (-0.0f32).to_bits()
    );
    assert_eq!(
        f32::from(Distance::from(f32::NAN)).to_bits(),
        f32::NAN.to_bits()
    );
}

#[test]
fn distance_order() {
    let mut values = [3.5f32, -1.0, f32::NAN, 0.0, f32::INFINITY, -7.25, 1e-3];
    values.sort_by_key(|&x| Distance::from(x));
    assert_eq!(values[0], -7.25);
    assert_eq!(values[1], -1.0);
    assert_eq!(values[2], 0.0);
    assert_eq!(values[5], f32::INFINITY);
    assert!(values[6].is_nan());
}

#[test]
fn closures_are_distance_functions() {
    fn l1(lhs: &[f32], rhs: &[f32]) -> Result<f32, DistanceError> {
        if lhs.len() != rhs.len() {
            return Err(DistanceError::DimensionMismatch {
                lhs: lhs.len(),
                rhs: rhs.len(),
            });
        }
        Ok(lhs.iter().zip(rhs).map(|(x, y)| (x - y).abs()).sum())
    }
    let f: &dyn DistanceFunction<[f32]> = &l1;
    assert_eq!(f.distance(&[0.0, 1.0], &[2.0, -1.0]), Ok(4.0));
    assert_eq!(f.seeding_weight(3.0), 9.0);
    assert_eq!(f.seeding_weight(-2.0), 0.0);
    assert_eq!(f.seeding_weight(f32::NAN), 0.0);
    assert_eq!(
        f.distance(&[0.0], &[1.0, 2.0]),
        Err(DistanceError::DimensionMismatch { lhs: 1, rhs: 2 })
    );
}
