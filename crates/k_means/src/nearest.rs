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

use crate::error::{Error, Result};
use distance::{Distance, DistanceFunction};

/// Finds the centroid closest to `point` by an exhaustive scan.
///
/// Returns the centroid's index and its distance. Ties go to the lowest
/// index and a NaN distance never beats a number.
pub fn nearest<V, D>(point: &V, centroids: &[V], distance: &D) -> Result<(usize, f32)>
where
    D: DistanceFunction<V> + ?Sized,
{
    if centroids.is_empty() {
        return Err(Error::NoCentroids);
    }
    let mut result = (Distance::NAN, 0);
    for (i, centroid) in centroids.iter().enumerate() {
        let dis = ordered(distance.distance(point, centroid)?);
        if i == 0 || dis < result.0 {
            result = (dis, i);
        }
    }
    Ok((result.1, result.0.to_f32()))
}

#[inline(always)]
fn ordered(dis: f32) -> Distance {
    // a NaN with the sign bit set would sort below every number
    if dis.is_nan() {
        Distance::NAN
    } else {
        Distance::from_f32(dis)
    }
}
