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
use crate::nearest::nearest;
use distance::DistanceFunction;
use rand::Rng;
use rayon::prelude::*;
use vector::VectorOwned;

/// Picks `k` initial centroids with K-Means++.
///
/// The first centroid is drawn uniformly. Each following one is drawn with
/// probability proportional to the squared distance between a point and the
/// closest centroid chosen so far, as given by
/// [`DistanceFunction::seeding_weight`]. When every weight is zero, e.g. all
/// points coincide, the first point is taken.
///
/// Weights are computed with rayon, on the pool of the caller if there is one.
pub fn seed<V, D>(points: &[V], k: usize, distance: &D, rng: &mut impl Rng) -> Result<Vec<V>>
where
    V: VectorOwned,
    D: DistanceFunction<V> + ?Sized,
{
    let n = points.len();
    if k == 0 {
        return Err(Error::ZeroClusters);
    }
    if n == 0 {
        return Err(Error::EmptyDataset);
    }
    if k > n {
        return Err(Error::TooManyClusters { k, n });
    }
    let mut centroids = Vec::with_capacity(k);
    centroids.push(points[rng.random_range(0..n)].clone());
    let mut weights = vec![f64::INFINITY; n];
    for i in 1..k {
        let newest = std::slice::from_ref(&centroids[i - 1]);
        weights
            .par_iter_mut()
            .zip(points.par_iter())
            .try_for_each(|(weight, point)| -> Result<()> {
                let (_, dis) = nearest(point, newest, distance)?;
                *weight = weight.min(distance.seeding_weight(dis));
                Ok(())
            })?;
        let chosen = sample(&weights, rng);
        log::trace!("k-means++ picked point {chosen} as centroid {i}");
        centroids.push(points[chosen].clone());
    }
    Ok(centroids)
}

/// Draws an index with probability proportional to its weight.
fn sample(weights: &[f64], rng: &mut impl Rng) -> usize {
    let total = weights.iter().sum::<f64>();
    if !(total > 0.0 && total.is_finite()) {
        return 0;
    }
    let target = rng.random_range(0.0..total);
    let mut sum = 0.0;
    weights
        .iter()
        .position(|&weight| {
            sum += weight;
            sum > target
        })
        .or_else(|| weights.iter().rposition(|&weight| weight > 0.0))
        .unwrap_or(0)
}
