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

//! K-Means clustering: K-Means++ seeding followed by Lloyd iterations whose
//! accumulate and reassign phases run on a pool of workers.

pub mod coordinator;
pub mod error;
pub mod lloyd;
pub mod nearest;
pub mod options;
pub mod seed;
pub mod shard;

pub use error::{Error, Result};
pub use nearest::nearest;
pub use options::KMeansOptions;
pub use seed::seed;

use coordinator::Coordinator;
use distance::DistanceFunction;
use lloyd::LloydKMeans;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::ops::ControlFlow;
use validator::Validate;
use vector::{VectorBorrowed, VectorOwned};

/// A point together with the index of the cluster it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledPoint<V> {
    pub vector: V,
    pub label: usize,
}

/// Reported once after every completed iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    /// Iterations completed so far, starting at 1.
    pub iteration: usize,
    pub max_iterations: usize,
    /// Points whose label changed in this iteration.
    pub changes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KMeansResult<V> {
    pub points: Vec<LabeledPoint<V>>,
    pub centroids: Vec<V>,
    /// Number of points carrying each label.
    pub sizes: Vec<usize>,
    pub iterations: usize,
    /// Whether the change threshold was met before the iteration cap.
    pub converged: bool,
    /// Whether the progress callback asked to stop early.
    pub cancelled: bool,
}

impl<V: VectorOwned> KMeansResult<V> {
    /// One label per input point, in input order.
    pub fn labels(&self) -> Vec<usize> {
        self.points.iter().map(|point| point.label).collect()
    }

    /// Indexes of the input points, grouped by cluster.
    pub fn clusters(&self) -> Vec<Vec<usize>> {
        let mut clusters = vec![Vec::new(); self.centroids.len()];
        for (i, point) in self.points.iter().enumerate() {
            clusters[point.label].push(i);
        }
        clusters
    }

    /// Assigns a new point to one of the final clusters.
    pub fn classify<D>(&self, point: &V, distance: &D) -> Result<(usize, f32)>
    where
        D: DistanceFunction<V> + ?Sized,
    {
        nearest(point, &self.centroids, distance)
    }

    pub fn into_parts(self) -> (Vec<usize>, Vec<V>) {
        let labels = self.points.into_iter().map(|point| point.label).collect();
        (labels, self.centroids)
    }
}

/// Clusters `points` into `k` groups with default options and at most
/// `max_iterations` iterations.
pub fn run<V, D>(
    points: Vec<V>,
    k: usize,
    distance: &D,
    max_iterations: usize,
) -> Result<KMeansResult<V>>
where
    V: VectorOwned,
    D: DistanceFunction<V> + ?Sized,
{
    if k == 0 {
        return Err(Error::ZeroClusters);
    }
    if max_iterations == 0 {
        return Err(Error::ZeroIterations);
    }
    let mut options = KMeansOptions::new(u32::try_from(k).unwrap_or(u32::MAX));
    options.max_iterations = max_iterations;
    k_means(points, distance, &options, |_| ControlFlow::Continue(()))
}

/// Clusters `points` as configured by `options`.
///
/// `progress` is called after every iteration. Returning
/// [`ControlFlow::Break`] ends the run once that iteration is complete; the
/// result is then marked as cancelled.
pub fn k_means<V, D>(
    points: Vec<V>,
    distance: &D,
    options: &KMeansOptions,
    mut progress: impl FnMut(Progress) -> ControlFlow<()>,
) -> Result<KMeansResult<V>>
where
    V: VectorOwned,
    D: DistanceFunction<V> + ?Sized,
{
    if options.k == 0 {
        return Err(Error::ZeroClusters);
    }
    if options.max_iterations == 0 {
        return Err(Error::ZeroIterations);
    }
    options.validate()?;
    let k = options.k as usize;
    let n = points.len();
    check_points(&points, k)?;

    let coordinator = Coordinator::new(options.threads(), n)?;
    log::debug!(
        "clustering {n} points into {k} clusters with {} workers",
        coordinator.workers()
    );
    let mut rng = ChaCha8Rng::seed_from_u64(options.seed);
    let centroids = coordinator.install(|| seed(&points, k, distance, &mut rng))?;
    let mut lloyd = LloydKMeans::new(&coordinator, distance, points, centroids)?;

    let max_iterations = options.max_iterations;
    let tolerated = options.tolerated_changes(n);
    let (mut iterations, mut converged, mut cancelled) = (0, false, false);
    while iterations < max_iterations {
        let changes = lloyd.iterate()?;
        iterations += 1;
        log::debug!("iteration {iterations}/{max_iterations}: {changes} labels changed");
        let flow = progress(Progress {
            iteration: iterations,
            max_iterations,
            changes,
        });
        if changes <= tolerated {
            converged = true;
            break;
        }
        if flow.is_break() {
            log::info!("k-means cancelled after {iterations} iterations");
            cancelled = true;
            break;
        }
    }
    if !converged && !cancelled {
        log::warn!("k-means did not converge within {max_iterations} iterations");
    }

    let (points, centroids) = lloyd.finish();
    let mut sizes = vec![0; centroids.len()];
    for point in &points {
        sizes[point.label] += 1;
    }
    log::info!("k-means finished after {iterations} iterations, cluster sizes {sizes:?}");
    Ok(KMeansResult {
        points,
        centroids,
        sizes,
        iterations,
        converged,
        cancelled,
    })
}

fn check_points<V: VectorOwned>(points: &[V], k: usize) -> Result<()> {
    let n = points.len();
    if n == 0 {
        return Err(Error::EmptyDataset);
    }
    if k > n {
        return Err(Error::TooManyClusters { k, n });
    }
    let Some(expected) = points[0].as_borrowed().dims() else {
        return Ok(());
    };
    for (index, point) in points.iter().enumerate().skip(1) {
        let found = point.as_borrowed().dims().unwrap_or(expected);
        if found != expected {
            return Err(Error::DimensionMismatch {
                index,
                expected,
                found,
            });
        }
    }
    Ok(())
}
