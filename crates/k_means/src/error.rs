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

use distance::DistanceError;
use thiserror::Error;

/// Errors of a clustering run.
///
/// Everything except [`Error::Distance`] is detected before any point is
/// labeled. No partial result is produced in either case.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid options: {0}")]
    InvalidOptions(#[from] validator::ValidationErrors),
    #[error("the number of clusters must be at least 1")]
    ZeroClusters,
    #[error("the dataset is empty")]
    EmptyDataset,
    #[error("cannot pick {k} clusters from {n} points")]
    TooManyClusters { k: usize, n: usize },
    #[error("point {index} has {found} dimensions, expected {expected}")]
    DimensionMismatch {
        index: usize,
        expected: usize,
        found: usize,
    },
    #[error("the number of iterations must be at least 1")]
    ZeroIterations,
    #[error("the centroid set is empty")]
    NoCentroids,
    /// The metric failed for some point pair. The run is abandoned.
    #[error(transparent)]
    Distance(#[from] DistanceError),
    #[error("failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
