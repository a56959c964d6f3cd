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

//! Parallel K-Means clustering over dense and sparse vectors.
//!
//! Options are usually written as TOML:
//!
//! ```toml
//! metric = "cos"
//!
//! [k_means]
//! k = 16
//! max_iterations = 50
//! num_threads = 4
//! ```

pub use distance::{Distance, DistanceError, DistanceFunction};
pub use k_means::{KMeansOptions, KMeansResult, LabeledPoint, Progress, k_means, nearest, run, seed};
pub use vector::metric::{Cos, Dot, L2, L2s, Metric};
pub use vector::svect::SVectOwned;
pub use vector::vect::VectOwned;
pub use vector::{VectorBorrowed, VectorOwned};

use serde::{Deserialize, Serialize};
use std::ops::ControlFlow;
use thiserror::Error;
use validator::Validate;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to parse options: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid options: {0}")]
    Invalid(#[from] validator::ValidationErrors),
    #[error(transparent)]
    KMeans(#[from] k_means::Error),
}

/// A complete clustering job: the metric and the k-means options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub metric: Metric,
    #[validate(nested)]
    pub k_means: KMeansOptions,
}

/// Parses and validates bare k-means options, e.g. `k = 8`.
pub fn parse_options(s: &str) -> Result<KMeansOptions, Error> {
    let options = toml::from_str::<KMeansOptions>(s)?;
    options.validate()?;
    log::debug!("parsed options: {options:?}");
    Ok(options)
}

/// Parses and validates a [`Config`].
pub fn parse_config(s: &str) -> Result<Config, Error> {
    let config = toml::from_str::<Config>(s)?;
    config.validate()?;
    log::debug!("parsed config: {config:?}");
    Ok(config)
}

/// Clusters `points` with the metric and options of `config`.
pub fn cluster<V>(points: Vec<V>, config: &Config) -> Result<KMeansResult<V>, Error>
where
    V: VectorOwned,
{
    Ok(k_means(points, &config.metric, &config.k_means, |_| {
        ControlFlow::Continue(())
    })?)
}
