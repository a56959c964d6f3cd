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

use lloyd::{Config, Error, Metric, VectOwned};
use rand::prelude::*;

#[test]
fn options_take_defaults() {
    let options = lloyd::parse_options("k = 8").unwrap();
    assert_eq!(options, lloyd::KMeansOptions::new(8));
    assert_eq!(options.max_iterations, 100);
    assert_eq!(options.change_threshold, 0.0);
    assert_eq!(options.num_threads, 0);
}

#[test]
fn options_are_validated() {
    assert!(matches!(lloyd::parse_options("k = 0"), Err(Error::Invalid(_))));
    assert!(matches!(
        lloyd::parse_options("k = 4\nchange_threshold = 1.5"),
        Err(Error::Invalid(_))
    ));
    assert!(matches!(
        lloyd::parse_options("k = 4\nmax_iterations = 0"),
        Err(Error::Invalid(_))
    ));
    assert!(matches!(
        lloyd::parse_options("k = 4\nnum_threads = 1000"),
        Err(Error::Invalid(_))
    ));
    assert!(matches!(
        lloyd::parse_options("k = 4\nlists = 2"),
        Err(Error::Parse(_))
    ));
    assert!(matches!(lloyd::parse_options("max_iterations = 3"), Err(Error::Parse(_))));
}

#[test]
fn config_selects_metric() {
    let config = lloyd::parse_config(
        r#"
        metric = "cos"

        [k_means]
        k = 2
        num_threads = 2
        seed = 3
        "#,
    )
    .unwrap();
    assert_eq!(config.metric, Metric::Cos);
    assert_eq!(config.k_means.k, 2);
    assert_eq!(config.k_means.seed, 3);

    let config = lloyd::parse_config("[k_means]\nk = 3").unwrap();
    assert_eq!(config.metric, Metric::L2s);
    assert!(matches!(
        lloyd::parse_config("metric = \"manhattan\"\n[k_means]\nk = 3"),
        Err(Error::Parse(_))
    ));
    assert!(matches!(
        lloyd::parse_config("[k_means]\nk = 3\nchange_threshold = -0.5"),
        Err(Error::Invalid(_))
    ));
}

#[test]
fn cluster_with_config() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut points = Vec::new();
    for center in [-100.0f32, 0.0, 100.0] {
        for _ in 0..50 {
            points.push(VectOwned::new(vec![
                center + rng.random_range(-5..=5) as f32,
                center + rng.random_range(-5..=5) as f32,
            ]));
        }
    }
    let config = lloyd::parse_config("metric = \"l2\"\n[k_means]\nk = 3\nnum_threads = 3").unwrap();
    let result = lloyd::cluster(points, &config).unwrap();
    assert!(result.converged);
    assert_eq!(result.sizes.iter().sum::<usize>(), 150);
    let labels = result.labels();
    for group in labels.chunks(50) {
        assert!(group.iter().all(|&label| label == group[0]));
    }
    assert_ne!(labels[0], labels[50]);
    assert_ne!(labels[50], labels[100]);
    assert_ne!(labels[0], labels[100]);
}

#[test]
fn cluster_reports_metric_failures() {
    let config = Config {
        metric: Metric::Cos,
        k_means: lloyd::KMeansOptions::new(1),
    };
    let points = vec![VectOwned::new(vec![0.0, 0.0]), VectOwned::new(vec![1.0, 1.0])];
    assert!(matches!(
        lloyd::cluster(points, &config),
        Err(Error::KMeans(k_means::Error::Distance(
            lloyd::DistanceError::ZeroMagnitude
        )))
    ));
}
