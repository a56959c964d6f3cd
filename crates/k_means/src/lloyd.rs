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

use crate::LabeledPoint;
use crate::coordinator::Coordinator;
use crate::error::Result;
use distance::DistanceFunction;
use vector::VectorOwned;

/// State of Lloyd's algorithm between two iterations.
pub struct LloydKMeans<'a, V, D: ?Sized> {
    coordinator: &'a Coordinator,
    distance: &'a D,
    points: Vec<LabeledPoint<V>>,
    centroids: Vec<V>,
    sizes: Vec<usize>,
}

impl<'a, V, D> LloydKMeans<'a, V, D>
where
    V: VectorOwned,
    D: DistanceFunction<V> + ?Sized,
{
    /// Labels every point with its nearest seeded centroid.
    pub fn new(
        coordinator: &'a Coordinator,
        distance: &'a D,
        points: Vec<V>,
        centroids: Vec<V>,
    ) -> Result<Self> {
        let mut points = points
            .into_iter()
            .map(|vector| LabeledPoint { vector, label: 0 })
            .collect::<Vec<_>>();
        coordinator.reassign(&mut points, &centroids, distance)?;
        let sizes = vec![0; centroids.len()];
        Ok(Self {
            coordinator,
            distance,
            points,
            centroids,
            sizes,
        })
    }

    /// Runs one accumulate, update and reassign round and returns the number
    /// of points whose label changed.
    ///
    /// A cluster left without points keeps its previous centroid.
    pub fn iterate(&mut self) -> Result<usize> {
        let accumulators = self.coordinator.accumulate(&self.points, &self.centroids);
        for (i, accumulator) in accumulators.into_iter().enumerate() {
            self.sizes[i] = accumulator.count;
            if accumulator.count == 0 {
                log::warn!("cluster {i} is empty, keeping its previous centroid");
                continue;
            }
            let mut centroid = accumulator.sum;
            centroid.mul_scalar_inplace(1.0 / accumulator.count as f32);
            self.centroids[i] = centroid;
        }
        debug_assert_eq!(self.sizes.iter().sum::<usize>(), self.points.len());
        self.coordinator
            .reassign(&mut self.points, &self.centroids, self.distance)
    }

    pub fn finish(self) -> (Vec<LabeledPoint<V>>, Vec<V>) {
        (self.points, self.centroids)
    }
}
