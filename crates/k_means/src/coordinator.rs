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
use crate::error::Result;
use crate::nearest::nearest;
use crate::shard::ShardPlan;
use distance::DistanceFunction;
use parking_lot::Mutex;
use vector::VectorOwned;

/// Running sum and member count of one cluster during an iteration.
#[derive(Debug, Clone)]
pub struct Accumulator<V> {
    pub sum: V,
    pub count: usize,
}

/// Dispatches the parallel phases of an iteration onto a worker pool.
///
/// Every phase hands exactly one unit of work per shard of the plan to the
/// pool and returns only after all of them have finished, so nothing a
/// phase writes is observed before the phase is complete.
pub struct Coordinator {
    pool: rayon::ThreadPool,
    plan: ShardPlan,
}

impl Coordinator {
    pub fn new(num_threads: usize, n: usize) -> Result<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .thread_name(|index| format!("k_means-{index}"))
            .panic_handler(|_| {
                log::error!("Asynchronous task panicked.");
            })
            .build()?;
        let plan = ShardPlan::new(n, num_threads);
        Ok(Self { pool, plan })
    }

    pub fn workers(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Runs `f` inside the pool, so rayon iterators in `f` use its workers.
    pub fn install<R: Send>(&self, f: impl FnOnce() -> R + Send) -> R {
        self.pool.install(f)
    }

    /// Sums every point into the accumulator of its current label.
    ///
    /// The accumulators are created fresh from `centroids` and each one sits
    /// behind its own lock. A unit sums its shard privately first and then
    /// takes the lock of each cluster it touched once.
    pub fn accumulate<V: VectorOwned>(
        &self,
        points: &[LabeledPoint<V>],
        centroids: &[V],
    ) -> Vec<Accumulator<V>> {
        let slots = centroids
            .iter()
            .map(|centroid| {
                Mutex::new(Accumulator {
                    sum: centroid.zeros_like(),
                    count: 0,
                })
            })
            .collect::<Vec<_>>();
        let shards = self.plan.split(points);
        self.pool.scope(|scope| {
            for shard in shards {
                let slots = &slots;
                scope.spawn(move |_| {
                    let mut local = (0..slots.len())
                        .map(|_| None)
                        .collect::<Vec<Option<Accumulator<V>>>>();
                    for point in shard {
                        let vector = point.vector.as_borrowed();
                        let accumulator = local[point.label].get_or_insert_with(|| Accumulator {
                            sum: point.vector.zeros_like(),
                            count: 0,
                        });
                        accumulator.sum.add_inplace(vector);
                        accumulator.count += 1;
                    }
                    for (slot, accumulator) in slots.iter().zip(local) {
                        if let Some(accumulator) = accumulator {
                            let mut slot = slot.lock();
                            slot.sum.add_inplace(accumulator.sum.as_borrowed());
                            slot.count += accumulator.count;
                        }
                    }
                });
            }
        });
        slots.into_iter().map(Mutex::into_inner).collect()
    }

    /// Relabels every point with its nearest centroid and returns how many
    /// labels changed.
    ///
    /// Shards are disjoint, so labels are written without locks. If the
    /// metric fails, the remaining units still run to completion before the
    /// first error is returned.
    pub fn reassign<V, D>(
        &self,
        points: &mut [LabeledPoint<V>],
        centroids: &[V],
        distance: &D,
    ) -> Result<usize>
    where
        V: VectorOwned,
        D: DistanceFunction<V> + ?Sized,
    {
        let mut outcomes = (0..self.plan.units())
            .map(|_| Ok(0))
            .collect::<Vec<Result<usize>>>();
        let shards = self.plan.split_mut(points);
        self.pool.scope(|scope| {
            for (shard, outcome) in shards.into_iter().zip(outcomes.iter_mut()) {
                scope.spawn(move |_| {
                    *outcome = reassign_shard(shard, centroids, distance);
                });
            }
        });
        let mut changes = 0;
        for outcome in outcomes {
            changes += outcome?;
        }
        Ok(changes)
    }
}

fn reassign_shard<V, D>(shard: &mut [LabeledPoint<V>], centroids: &[V], distance: &D) -> Result<usize>
where
    D: DistanceFunction<V> + ?Sized,
{
    let mut changes = 0;
    for point in shard {
        let (label, _) = nearest(&point.vector, centroids, distance)?;
        if label != point.label {
            point.label = label;
            changes += 1;
        }
    }
    Ok(changes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use vector::metric::L2s;
    use vector::vect::VectOwned;

    fn points(labels: &[(f32, usize)]) -> Vec<LabeledPoint<VectOwned>> {
        labels
            .iter()
            .map(|&(x, label)| LabeledPoint {
                vector: VectOwned::new(vec![x, -x]),
                label,
            })
            .collect()
    }

    #[test]
    fn accumulate_sums_by_label() {
        for num_threads in [1, 2, 3, 8] {
            let points = points(&[(1.0, 0), (2.0, 1), (3.0, 0), (4.0, 2), (5.0, 0)]);
            let centroids = vec![VectOwned::new(vec![9.0, 9.0]); 4];
            let coordinator = Coordinator::new(num_threads, points.len()).unwrap();
            assert_eq!(coordinator.plan.units(), num_threads + 1);
            let accumulators = coordinator.accumulate(&points, &centroids);
            let counts = accumulators.iter().map(|a| a.count).collect::<Vec<_>>();
            assert_eq!(counts, vec![3, 1, 1, 0]);
            assert_eq!(counts.iter().sum::<usize>(), points.len());
            assert_eq!(accumulators[0].sum.slice(), &[9.0, -9.0]);
            assert_eq!(accumulators[2].sum.slice(), &[4.0, -4.0]);
            assert_eq!(accumulators[3].sum.slice(), &[0.0, 0.0]);
        }
    }

    #[test]
    fn accumulate_sparse_sums_by_label() {
        use vector::svect::SVectOwned;
        let doc = |entries: &[(&str, f32)]| {
            SVectOwned::from_entries(entries.iter().map(|&(k, v)| (k.to_string(), v)))
        };
        let points = [
            (doc(&[("a", 1.0), ("b", 2.0)]), 1),
            (doc(&[("c", 4.0)]), 0),
            (doc(&[("b", -2.0), ("d", 1.0)]), 1),
            (doc(&[("a", 3.0)]), 1),
            (doc(&[("c", 1.0), ("e", 5.0)]), 0),
        ]
        .into_iter()
        .map(|(vector, label)| LabeledPoint { vector, label })
        .collect::<Vec<_>>();
        let centroids = vec![doc(&[("z", 1.0)]); 3];
        for num_threads in [1, 2, 3, 8] {
            let coordinator = Coordinator::new(num_threads, points.len()).unwrap();
            let accumulators = coordinator.accumulate(&points, &centroids);
            let counts = accumulators.iter().map(|a| a.count).collect::<Vec<_>>();
            assert_eq!(counts, vec![2, 3, 0]);
            assert_eq!(accumulators[0].sum, doc(&[("c", 5.0), ("e", 5.0)]));
            assert_eq!(accumulators[1].sum, doc(&[("a", 4.0), ("d", 1.0)]));
            assert_eq!(accumulators[2].sum, doc(&[]));
        }
    }

    #[test]
    fn reassign_counts_changes() {
        for num_threads in [1, 2, 4, 16] {
            let mut points = points(&[(0.0, 1), (1.0, 0), (9.0, 0), (10.0, 1), (11.0, 1)]);
            let centroids = vec![VectOwned::new(vec![0.0, 0.0]), VectOwned::new(vec![10.0, -10.0])];
            let coordinator = Coordinator::new(num_threads, points.len()).unwrap();
            let changes = coordinator.reassign(&mut points, &centroids, &L2s).unwrap();
            assert_eq!(changes, 2);
            let labels = points.iter().map(|p| p.label).collect::<Vec<_>>();
            assert_eq!(labels, vec![0, 0, 1, 1, 1]);
            let changes = coordinator.reassign(&mut points, &centroids, &L2s).unwrap();
            assert_eq!(changes, 0);
        }
    }

    #[test]
    fn reassign_waits_for_every_unit_before_failing() {
        use distance::DistanceError;
        use std::sync::atomic::{AtomicUsize, Ordering};
        let calls = AtomicUsize::new(0);
        let failing = |lhs: &VectOwned, rhs: &VectOwned| -> Result<f32, DistanceError> {
            calls.fetch_add(1, Ordering::Relaxed);
            if lhs.slice()[0] == 3.0 {
                return Err(DistanceError::ZeroMagnitude);
            }
            L2s.distance(lhs, rhs)
        };
        let mut points = points(&[(0.0, 0), (1.0, 0), (2.0, 0), (3.0, 0), (4.0, 0), (5.0, 0)]);
        let centroids = vec![VectOwned::new(vec![0.0, 0.0])];
        let coordinator = Coordinator::new(2, points.len()).unwrap();
        let result = coordinator.reassign(&mut points, &centroids, &failing);
        assert!(matches!(
            result,
            Err(crate::Error::Distance(DistanceError::ZeroMagnitude))
        ));
        // shards are [], [0, 1, 2], [3, 4, 5]; the second stops at 3.0
        assert_eq!(calls.load(Ordering::Relaxed), 4);
    }
}
