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

use std::ops::Range;

/// Static partition of `n` points into `workers` contiguous shards of equal
/// length, preceded by a remainder shard holding the `n % workers` leftover
/// points. The remainder shard may be empty.
///
/// The plan is fixed for a whole run, so a point is always handled by the
/// same unit of work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShardPlan {
    lens: Vec<usize>,
}

impl ShardPlan {
    pub fn new(n: usize, workers: usize) -> Self {
        assert!(workers > 0);
        let (size, rest) = (n / workers, n % workers);
        let mut lens = Vec::with_capacity(workers + 1);
        lens.push(rest);
        lens.extend(std::iter::repeat_n(size, workers));
        Self { lens }
    }

    /// Number of dispatched units per phase, always `workers + 1`.
    pub fn units(&self) -> usize {
        self.lens.len()
    }

    pub fn len(&self) -> usize {
        self.lens.iter().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn ranges(&self) -> impl Iterator<Item = Range<usize>> + '_ {
        self.lens.iter().scan(0, |start, &len| {
            let range = *start..*start + len;
            *start += len;
            Some(range)
        })
    }

    pub fn split_mut<'a, T>(&self, mut p: &'a mut [T]) -> Vec<&'a mut [T]> {
        assert_eq!(p.len(), self.len());
        let mut result = Vec::with_capacity(self.units());
        for &len in &self.lens {
            let head;
            (head, p) = std::mem::take(&mut p).split_at_mut(len);
            result.push(head);
        }
        result
    }

    pub fn split<'a, T>(&self, p: &'a [T]) -> Vec<&'a [T]> {
        assert_eq!(p.len(), self.len());
        self.ranges().map(|range| &p[range]).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::prelude::*;

    #[test]
    fn remainder_comes_first() {
        let plan = ShardPlan::new(10, 4);
        assert_eq!(plan.units(), 5);
        assert_eq!(plan.ranges().collect::<Vec<_>>(), vec![0..2, 2..4, 4..6, 6..8, 8..10]);
        let plan = ShardPlan::new(8, 4);
        assert_eq!(plan.ranges().next(), Some(0..0));
        let plan = ShardPlan::new(3, 8);
        assert_eq!(plan.units(), 9);
        assert_eq!(plan.ranges().next(), Some(0..3));
        assert!(plan.ranges().skip(1).all(|r| r.is_empty()));
    }

    #[test]
    fn random_split() {
        let mut rng = StdRng::seed_from_u64(7);
        for trial in 0..1000 {
            let n = rng.random_range(0..2000);
            let workers = rng.random_range(1..=64);
            let plan = ShardPlan::new(n, workers);
            assert_eq!(plan.units(), workers + 1, "trial {}", trial);
            assert_eq!(plan.len(), n, "trial {}", trial);
            let golden = (0..n).collect::<Vec<_>>();
            let mut data = golden.clone();
            let shards = plan.split_mut(&mut data);
            let lens = shards.iter().map(|s| s.len()).collect::<Vec<_>>();
            assert!(lens[1..].iter().all(|&len| len == n / workers), "trial {}", trial);
            assert_eq!(lens[0], n % workers, "trial {}", trial);
            let joined = shards.into_iter().flat_map(|s| s.iter().copied()).collect::<Vec<_>>();
            assert_eq!(joined, golden, "trial {}", trial);
            let shared = plan.split(&golden);
            assert_eq!(shared.concat(), golden, "trial {}", trial);
        }
    }
}
