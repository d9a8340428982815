use super::distribution::Distribution;
use super::ranking::{BucketRanking, Order};
use crate::error::{BalanceError, BalanceResult};
use fastrand::Rng;
use tracing::trace;

impl Distribution {
    /// Chance of each bucket joining a mutation: its squared distance from
    /// the mean over twice the largest such distance. Values lie in
    /// `[0, 0.5]`; the bucket furthest from the mean gets 0.5.
    pub fn mutation_weights(&self) -> Vec<f64> {
        let mean = self.mean_total();
        let squared: Vec<f64> = self
            .totals
            .iter()
            .map(|&t| {
                let d = t as f64 - mean;
                d * d
            })
            .collect();
        let max = squared.iter().copied().fold(0.0f64, f64::max);

        if max == 0.0 {
            return vec![0.0; squared.len()];
        }
        squared.iter().map(|s| s / (2.0 * max)).collect()
    }

    fn choose_buckets(&self, rng: &mut Rng) -> Vec<usize> {
        self.mutation_weights()
            .into_iter()
            .enumerate()
            .filter(|&(_, w)| rng.f64() < w)
            .map(|(bucket, _)| bucket)
            .collect()
    }

    fn choose_groups(&self, rng: &mut Rng) -> Vec<usize> {
        let count = rng.usize(1..=self.group_count());
        let mut groups: Vec<usize> = (0..self.group_count()).collect();
        rng.shuffle(&mut groups);
        groups.truncate(count);
        groups
    }

    /// Swaps the units of one group between buckets `a` and `b`, moving both
    /// loads across the two totals.
    #[inline(always)]
    fn swap_units(&mut self, group_pos: usize, a: usize, b: usize) {
        let load_a = self.placed_load(group_pos, a);
        let load_b = self.placed_load(group_pos, b);

        self.totals[a] -= load_a;
        self.totals[b] -= load_b;
        self.groups[group_pos].order.swap(a, b);
        self.totals[a] += load_b;
        self.totals[b] += load_a;
    }

    /// Random permutation of one group's units among `buckets`.
    fn shuffle_group(&mut self, group_pos: usize, buckets: &[usize], rng: &mut Rng) {
        for i in (1..buckets.len()).rev() {
            let j = rng.usize(0..=i);
            if i != j {
                self.swap_units(group_pos, buckets[i], buckets[j]);
            }
        }
    }

    /// Takes a group's units out of `buckets` and puts them back so that the
    /// lightest unit goes to the currently heaviest bucket.
    fn rebalance_group(&mut self, group_pos: usize, buckets: &[usize]) {
        for &bucket in buckets {
            let load = self.placed_load(group_pos, bucket);
            self.totals[bucket] -= load;
        }

        let ranking = BucketRanking::from_buckets(buckets, &self.totals).sorted(Order::Descending);

        let mut units: Vec<usize> = buckets
            .iter()
            .map(|&b| self.groups[group_pos].order[b])
            .collect();
        units.sort_unstable();

        for (pos, &unit) in units.iter().enumerate() {
            let bucket = ranking.bucket(pos);
            let load = self.unit_load(group_pos, unit);
            self.groups[group_pos].order[bucket] = unit;
            self.totals[bucket] += load;
        }
    }

    /// Rearranges the `groups` x `buckets` block in place: the first group is
    /// shuffled, every following group is greedily re-balanced against the
    /// totals left by the ones before it.
    pub fn mutate_selection(
        &mut self,
        groups: &[usize],
        buckets: &[usize],
        rng: &mut Rng,
    ) -> BalanceResult<()> {
        let Some((&first, rest)) = groups.split_first() else {
            return Err(BalanceError::Config("mutation needs at least one group".into()));
        };
        if buckets.is_empty() {
            return Err(BalanceError::Config("mutation needs at least one bucket".into()));
        }
        if let Some(&g) = groups.iter().find(|&&g| g >= self.group_count()) {
            return Err(BalanceError::Config(format!("group {} out of range", g)));
        }
        if let Some(&b) = buckets.iter().find(|&&b| b >= self.bucket_count()) {
            return Err(BalanceError::Config(format!("bucket {} out of range", b)));
        }

        self.shuffle_group(first, buckets, rng);
        for &group_pos in rest {
            self.rebalance_group(group_pos, buckets);
        }
        Ok(())
    }

    /// One hill-climbing trial. Mutates a random block biased towards the
    /// buckets furthest from the mean and keeps the result only when fitness
    /// strictly improves; otherwise rolls back. Returns whether it was kept.
    pub fn mutate_if_better(&mut self, rng: &mut Rng) -> BalanceResult<bool> {
        let buckets = self.choose_buckets(rng);
        if buckets.len() < 2 {
            return Ok(false);
        }
        let groups = self.choose_groups(rng);

        let snapshot = self.sub_distribution(&groups)?;
        let before = snapshot.fitness();

        self.mutate_selection(&groups, &buckets, rng)?;
        let after = self.fitness();

        let kept = after < before;
        if !kept {
            self.restore_from(&snapshot);
        }
        trace!(
            "mutation on {} groups x {} buckets: {} -> {} ({})",
            groups.len(),
            buckets.len(),
            before,
            after,
            if kept { "kept" } else { "rolled back" }
        );
        debug_assert!(
            self.group_count() < self.workload.group_count() || self.verify().is_ok(),
            "mutation broke distribution invariants"
        );
        Ok(kept)
    }

    /// Runs `n` independent trials and returns how many were kept.
    pub fn mutate_if_better_n_times(&mut self, n: usize, rng: &mut Rng) -> BalanceResult<usize> {
        let mut accepted = 0;
        for _ in 0..n {
            if self.mutate_if_better(rng)? {
                accepted += 1;
            }
        }
        Ok(accepted)
    }
}
