use super::ranking::{BucketRanking, Order};
use crate::error::{BalanceError, BalanceResult};
use crate::workload::Workload;
use fastrand::Rng;
use std::ops::Range;
use std::sync::Arc;

/// Placement of one group: `order[bucket]` is the sub-unit position (within
/// the workload's ascending order) assigned to `bucket`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupOrder {
    /// Index of the group in the full workload.
    pub(crate) origin: usize,
    pub(crate) order: Vec<usize>,
}

impl GroupOrder {
    pub fn origin(&self) -> usize {
        self.origin
    }

    pub fn order(&self) -> &[usize] {
        &self.order
    }
}

/// A candidate assignment of every group's sub-units to buckets.
///
/// `totals[b]` always equals the sum of the loads placed in bucket `b`;
/// every operation that touches `groups` updates `totals` in step.
#[derive(Debug, Clone)]
pub struct Distribution {
    pub(crate) workload: Arc<Workload>,
    pub(crate) groups: Vec<GroupOrder>,
    pub(crate) totals: Vec<u64>,
}

impl Distribution {
    /// Scaffold sized to the workload: identity orders, zero totals. The
    /// totals do not match the orders until the caller fills both in.
    pub fn clean(workload: Arc<Workload>) -> Self {
        let bucket_count = workload.bucket_count();
        let groups = (0..workload.group_count())
            .map(|origin| GroupOrder {
                origin,
                order: (0..bucket_count).collect(),
            })
            .collect();

        Self {
            workload,
            groups,
            totals: vec![0; bucket_count],
        }
    }

    /// Longest-processing-time style construction. Groups are walked back to
    /// front; unit `i` (ascending load) lands in the bucket at rank `i` of the
    /// descending running totals, so the heaviest bucket takes the lightest
    /// unit.
    pub fn greedy(workload: Arc<Workload>) -> Self {
        Self::build_greedy(workload, || true)
    }

    /// Greedy construction that re-ranks buckets after each group only with
    /// probability `sorting_chance`.
    pub fn stochastic_greedy(
        workload: Arc<Workload>,
        sorting_chance: f32,
        rng: &mut Rng,
    ) -> BalanceResult<Self> {
        if !(0.0..=1.0).contains(&sorting_chance) {
            return Err(BalanceError::Config(format!(
                "sorting chance must be within [0, 1], got {}",
                sorting_chance
            )));
        }
        Ok(Self::build_greedy(workload, || rng.f32() < sorting_chance))
    }

    fn build_greedy(workload: Arc<Workload>, mut should_sort: impl FnMut() -> bool) -> Self {
        let mut dist = Self::clean(workload.clone());
        let mut ranking = BucketRanking::new(workload.bucket_count());

        for g in (0..workload.group_count()).rev() {
            for unit in 0..workload.bucket_count() {
                let entry = ranking.add(unit, workload.load(g, unit));
                dist.totals[entry.bucket] = entry.total;
                dist.groups[g].order[entry.bucket] = unit;
            }
            if should_sort() {
                ranking.sort(Order::Descending);
            }
        }
        dist
    }

    /// Builds a distribution from explicit placements (`orders[g][b]` is the
    /// unit position of group `g` in bucket `b`).
    pub fn from_orders(workload: Arc<Workload>, orders: Vec<Vec<usize>>) -> BalanceResult<Self> {
        if orders.len() != workload.group_count() {
            return Err(BalanceError::Validation(format!(
                "expected {} group orders, got {}",
                workload.group_count(),
                orders.len()
            )));
        }
        let groups = orders
            .into_iter()
            .enumerate()
            .map(|(origin, order)| GroupOrder { origin, order })
            .collect();
        let mut dist = Self {
            totals: vec![0; workload.bucket_count()],
            workload,
            groups,
        };
        dist.check_orders()?;
        dist.totals = dist.recompute_totals();
        Ok(dist)
    }

    /// Deep copy of the selected groups plus the full totals vector. Used as
    /// the rollback point of a mutation trial.
    pub fn sub_distribution(&self, groups: &[usize]) -> BalanceResult<Distribution> {
        if groups.is_empty() {
            return Err(BalanceError::Config(
                "sub-distribution needs at least one group".into(),
            ));
        }
        if let Some(&bad) = groups.iter().find(|&&g| g >= self.groups.len()) {
            return Err(BalanceError::Config(format!(
                "group {} out of range (0..{})",
                bad,
                self.groups.len()
            )));
        }

        Ok(Self {
            workload: self.workload.clone(),
            groups: groups.iter().map(|&g| self.groups[g].clone()).collect(),
            totals: self.totals.clone(),
        })
    }

    /// Puts back the totals and the groups captured by `snapshot`.
    pub(crate) fn restore_from(&mut self, snapshot: &Distribution) {
        self.totals.copy_from_slice(&snapshot.totals);
        for group in &snapshot.groups {
            self.groups[group.origin].order.copy_from_slice(&group.order);
        }
    }

    /// Spread between the most and the least loaded bucket. Lower is better.
    pub fn fitness(&self) -> u64 {
        let max = self.totals.iter().copied().max().unwrap_or(0);
        let min = self.totals.iter().copied().min().unwrap_or(0);
        max - min
    }

    /// Maps fitness into `(0, 1]`; 1 means perfectly balanced.
    pub fn exponential_fitness(&self) -> f64 {
        1.0 / (1.0 + self.fitness() as f64)
    }

    pub fn mean_total(&self) -> f64 {
        self.totals.iter().sum::<u64>() as f64 / self.totals.len() as f64
    }

    /// Per-bucket totals counting only the groups in `groups`.
    pub fn bucket_subtotal(&self, groups: Range<usize>) -> BucketRanking {
        let mut subtotal = vec![0u64; self.bucket_count()];
        for g in groups {
            for (bucket, &unit) in self.groups[g].order.iter().enumerate() {
                subtotal[bucket] += self.unit_load(g, unit);
            }
        }
        BucketRanking::from_totals(&subtotal)
    }

    #[inline(always)]
    pub(crate) fn unit_load(&self, group_pos: usize, unit: usize) -> u64 {
        self.workload.load(self.groups[group_pos].origin, unit)
    }

    /// Load currently placed in `bucket` by the group at `group_pos`.
    #[inline(always)]
    pub(crate) fn placed_load(&self, group_pos: usize, bucket: usize) -> u64 {
        self.unit_load(group_pos, self.groups[group_pos].order[bucket])
    }

    pub fn totals(&self) -> &[u64] {
        &self.totals
    }

    pub fn groups(&self) -> &[GroupOrder] {
        &self.groups
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn bucket_count(&self) -> usize {
        self.totals.len()
    }

    pub fn workload(&self) -> &Arc<Workload> {
        &self.workload
    }

    /// Placement expressed with the source sub-unit ids:
    /// `assignment()[g][b]` is the id of group `g`'s unit in bucket `b`.
    pub fn assignment(&self) -> Vec<Vec<usize>> {
        self.groups
            .iter()
            .map(|group| {
                let units = &self.workload.group(group.origin).units;
                group.order.iter().map(|&u| units[u].index).collect()
            })
            .collect()
    }

    pub fn recompute_totals(&self) -> Vec<u64> {
        let mut totals = vec![0u64; self.workload.bucket_count()];
        for (g, group) in self.groups.iter().enumerate() {
            for (bucket, &unit) in group.order.iter().enumerate() {
                totals[bucket] += self.unit_load(g, unit);
            }
        }
        totals
    }

    fn check_orders(&self) -> BalanceResult<()> {
        let bucket_count = self.workload.bucket_count();
        let mut seen = vec![false; bucket_count];
        for group in &self.groups {
            if group.order.len() != bucket_count {
                return Err(BalanceError::Validation(format!(
                    "group {} places {} units over {} buckets",
                    group.origin,
                    group.order.len(),
                    bucket_count
                )));
            }
            seen.fill(false);
            for &unit in &group.order {
                if unit >= bucket_count || seen[unit] {
                    return Err(BalanceError::Validation(format!(
                        "group {} order {:?} is not a permutation",
                        group.origin, group.order
                    )));
                }
                seen[unit] = true;
            }
        }
        Ok(())
    }

    /// Checks that every group order is a permutation and that the cached
    /// totals match a full recomputation.
    pub fn verify(&self) -> BalanceResult<()> {
        if self.groups.len() != self.workload.group_count() {
            return Err(BalanceError::Validation(format!(
                "verify needs a full distribution ({} of {} groups present)",
                self.groups.len(),
                self.workload.group_count()
            )));
        }
        self.check_orders()?;

        let expected = self.recompute_totals();
        if expected != self.totals {
            return Err(BalanceError::Validation(format!(
                "bucket totals drifted: cached {:?}, recomputed {:?}",
                self.totals, expected
            )));
        }
        Ok(())
    }
}
