pub mod generator;
pub mod loader;

use crate::error::{BalanceError, BalanceResult};
use serde::{Deserialize, Serialize};

/// An indivisible load-bearing item (a partition).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubUnit {
    /// Identifier of the sub-unit in the source data.
    pub index: usize,
    pub value: u64,
}

/// A set of sub-units that must be spread one per bucket (a topic).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub name: String,
    pub units: Vec<SubUnit>,
}

impl Group {
    /// Builds a group whose sub-unit ids are their positions in `values`.
    pub fn new(name: impl Into<String>, values: &[u64]) -> Self {
        Self {
            name: name.into(),
            units: values
                .iter()
                .enumerate()
                .map(|(index, &value)| SubUnit { index, value })
                .collect(),
        }
    }

    /// Spread between the heaviest and the lightest sub-unit.
    pub fn delta(&self) -> u64 {
        let max = self.units.iter().map(|u| u.value).max().unwrap_or(0);
        let min = self.units.iter().map(|u| u.value).min().unwrap_or(0);
        max - min
    }

    pub fn total(&self) -> u64 {
        self.units.iter().map(|u| u.value).sum()
    }
}

/// Read-only snapshot of the groups being balanced.
///
/// Sub-units inside every group are kept in ascending load order, so unit
/// position `0` is always the lightest. The optimizer relies on that order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workload {
    groups: Vec<Group>,
    bucket_count: usize,
}

impl Workload {
    pub fn new(mut groups: Vec<Group>) -> BalanceResult<Self> {
        let first = groups
            .first()
            .ok_or_else(|| BalanceError::Config("workload has no groups".into()))?;
        let bucket_count = first.units.len();
        if bucket_count == 0 {
            return Err(BalanceError::Config(format!(
                "group '{}' has no sub-units, bucket count would be zero",
                first.name
            )));
        }

        for group in &groups {
            if group.units.len() != bucket_count {
                return Err(BalanceError::Config(format!(
                    "group '{}' has {} sub-units, expected {}",
                    group.name,
                    group.units.len(),
                    bucket_count
                )));
            }
        }

        // Every bucket total is bounded by the workload total.
        groups
            .iter()
            .flat_map(|g| g.units.iter())
            .try_fold(0u64, |acc, u| acc.checked_add(u.value))
            .ok_or_else(|| BalanceError::Config("total load overflows u64".into()))?;

        for group in &mut groups {
            group.units.sort_by_key(|u| u.value);
        }

        Ok(Self {
            groups,
            bucket_count,
        })
    }

    /// Convenience constructor: one row of load values per group.
    pub fn from_values(rows: &[Vec<u64>]) -> BalanceResult<Self> {
        let groups = rows
            .iter()
            .enumerate()
            .map(|(i, values)| Group::new(i.to_string(), values))
            .collect();
        Self::new(groups)
    }

    /// Reorders groups by ascending delta (stable). The greedy constructor
    /// walks groups back to front, so the widest groups get placed first.
    pub fn into_delta_order(mut self) -> Self {
        self.groups.sort_by_key(Group::delta);
        self
    }

    #[inline(always)]
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    #[inline(always)]
    pub fn bucket_count(&self) -> usize {
        self.bucket_count
    }

    #[inline(always)]
    pub fn load(&self, group: usize, unit: usize) -> u64 {
        self.groups[group].units[unit].value
    }

    pub fn group(&self, group: usize) -> &Group {
        &self.groups[group]
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn total_load(&self) -> u64 {
        self.groups.iter().map(Group::total).sum()
    }

    pub fn ideal_bucket_load(&self) -> f64 {
        self.total_load() as f64 / self.bucket_count as f64
    }

    /// Smallest spread any assignment could reach from the totals alone.
    pub fn lower_bound_fitness(&self) -> u64 {
        if self.total_load() % self.bucket_count as u64 == 0 {
            0
        } else {
            1
        }
    }
}
