#![allow(dead_code)]

use fastrand::Rng;
use netbalance::config::WorkloadParams;
use netbalance::optimizer::Distribution;
use netbalance::workload::{generator, Workload};
use std::sync::Arc;

pub fn workload(rows: &[Vec<u64>]) -> Arc<Workload> {
    Arc::new(Workload::from_values(rows).expect("valid workload"))
}

pub fn random_workload(groups: usize, buckets: usize, seed: u64) -> Arc<Workload> {
    let params = WorkloadParams {
        groups,
        buckets,
        max_group_scale: 50,
        max_unit_factor: 20,
    };
    let mut rng = Rng::with_seed(seed);
    let w = generator::random_workload(&params, &mut rng).expect("valid params");
    Arc::new(w.into_delta_order())
}

/// Every group order is a permutation and the cached totals match.
pub fn assert_valid(dist: &Distribution) {
    if let Err(e) = dist.verify() {
        panic!("invalid distribution: {}", e);
    }
    let b = dist.bucket_count();
    for group in dist.groups() {
        let mut sorted = group.order().to_vec();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..b).collect::<Vec<_>>());
    }
}

fn permutations(n: usize) -> Vec<Vec<usize>> {
    fn extend(prefix: &mut Vec<usize>, used: &mut [bool], out: &mut Vec<Vec<usize>>) {
        if prefix.len() == used.len() {
            out.push(prefix.clone());
            return;
        }
        for i in 0..used.len() {
            if !used[i] {
                used[i] = true;
                prefix.push(i);
                extend(prefix, used, out);
                prefix.pop();
                used[i] = false;
            }
        }
    }
    let mut out = Vec::new();
    extend(&mut Vec::with_capacity(n), &mut vec![false; n], &mut out);
    out
}

/// Exhaustive minimum fitness. Group 0 is pinned to the identity order since
/// relabelling buckets never changes fitness. Keep instances tiny.
pub fn brute_force_fitness(workload: &Workload) -> u64 {
    let b = workload.bucket_count();
    let perms = permutations(b);
    let mut totals: Vec<u64> = (0..b).map(|bucket| workload.load(0, bucket)).collect();
    let mut best = u64::MAX;
    search(workload, &perms, 1, &mut totals, &mut best);
    best
}

fn search(workload: &Workload, perms: &[Vec<usize>], g: usize, totals: &mut [u64], best: &mut u64) {
    if g == workload.group_count() {
        let max = totals.iter().copied().max().unwrap_or(0);
        let min = totals.iter().copied().min().unwrap_or(0);
        *best = (*best).min(max - min);
        return;
    }
    for perm in perms {
        for (bucket, &unit) in perm.iter().enumerate() {
            totals[bucket] += workload.load(g, unit);
        }
        search(workload, perms, g + 1, totals, best);
        for (bucket, &unit) in perm.iter().enumerate() {
            totals[bucket] -= workload.load(g, unit);
        }
    }
}
