use super::distribution::Distribution;
use super::ranking::Order;
use crate::error::{BalanceError, BalanceResult};
use fastrand::Rng;

/// Recombines two parents at a random split point.
///
/// See [`crossover_at`].
pub fn crossover(
    father: &Distribution,
    mother: &Distribution,
    rng: &mut Rng,
) -> BalanceResult<Distribution> {
    let split = rng.usize(0..father.group_count());
    crossover_at(father, mother, split)
}

/// The child takes groups `0..=split` from the father and the rest from the
/// mother. Father subtotals are ranked ascending and mother subtotals
/// descending; child bucket `i` receives the father's `i`-th and the
/// mother's `i`-th ranked columns, so light halves meet heavy halves.
pub fn crossover_at(
    father: &Distribution,
    mother: &Distribution,
    split: usize,
) -> BalanceResult<Distribution> {
    let group_count = father.workload().group_count();
    if father.group_count() != group_count
        || mother.group_count() != group_count
        || father.bucket_count() != mother.bucket_count()
    {
        return Err(BalanceError::Config(
            "crossover parents must be full distributions over the same workload".into(),
        ));
    }
    if split >= group_count {
        return Err(BalanceError::Config(format!(
            "split point {} out of range (0..{})",
            split, group_count
        )));
    }

    let father_rank = father.bucket_subtotal(0..split + 1).sorted(Order::Ascending);
    let mother_rank = mother
        .bucket_subtotal(split + 1..group_count)
        .sorted(Order::Descending);

    let mut child = Distribution::clean(father.workload().clone());

    for (i, (f, m)) in father_rank.iter().zip(mother_rank.iter()).enumerate() {
        child.totals[i] = f.total + m.total;
    }

    for g in 0..=split {
        let src = &father.groups[g].order;
        for (i, entry) in father_rank.iter().enumerate() {
            child.groups[g].order[i] = src[entry.bucket];
        }
    }
    for g in split + 1..group_count {
        let src = &mother.groups[g].order;
        for (i, entry) in mother_rank.iter().enumerate() {
            child.groups[g].order[i] = src[entry.bucket];
        }
    }

    debug_assert!(child.verify().is_ok(), "crossover child broke invariants");
    Ok(child)
}
