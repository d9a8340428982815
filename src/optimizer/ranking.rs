use std::ops::Index;

/// A bucket paired with its running total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BucketTotal {
    pub bucket: usize,
    pub total: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Ascending,
    Descending,
}

/// Re-orderable list of `(bucket, total)` pairs.
///
/// Nothing survives a change to the totals: callers re-sort after every
/// update. Ties come out in no particular order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketRanking {
    entries: Vec<BucketTotal>,
}

impl BucketRanking {
    /// Buckets `0..bucket_count`, all at zero, in index order.
    pub fn new(bucket_count: usize) -> Self {
        Self {
            entries: (0..bucket_count)
                .map(|bucket| BucketTotal { bucket, total: 0 })
                .collect(),
        }
    }

    pub fn from_totals(totals: &[u64]) -> Self {
        Self {
            entries: totals
                .iter()
                .enumerate()
                .map(|(bucket, &total)| BucketTotal { bucket, total })
                .collect(),
        }
    }

    /// Ranking restricted to `buckets`, reading their current `totals`.
    pub fn from_buckets(buckets: &[usize], totals: &[u64]) -> Self {
        Self {
            entries: buckets
                .iter()
                .map(|&bucket| BucketTotal {
                    bucket,
                    total: totals[bucket],
                })
                .collect(),
        }
    }

    pub fn sort(&mut self, order: Order) {
        match order {
            Order::Ascending => self.entries.sort_unstable_by(|a, b| a.total.cmp(&b.total)),
            Order::Descending => self.entries.sort_unstable_by(|a, b| b.total.cmp(&a.total)),
        }
    }

    pub fn sorted(mut self, order: Order) -> Self {
        self.sort(order);
        self
    }

    /// Adds `amount` to the entry at ranking position `pos` and returns the
    /// bucket it belongs to together with the new total.
    #[inline(always)]
    pub fn add(&mut self, pos: usize, amount: u64) -> BucketTotal {
        let entry = &mut self.entries[pos];
        entry.total += amount;
        *entry
    }

    #[inline(always)]
    pub fn bucket(&self, pos: usize) -> usize {
        self.entries[pos].bucket
    }

    #[inline(always)]
    pub fn total(&self, pos: usize) -> u64 {
        self.entries[pos].total
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, BucketTotal> {
        self.entries.iter()
    }

    pub fn buckets(&self) -> Vec<usize> {
        self.entries.iter().map(|e| e.bucket).collect()
    }
}

impl Index<usize> for BucketRanking {
    type Output = BucketTotal;

    fn index(&self, pos: usize) -> &BucketTotal {
        &self.entries[pos]
    }
}

impl<'a> IntoIterator for &'a BucketRanking {
    type Item = &'a BucketTotal;
    type IntoIter = std::slice::Iter<'a, BucketTotal>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_orders() {
        let ranking = BucketRanking::from_totals(&[5, 1, 9, 3]);

        let desc = ranking.clone().sorted(Order::Descending);
        assert_eq!(desc.buckets(), vec![2, 0, 3, 1]);

        let asc = ranking.sorted(Order::Ascending);
        assert_eq!(asc.buckets(), vec![1, 3, 0, 2]);
        assert_eq!(asc.total(0), 1);
        assert_eq!(asc[3].total, 9);
    }

    #[test]
    fn test_add_reports_bucket_and_total() {
        let mut ranking = BucketRanking::from_totals(&[4, 8]).sorted(Order::Descending);
        let entry = ranking.add(1, 10);
        assert_eq!(entry, BucketTotal { bucket: 0, total: 14 });
        ranking.sort(Order::Descending);
        assert_eq!(ranking.bucket(0), 0);
    }

    #[test]
    fn test_subset_reads_current_totals() {
        let totals = [10, 20, 30, 40];
        let ranking = BucketRanking::from_buckets(&[3, 1], &totals).sorted(Order::Ascending);
        assert_eq!(ranking.buckets(), vec![1, 3]);
        assert_eq!(ranking.total(1), 40);
    }

    proptest! {
        #[test]
        fn prop_sort_keeps_every_bucket(totals in proptest::collection::vec(0u64..1000, 1..20)) {
            let desc = BucketRanking::from_totals(&totals).sorted(Order::Descending);
            let mut seen = desc.buckets();
            seen.sort_unstable();
            prop_assert_eq!(seen, (0..totals.len()).collect::<Vec<_>>());
            for pair in desc.iter().collect::<Vec<_>>().windows(2) {
                prop_assert!(pair[0].total >= pair[1].total);
            }
        }
    }
}
