use super::crossover::crossover;
use super::distribution::Distribution;
use crate::config::Strategy;
use crate::error::{BalanceError, BalanceResult};
use crate::workload::Workload;
use fastrand::Rng;
use std::sync::Arc;
use tracing::debug;

/// Fixed-size pool of competing distributions plus a snapshot of the best
/// one seen so far.
pub struct Population {
    workload: Arc<Workload>,
    members: Vec<Distribution>,
    best: Distribution,
    rng: Rng,
}

impl Population {
    pub fn new(
        workload: Arc<Workload>,
        size: usize,
        sorting_chance: f32,
        seed: Option<u64>,
    ) -> BalanceResult<Self> {
        let rng = if let Some(s) = seed {
            Rng::with_seed(s)
        } else {
            Rng::new()
        };
        Self::with_rng(workload, size, sorting_chance, rng)
    }

    /// Seeds `size` stochastic-greedy members and replaces the first with the
    /// pure greedy distribution.
    pub fn with_rng(
        workload: Arc<Workload>,
        size: usize,
        sorting_chance: f32,
        mut rng: Rng,
    ) -> BalanceResult<Self> {
        if size == 0 {
            return Err(BalanceError::Config("population size must be at least 1".into()));
        }

        let mut members = (0..size)
            .map(|_| Distribution::stochastic_greedy(workload.clone(), sorting_chance, &mut rng))
            .collect::<BalanceResult<Vec<_>>>()?;
        members[0] = Distribution::greedy(workload.clone());

        let best = members
            .iter()
            .min_by_key(|d| d.fitness())
            .cloned()
            .unwrap_or_else(|| Distribution::greedy(workload.clone()));

        debug!(
            "Seeded population of {} (sorting chance {}), best fitness {}",
            size,
            sorting_chance,
            best.fitness()
        );

        Ok(Self {
            workload,
            members,
            best,
            rng,
        })
    }

    pub fn best(&self) -> &Distribution {
        &self.best
    }

    pub fn members(&self) -> &[Distribution] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn workload(&self) -> &Arc<Workload> {
        &self.workload
    }

    /// Roulette-wheel pick of two member indices, weighted by exponential
    /// fitness. Both picks may land on the same member.
    pub fn roulette_select(&mut self) -> (usize, usize) {
        let mut cumulative = Vec::with_capacity(self.members.len());
        let mut sum = 0.0;
        for member in &self.members {
            sum += member.exponential_fitness();
            cumulative.push(sum);
        }

        let mut draws = [self.rng.f64() * sum, self.rng.f64() * sum];
        draws.sort_by(f64::total_cmp);

        let last = self.members.len() - 1;
        let mut picks = [last; 2];
        let mut choice = 0;
        for (i, &acc) in cumulative.iter().enumerate() {
            while choice < 2 && draws[choice] <= acc {
                picks[choice] = i;
                choice += 1;
            }
            if choice == 2 {
                break;
            }
        }
        (picks[0], picks[1])
    }

    /// Copies the member at `idx` into `best` if it beats it.
    fn update_best(&mut self, idx: usize) -> bool {
        if self.members[idx].fitness() < self.best.fitness() {
            self.best = self.members[idx].clone();
            true
        } else {
            false
        }
    }

    /// Crossover generation: two roulette parents produce a child that gets
    /// `mutations_per_child` hill-climbing trials, then replaces the weaker
    /// parent if it beats it. Returns whether `best` improved.
    pub fn advance_one_generation(&mut self, mutations_per_child: usize) -> BalanceResult<bool> {
        let (father, mother) = self.roulette_select();

        let mut child = crossover(&self.members[father], &self.members[mother], &mut self.rng)?;
        child.mutate_if_better_n_times(mutations_per_child, &mut self.rng)?;

        let weaker = if self.members[father].fitness() >= self.members[mother].fitness() {
            father
        } else {
            mother
        };

        let child_fitness = child.fitness();
        let improved = child_fitness < self.best.fitness();
        if improved {
            self.best = child.clone();
        }
        if child_fitness < self.members[weaker].fitness() {
            self.members[weaker] = child;
        }
        Ok(improved)
    }

    /// Mutation-only generation: two roulette picks each get
    /// `mutations_per_child` trials in place. Returns whether `best` improved.
    pub fn advance_two_random(&mut self, mutations_per_child: usize) -> BalanceResult<bool> {
        let (a, b) = self.roulette_select();

        self.members[a].mutate_if_better_n_times(mutations_per_child, &mut self.rng)?;
        self.members[b].mutate_if_better_n_times(mutations_per_child, &mut self.rng)?;

        let improved_a = self.update_best(a);
        let improved_b = self.update_best(b);
        Ok(improved_a || improved_b)
    }

    pub fn advance(&mut self, strategy: Strategy, mutations_per_child: usize) -> BalanceResult<bool> {
        match strategy {
            Strategy::Crossover => self.advance_one_generation(mutations_per_child),
            Strategy::TwoRandom => self.advance_two_random(mutations_per_child),
        }
    }

    /// `(best member, mean, worst member)` fitness of the current pool.
    pub fn fitness_summary(&self) -> (u64, f64, u64) {
        let mut min = u64::MAX;
        let mut max = 0;
        let mut sum = 0.0;
        for member in &self.members {
            let f = member.fitness();
            min = min.min(f);
            max = max.max(f);
            sum += f as f64;
        }
        (min, sum / self.members.len() as f64, max)
    }
}
