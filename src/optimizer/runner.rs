use crate::config::{Config, Strategy};
use crate::error::{BalanceError, BalanceResult};
use crate::optimizer::{Distribution, Population};
use crate::workload::Workload;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

pub struct EvolutionOptions {
    pub strategy: Strategy,
    pub population_size: usize,
    pub sorting_chance: f32,
    pub generations: usize,
    pub mutations_per_child: usize,
    pub trials: usize,
    pub patience: usize,
    pub stop_at_zero: bool,
    pub max_time: Option<Duration>,
    /// Worker threads for parallel trials. `None` uses rayon's global pool.
    pub num_threads: Option<usize>,
}

impl EvolutionOptions {
    pub fn from_config(cfg: &Config, strategy: Strategy) -> Self {
        Self {
            strategy,
            population_size: cfg.evolution.population_size,
            sorting_chance: cfg.evolution.sorting_chance,
            generations: cfg.evolution.generations,
            mutations_per_child: cfg.evolution.mutations_per_child,
            trials: cfg.evolution.trials,
            patience: cfg.evolution.patience,
            stop_at_zero: cfg.evolution.stop_at_zero,
            // Run-level limits come from the command line, not the config.
            max_time: None,
            num_threads: None,
        }
    }
}

/// Fitness snapshot taken after each generation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationStats {
    pub generation: usize,
    /// Fitness of the best distribution seen so far.
    pub best: u64,
    pub mean: f64,
    pub worst: u64,
}

impl GenerationStats {
    pub fn capture(generation: usize, population: &Population) -> Self {
        let (_, mean, worst) = population.fitness_summary();
        Self {
            generation,
            best: population.best().fitness(),
            mean,
            worst,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialResult {
    pub trial: usize,
    pub seed: Option<u64>,
    pub greedy_fitness: u64,
    pub initial_best: u64,
    pub best_fitness: u64,
    pub generations_run: usize,
    pub elapsed_secs: f64,
    pub best_totals: Vec<u64>,
    /// `assignment[g][b]`: source sub-unit id of group `g` placed in bucket `b`.
    pub assignment: Vec<Vec<usize>>,
    pub trajectory: Vec<GenerationStats>,
}

/// Receives updates during evolution. Returning `false` stops the trial.
pub trait ProgressCallback: Send + Sync {
    fn on_progress(&self, trial: usize, generation: usize, best_fitness: u64) -> bool;
}

/// Callback that never interrupts and reports nothing.
pub struct Silent;

impl ProgressCallback for Silent {
    fn on_progress(&self, _trial: usize, _generation: usize, _best_fitness: u64) -> bool {
        true
    }
}

pub struct Optimizer {
    workload: Arc<Workload>,
    options: EvolutionOptions,
}

impl Optimizer {
    pub fn new(workload: Arc<Workload>, options: EvolutionOptions) -> Self {
        Self { workload, options }
    }

    pub fn options(&self) -> &EvolutionOptions {
        &self.options
    }

    /// Evolves one independent population.
    pub fn run_trial<CB: ProgressCallback>(
        &self,
        trial: usize,
        seed: Option<u64>,
        callback: &CB,
    ) -> BalanceResult<TrialResult> {
        let opts = &self.options;
        let start_time = Instant::now();

        let mut population = Population::new(
            self.workload.clone(),
            opts.population_size,
            opts.sorting_chance,
            seed,
        )?;

        let greedy_fitness = Distribution::greedy(self.workload.clone()).fitness();
        let initial_best = population.best().fitness();

        let mut trajectory = Vec::with_capacity(opts.generations + 1);
        trajectory.push(GenerationStats::capture(0, &population));

        let mut generations_run = 0;
        let mut stale = 0;

        for generation in 1..=opts.generations {
            if opts.stop_at_zero && population.best().fitness() == 0 {
                debug!("Trial {} reached a perfect balance at generation {}", trial, generation - 1);
                break;
            }
            if let Some(limit) = opts.max_time {
                if start_time.elapsed() >= limit {
                    debug!("Trial {} hit the time limit", trial);
                    break;
                }
            }

            let improved = population.advance(opts.strategy, opts.mutations_per_child)?;
            generations_run = generation;
            trajectory.push(GenerationStats::capture(generation, &population));

            if improved {
                stale = 0;
            } else {
                stale += 1;
            }
            if opts.patience > 0 && stale >= opts.patience {
                debug!("Trial {} converged after {} stale generations", trial, stale);
                break;
            }

            if !callback.on_progress(trial, generation, population.best().fitness()) {
                break;
            }
        }

        let best = population.best();
        let result = TrialResult {
            trial,
            seed,
            greedy_fitness,
            initial_best,
            best_fitness: best.fitness(),
            generations_run,
            elapsed_secs: start_time.elapsed().as_secs_f64(),
            best_totals: best.totals().to_vec(),
            assignment: best.assignment(),
            trajectory,
        };

        info!(
            "Trial {} done: greedy {} -> initial {} -> best {} in {} generations",
            trial, result.greedy_fitness, result.initial_best, result.best_fitness, generations_run
        );
        Ok(result)
    }

    /// Runs `trials` independent populations in parallel. Trial `i` is seeded
    /// with `seed + i` when a seed is given.
    pub fn run_trials<CB: ProgressCallback>(
        &self,
        seed: Option<u64>,
        callback: &CB,
    ) -> BalanceResult<Vec<TrialResult>> {
        let trials = self.options.trials;
        let run_all = || {
            (0..trials)
                .into_par_iter()
                .map(|i| self.run_trial(i, seed.map(|s| s.wrapping_add(i as u64)), callback))
                .collect::<BalanceResult<Vec<_>>>()
        };

        match self.options.num_threads {
            Some(n) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(n)
                    .build()
                    .map_err(|e| BalanceError::Config(format!("thread pool: {}", e)))?;
                pool.install(run_all)
            }
            None => run_all(),
        }
    }
}
