use crate::reports;
use clap::{ArgMatches, Args};
use fastrand::Rng;
use netbalance::config::{Config, Strategy};
use netbalance::optimizer::{EvolutionOptions, Optimizer, ProgressCallback};
use netbalance::workload::{generator, Workload};
use netbalance::{results, BalanceResult};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    #[command(flatten)]
    pub config: Config,

    #[arg(long)]
    pub strategy: Strategy,

    /// Workload file. Without it a random workload is generated from the
    /// workload flags.
    #[arg(short, long)]
    pub workload: Option<String>,

    /// JSON config file. Flags typed on the command line override it.
    #[arg(long = "config")]
    pub config_file: Option<String>,

    #[arg(short = 'S', long)]
    pub seed: Option<u64>,

    /// Wall-clock limit per trial, in seconds.
    #[arg(short = 'T', long)]
    pub time: Option<u64>,

    #[arg(long)]
    pub threads: Option<usize>,

    #[arg(long)]
    pub trajectory: Option<String>,

    #[arg(long)]
    pub summary: Option<String>,
}

/// Logs the best fitness of each trial every `interval` generations.
struct CliLogger {
    interval: usize,
}

impl ProgressCallback for CliLogger {
    fn on_progress(&self, trial: usize, generation: usize, best_fitness: u64) -> bool {
        if self.interval > 0 && generation % self.interval == 0 {
            info!("   Trial {:3} | Gen {:6} | Best: {}", trial, generation, best_fitness);
        }
        true
    }
}

fn resolve_config(args: &RunArgs, matches: &ArgMatches) -> BalanceResult<Config> {
    let config = match &args.config_file {
        Some(path) => {
            info!("⚙️  Loading config: {}", path);
            let mut config = Config::load_from_file(path)?;
            config.merge_from_cli(&args.config, matches);
            config
        }
        None => args.config.clone(),
    };
    config.validate()?;
    Ok(config)
}

fn resolve_workload(args: &RunArgs, config: &Config) -> BalanceResult<Arc<Workload>> {
    match &args.workload {
        Some(path) => super::load_workload(path),
        None => {
            let mut rng = match args.seed {
                Some(s) => Rng::with_seed(s),
                None => Rng::new(),
            };
            info!(
                "🎲 Generating random workload: {} groups x {} buckets",
                config.workload.groups, config.workload.buckets
            );
            let workload = generator::random_workload(&config.workload, &mut rng)?;
            Ok(Arc::new(workload.into_delta_order()))
        }
    }
}

pub fn run(args: RunArgs, matches: &ArgMatches) -> BalanceResult<()> {
    let config = resolve_config(&args, matches)?;
    let workload = resolve_workload(&args, &config)?;

    if args.seed.is_none() {
        warn!("No --seed given, trials will not be reproducible");
    }

    let mut options = EvolutionOptions::from_config(&config, args.strategy);
    options.max_time = args.time.map(Duration::from_secs);
    options.num_threads = args.threads;

    info!(
        "🧬 Running {} trial(s) with strategy '{}': population {}, {} generations, {} mutations per child",
        options.trials,
        options.strategy,
        options.population_size,
        options.generations,
        options.mutations_per_child
    );

    let logger = CliLogger {
        interval: (options.generations / 10).max(1),
    };
    let optimizer = Optimizer::new(workload.clone(), options);
    let trial_results = optimizer.run_trials(args.seed, &logger)?;

    reports::print_trial_report(&trial_results);
    if let Some(summary) = results::summarize(&trial_results) {
        reports::print_run_summary(&summary, workload.lower_bound_fitness());
    }

    if let Some(path) = &args.trajectory {
        results::write_trajectory_csv(path, &trial_results)?;
    }
    if let Some(path) = &args.summary {
        results::write_summary_json(path, &trial_results)?;
    }
    Ok(())
}
