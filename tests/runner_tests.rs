mod common;

use common::{random_workload, workload};
use netbalance::config::{Config, Strategy};
use netbalance::optimizer::{EvolutionOptions, Optimizer, ProgressCallback, Silent};
use netbalance::results;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::TempDir;

fn options(strategy: Strategy) -> EvolutionOptions {
    let mut config = Config::default();
    config.evolution.population_size = 8;
    config.evolution.generations = 60;
    config.evolution.mutations_per_child = 5;
    config.evolution.stop_at_zero = false;
    EvolutionOptions::from_config(&config, strategy)
}

struct StopAfter {
    limit: usize,
    calls: AtomicUsize,
}

impl ProgressCallback for StopAfter {
    fn on_progress(&self, _trial: usize, generation: usize, _best_fitness: u64) -> bool {
        self.calls.fetch_add(1, Ordering::SeqCst);
        generation < self.limit
    }
}

#[test]
fn test_trajectory_tracks_best_fitness() {
    let w = random_workload(20, 6, 5);
    let optimizer = Optimizer::new(w, options(Strategy::Crossover));
    let result = optimizer.run_trial(0, Some(5), &Silent).unwrap();

    assert_eq!(result.generations_run, 60);
    assert_eq!(result.trajectory.len(), result.generations_run + 1);
    assert_eq!(result.trajectory[0].best, result.initial_best);
    assert_eq!(result.trajectory.last().map(|s| s.best), Some(result.best_fitness));
    assert!(result
        .trajectory
        .windows(2)
        .all(|pair| pair[1].best <= pair[0].best));
    assert!(result.best_fitness <= result.initial_best);
    assert!(result.initial_best <= result.greedy_fitness);
    assert_eq!(result.best_totals.len(), 6);
    assert_eq!(result.assignment.len(), 20);
}

#[test]
fn test_stops_immediately_on_perfect_balance() {
    let w = workload(&[vec![2, 2, 2], vec![7, 7, 7]]);
    let mut opts = options(Strategy::TwoRandom);
    opts.stop_at_zero = true;
    let result = Optimizer::new(w, opts).run_trial(0, Some(1), &Silent).unwrap();

    assert_eq!(result.best_fitness, 0);
    assert_eq!(result.generations_run, 0);
    assert_eq!(result.trajectory.len(), 1);
}

#[test]
fn test_patience_ends_stale_trials() {
    let w = workload(&[vec![5, 5], vec![3, 3]]);
    let mut opts = options(Strategy::Crossover);
    opts.patience = 3;
    let result = Optimizer::new(w, opts).run_trial(0, Some(1), &Silent).unwrap();

    assert_eq!(result.best_fitness, 0);
    assert_eq!(result.generations_run, 3);
}

#[test]
fn test_callback_can_stop_a_trial() {
    let w = random_workload(10, 4, 8);
    let callback = StopAfter {
        limit: 4,
        calls: AtomicUsize::new(0),
    };
    let result = Optimizer::new(w, options(Strategy::Crossover))
        .run_trial(0, Some(8), &callback)
        .unwrap();

    assert_eq!(result.generations_run, 4);
    assert_eq!(callback.calls.load(Ordering::SeqCst), 4);
}

#[test]
fn test_seeded_trials_are_reproducible() {
    let w = random_workload(15, 5, 13);
    let run = |threads: Option<usize>| {
        let mut opts = options(Strategy::Crossover);
        opts.trials = 4;
        opts.num_threads = threads;
        Optimizer::new(w.clone(), opts)
            .run_trials(Some(100), &Silent)
            .unwrap()
    };

    let first = run(None);
    let second = run(Some(2));
    assert_eq!(first.len(), 4);
    for (i, (a, b)) in first.iter().zip(&second).enumerate() {
        assert_eq!(a.trial, i);
        assert_eq!(a.seed, Some(100 + i as u64));
        assert_eq!(a.best_fitness, b.best_fitness);
        assert_eq!(a.assignment, b.assignment);
        assert_eq!(a.best_totals, b.best_totals);
    }
}

#[test]
fn test_results_files_are_written() {
    let w = random_workload(8, 4, 3);
    let mut opts = options(Strategy::TwoRandom);
    opts.trials = 2;
    let trials = Optimizer::new(w, opts).run_trials(Some(3), &Silent).unwrap();

    let dir = TempDir::new().unwrap();
    let csv_path = dir.path().join("trajectory.csv");
    let json_path = dir.path().join("summary.json");
    results::write_trajectory_csv(&csv_path, &trials).unwrap();
    results::write_summary_json(&json_path, &trials).unwrap();

    let csv = std::fs::read_to_string(&csv_path).unwrap();
    let mut lines = csv.lines();
    assert_eq!(lines.next(), Some("trial,generation,best,mean,worst"));
    let rows: usize = trials.iter().map(|t| t.trajectory.len()).sum();
    assert_eq!(lines.count(), rows);

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(json["summary"]["trials"], 2);
    assert_eq!(json["trials"].as_array().map(Vec::len), Some(2));

    let summary = results::summarize(&trials).unwrap();
    assert!(summary.best <= summary.worst);
    assert!(results::summarize(&[]).is_none());
}

#[test]
fn test_options_follow_config() {
    let config = Config::default();
    let opts = EvolutionOptions::from_config(&config, Strategy::TwoRandom);
    assert_eq!(opts.strategy, Strategy::TwoRandom);
    assert_eq!(opts.population_size, config.evolution.population_size);
    assert_eq!(opts.generations, config.evolution.generations);
    assert!(opts.max_time.is_none());
    assert!(opts.num_threads.is_none());
}
