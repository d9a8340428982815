use crate::error::BalanceResult;
use crate::optimizer::TrialResult;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

#[derive(Debug, Serialize, Deserialize)]
struct TrajectoryRow {
    trial: usize,
    generation: usize,
    best: u64,
    mean: f64,
    worst: u64,
}

/// Aggregate over a batch of trials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub trials: usize,
    pub best: u64,
    pub worst: u64,
    pub mean_best: f64,
    pub mean_generations: f64,
}

pub fn summarize(results: &[TrialResult]) -> Option<RunSummary> {
    if results.is_empty() {
        return None;
    }
    let n = results.len() as f64;
    Some(RunSummary {
        trials: results.len(),
        best: results.iter().map(|r| r.best_fitness).min()?,
        worst: results.iter().map(|r| r.best_fitness).max()?,
        mean_best: results.iter().map(|r| r.best_fitness as f64).sum::<f64>() / n,
        mean_generations: results.iter().map(|r| r.generations_run as f64).sum::<f64>() / n,
    })
}

/// One CSV row per trial and generation: `trial,generation,best,mean,worst`.
pub fn write_trajectory_csv<P: AsRef<Path>>(path: P, results: &[TrialResult]) -> BalanceResult<()> {
    let path = path.as_ref();
    let mut wtr = csv::Writer::from_path(path)?;
    for result in results {
        for stats in &result.trajectory {
            wtr.serialize(TrajectoryRow {
                trial: result.trial,
                generation: stats.generation,
                best: stats.best,
                mean: stats.mean,
                worst: stats.worst,
            })?;
        }
    }
    wtr.flush()?;
    info!("Wrote trajectories to {}", path.display());
    Ok(())
}

#[derive(Serialize)]
struct SummaryFile<'a> {
    summary: Option<RunSummary>,
    trials: Vec<TrialSummary<'a>>,
}

#[derive(Serialize)]
struct TrialSummary<'a> {
    trial: usize,
    seed: Option<u64>,
    greedy_fitness: u64,
    initial_best: u64,
    best_fitness: u64,
    generations_run: usize,
    elapsed_secs: f64,
    best_totals: &'a [u64],
    assignment: &'a [Vec<usize>],
}

/// Pretty JSON with the batch summary and each trial's best assignment.
pub fn write_summary_json<P: AsRef<Path>>(path: P, results: &[TrialResult]) -> BalanceResult<()> {
    let path = path.as_ref();
    let file = SummaryFile {
        summary: summarize(results),
        trials: results
            .iter()
            .map(|r| TrialSummary {
                trial: r.trial,
                seed: r.seed,
                greedy_fitness: r.greedy_fitness,
                initial_best: r.initial_best,
                best_fitness: r.best_fitness,
                generations_run: r.generations_run,
                elapsed_secs: r.elapsed_secs,
                best_totals: &r.best_totals,
                assignment: &r.assignment,
            })
            .collect(),
    };
    fs::write(path, serde_json::to_string_pretty(&file)?)?;
    info!("Wrote summary to {}", path.display());
    Ok(())
}
