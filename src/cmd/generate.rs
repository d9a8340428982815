use clap::Args;
use fastrand::Rng;
use netbalance::config::WorkloadParams;
use netbalance::workload::{generator, loader};
use netbalance::BalanceResult;
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub params: WorkloadParams,

    /// Output path. `.json` writes JSON, anything else the text format.
    #[arg(short, long)]
    pub out: String,

    #[arg(short = 'S', long)]
    pub seed: Option<u64>,
}

pub fn run(args: GenerateArgs) -> BalanceResult<()> {
    let mut rng = match args.seed {
        Some(s) => Rng::with_seed(s),
        None => Rng::new(),
    };

    let workload = generator::random_workload(&args.params, &mut rng)?;
    loader::save_to_file(&workload, &args.out)?;

    info!(
        "💾 Wrote {} groups x {} buckets (total load {}) to {}",
        workload.group_count(),
        workload.bucket_count(),
        workload.total_load(),
        args.out
    );
    Ok(())
}
