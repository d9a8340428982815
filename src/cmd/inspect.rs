use crate::reports;
use clap::Args;
use netbalance::optimizer::Distribution;
use netbalance::BalanceResult;

#[derive(Args, Debug, Clone)]
pub struct InspectArgs {
    #[arg(short, long)]
    pub workload: String,
}

pub fn run(args: InspectArgs) -> BalanceResult<()> {
    let workload = super::load_workload(&args.workload)?;
    reports::print_workload_report(&workload);

    let greedy = Distribution::greedy(workload.clone());
    greedy.verify()?;
    reports::print_bucket_totals("Greedy", &greedy);
    Ok(())
}
