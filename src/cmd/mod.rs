pub mod generate;
pub mod inspect;
pub mod run;

use netbalance::workload::{loader, Workload};
use netbalance::BalanceResult;
use std::sync::Arc;
use tracing::info;

/// Loads a workload file and puts groups in delta order, widest last.
pub fn load_workload(path: &str) -> BalanceResult<Arc<Workload>> {
    info!("📂 Loading Workload: {}", path);
    let workload = loader::load_from_file(path)?.into_delta_order();
    Ok(Arc::new(workload))
}
