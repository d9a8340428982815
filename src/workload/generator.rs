use super::{Group, Workload};
use crate::config::WorkloadParams;
use crate::error::BalanceResult;
use fastrand::Rng;
use tracing::debug;

/// Generates a random workload.
///
/// Every group draws one scale in `[0, max_group_scale)` and each of its
/// sub-units weighs `scale * [0, max_unit_factor)`, so groups differ in
/// magnitude as real topics do.
pub fn random_workload(params: &WorkloadParams, rng: &mut Rng) -> BalanceResult<Workload> {
    params.validate()?;

    let groups: Vec<Group> = (0..params.groups)
        .map(|g| {
            let scale = rng.u64(0..params.max_group_scale);
            let values: Vec<u64> = (0..params.buckets)
                .map(|_| scale * rng.u64(0..params.max_unit_factor))
                .collect();
            Group::new(g.to_string(), &values)
        })
        .collect();

    debug!(
        "Generated workload: {} groups x {} buckets",
        params.groups, params.buckets
    );
    Workload::new(groups)
}
