//! Reduction of an n-pool model to an equivalent one-pool model
//!
//! The vector `(A K)^-1 b` holds the steady-state carbon each pool carries
//! per unit of input; its sum is therefore the total steady-state carbon
//! per unit input, which has the dimensions of a time and acts as the
//! aggregate turnover time of the whole system. A one-pool model given
//! this turnover time and the same input rate reproduces the full model's
//! total steady-state carbon exactly:
//!
//! `C_total = u * sum((A K)^-1 b) = u * tau_agg`
//!
//! This is the scalar handed to the reduced model when comparing it
//! against the full multi-pool run.

use crate::errors::SOCMResult;
use crate::matrix::PoolMatrices;
use crate::pools::{MultiPoolParameters, OnePoolParameters};
use crate::steady_state::singular;
use crate::trajectory::FloatValue;
use log::debug;

/// Aggregate turnover time of an n-pool system.
pub fn aggregate_turnover_time(matrices: &PoolMatrices) -> SOCMResult<FloatValue> {
    let per_unit_input = matrices
        .outflow()
        .lu()
        .solve(matrices.allocation())
        .ok_or_else(|| singular(matrices))?;
    let tau = per_unit_input.sum();
    debug!(
        "aggregate turnover time of {} pools: {}",
        matrices.num_pools(),
        tau
    );
    Ok(tau)
}

/// Reduce an n-pool parameter set to the equivalent one-pool parameters.
pub fn reduce_to_one_pool(parameters: &MultiPoolParameters) -> SOCMResult<OnePoolParameters> {
    let matrices = PoolMatrices::from_parameters(parameters);
    OnePoolParameters::new(aggregate_turnover_time(&matrices)?)
}
