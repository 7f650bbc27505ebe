//! Steady-state pool contents under a constant input
//!
//! At equilibrium the pool derivatives vanish, so the pool vector `C`
//! satisfies `(A * K) C = u b` for input rate `u`. The system is solved by
//! LU decomposition rather than by forming the inverse. `A * K` is
//! invertible whenever `A` has unit diagonal, non-positive off-diagonals
//! and off-diagonal column magnitudes summing below 1 (a diagonal
//! dominance argument); this precondition is documented, not re-verified
//! here, and parameterizations that break it surface as
//! [`SOCMError::SingularSystem`].

use crate::errors::{SOCMError, SOCMResult};
use crate::matrix::PoolMatrices;
use crate::trajectory::FloatValue;
use log::debug;
use nalgebra::DVector;

/// Solve for the steady-state pool vector under a constant input rate.
pub fn solve_steady_state(
    matrices: &PoolMatrices,
    input_rate: FloatValue,
) -> SOCMResult<DVector<FloatValue>> {
    let rhs = matrices.allocation() * input_rate;
    let solution = matrices
        .outflow()
        .lu()
        .solve(&rhs)
        .ok_or_else(|| singular(matrices))?;
    debug!(
        "steady state for {} pools at input {}: total {}",
        matrices.num_pools(),
        input_rate,
        solution.sum()
    );
    Ok(solution)
}

pub(crate) fn singular(matrices: &PoolMatrices) -> SOCMError {
    SOCMError::SingularSystem(format!(
        "transfer/decay system of {} pools is not invertible; \
         check that the transfer fractions leaving each pool sum to less than 1 \
         (transfer matrix {:?}, decay diagonal {:?})",
        matrices.num_pools(),
        matrices.transfer(),
        matrices.decay().diagonal()
    ))
}
