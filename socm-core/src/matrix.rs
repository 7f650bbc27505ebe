//! Decay and transfer matrix construction
//!
//! A validated [`MultiPoolParameters`] maps onto three pieces of linear
//! algebra:
//!
//! - the decay matrix `K`, diagonal with the reciprocal turnover times
//! - the transfer matrix `A`, unit diagonal with `A[i][j] = -f(j->i)` for
//!   the fraction of pool `j`'s decay redirected into pool `i`
//! - the allocation vector `b`, distributing external input across pools
//!
//! The product `A * K` maps pool contents to their net outflow rates, and
//! is the coefficient matrix of both the steady-state solve and the
//! multi-pool right-hand side. Construction is pure; matrices are built
//! once per model and cached there rather than rebuilt inside derivative
//! evaluations.

use crate::pools::MultiPoolParameters;
use crate::trajectory::FloatValue;
use nalgebra::{DMatrix, DVector};

/// The matrix form of an n-pool parameter set.
#[derive(Debug, Clone, PartialEq)]
pub struct PoolMatrices {
    decay: DMatrix<FloatValue>,
    transfer: DMatrix<FloatValue>,
    allocation: DVector<FloatValue>,
}

impl PoolMatrices {
    /// Build `K`, `A` and `b` from a validated parameter set.
    pub fn from_parameters(parameters: &MultiPoolParameters) -> Self {
        let n = parameters.num_pools();

        let decay = DMatrix::from_diagonal(&DVector::from_iterator(
            n,
            parameters.pools().iter().map(|pool| pool.decay_rate()),
        ));

        let mut transfer = DMatrix::identity(n, n);
        for t in parameters.transfers() {
            transfer[(t.to, t.from)] = -t.fraction;
        }

        let allocation = DVector::from_column_slice(parameters.allocation());

        Self {
            decay,
            transfer,
            allocation,
        }
    }

    pub fn num_pools(&self) -> usize {
        self.allocation.len()
    }

    /// The diagonal decay matrix `K`.
    pub fn decay(&self) -> &DMatrix<FloatValue> {
        &self.decay
    }

    /// The transfer matrix `A`.
    pub fn transfer(&self) -> &DMatrix<FloatValue> {
        &self.transfer
    }

    /// The allocation vector `b`.
    pub fn allocation(&self) -> &DVector<FloatValue> {
        &self.allocation
    }

    /// The net-outflow operator `A * K`.
    pub fn outflow(&self) -> DMatrix<FloatValue> {
        &self.transfer * &self.decay
    }
}
