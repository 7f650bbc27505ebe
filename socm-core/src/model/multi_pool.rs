//! Multi-pool decomposition model
//!
//! The n-pool system in matrix form, with `A` the transfer matrix, `K`
//! the decay matrix and `b` the allocation vector:
//!
//! ```text
//! flux      = A * K * pools        net outflow per pool
//! dPools/dt = u(t) * b - flux
//! dCO2/dt   = sum(flux)            what leaves the system entirely
//! ```
//!
//! Transfers between pools cancel in the column sums of `A * K`, so
//! `sum(flux)` is exactly the respired carbon and the whole-system balance
//! `dCO2/dt + sum(dPools/dt) = u(t)` holds algebraically; it is asserted
//! against the model's tolerance on every evaluation with nonzero input.
//! `A`, `K` and their product are cached at construction, once per model
//! rather than once per derivative call.

use crate::aggregate::reduce_to_one_pool;
use crate::errors::{SOCMError, SOCMResult};
use crate::input::CarbonInput;
use crate::ivp::{integrate, Ivp, SolverOptions};
use crate::matrix::PoolMatrices;
use crate::model::DEFAULT_CONSERVATION_TOLERANCE;
use crate::pools::{MultiPoolParameters, OnePoolParameters};
use crate::steady_state::solve_steady_state;
use crate::trajectory::{
    FloatValue, Time, Trajectory, COL_CUMULATIVE_RESPIRATION, COL_INPUT_RATE,
    COL_RESPIRATION_RATE, COL_TIME, COL_TOTAL_CARBON,
};
use nalgebra::{DMatrix, DVector};

/// State vector `[cumulative respiration, pool_1, .., pool_n]`.
pub type MultiPoolState = DVector<FloatValue>;

/// The n-pool model with its cached matrix form.
#[derive(Debug, Clone)]
pub struct MultiPoolModel {
    parameters: MultiPoolParameters,
    input: CarbonInput,
    matrices: PoolMatrices,
    outflow: DMatrix<FloatValue>,
    conservation_tolerance: FloatValue,
}

impl MultiPoolModel {
    pub fn new(parameters: MultiPoolParameters, input: CarbonInput) -> Self {
        let matrices = PoolMatrices::from_parameters(&parameters);
        let outflow = matrices.outflow();
        Self {
            parameters,
            input,
            matrices,
            outflow,
            conservation_tolerance: DEFAULT_CONSERVATION_TOLERANCE,
        }
    }

    /// Override the mass-balance tolerance.
    pub fn with_conservation_tolerance(self, tolerance: FloatValue) -> Self {
        Self {
            conservation_tolerance: tolerance,
            ..self
        }
    }

    pub fn parameters(&self) -> &MultiPoolParameters {
        &self.parameters
    }

    pub fn input(&self) -> &CarbonInput {
        &self.input
    }

    pub fn matrices(&self) -> &PoolMatrices {
        &self.matrices
    }

    pub fn num_pools(&self) -> usize {
        self.parameters.num_pools()
    }

    /// Equilibrium pool vector under a constant input rate.
    pub fn steady_state(&self, input_rate: FloatValue) -> SOCMResult<DVector<FloatValue>> {
        solve_steady_state(&self.matrices, input_rate)
    }

    /// The equivalent one-pool parameters for this system.
    pub fn reduce(&self) -> SOCMResult<OnePoolParameters> {
        reduce_to_one_pool(&self.parameters)
    }

    /// Build a state from pool contents, with no respired carbon.
    pub fn initial_state(&self, pools: &DVector<FloatValue>) -> MultiPoolState {
        assert_eq!(
            pools.len(),
            self.num_pools(),
            "pool vector has {} entries for {} pools",
            pools.len(),
            self.num_pools()
        );
        let mut state = MultiPoolState::zeros(self.num_pools() + 1);
        state.rows_mut(1, self.num_pools()).copy_from(pools);
        state
    }

    /// Evaluate the derivatives at `(t, y)`.
    pub fn derivatives(&self, t: Time, y: &MultiPoolState) -> SOCMResult<MultiPoolState> {
        let mut dy_dt = MultiPoolState::zeros(y.len());
        self.calculate_dy_dt(t, y, &mut dy_dt)?;
        Ok(dy_dt)
    }

    /// Integrate the model and assemble the trajectory table.
    pub fn simulate(
        &self,
        initial_state: MultiPoolState,
        t_start: Time,
        t_end: Time,
        options: &SolverOptions,
    ) -> SOCMResult<Trajectory> {
        let (times, states) = integrate(self, initial_state, t_start, t_end, options)?;
        let n = self.num_pools();

        let mut columns = Vec::with_capacity(n + 5);
        columns.push(COL_TIME.to_string());
        columns.push(COL_CUMULATIVE_RESPIRATION.to_string());
        for pool in self.parameters.pools() {
            columns.push(pool.name.clone());
        }
        columns.push(COL_TOTAL_CARBON.to_string());
        columns.push(COL_RESPIRATION_RATE.to_string());
        columns.push(COL_INPUT_RATE.to_string());

        let rows = times
            .iter()
            .zip(&states)
            .map(|(&t, y)| {
                let pools = y.rows(1, n).into_owned();
                let flux = &self.outflow * &pools;
                let mut row = Vec::with_capacity(columns.len());
                row.push(t);
                row.push(y[0]);
                row.extend(pools.iter().copied());
                row.push(pools.sum());
                row.push(flux.sum());
                row.push(self.input.rate_at(t));
                row
            })
            .collect();
        Ok(Trajectory::from_rows(columns, rows))
    }
}

impl Ivp<MultiPoolState> for MultiPoolModel {
    fn calculate_dy_dt(
        &self,
        t: Time,
        y: &MultiPoolState,
        dy_dt: &mut MultiPoolState,
    ) -> SOCMResult<()> {
        let n = self.num_pools();
        assert_eq!(
            y.len(),
            n + 1,
            "state vector has {} entries for {} pools",
            y.len(),
            n
        );

        let pools = y.rows(1, n).into_owned();
        let flux = &self.outflow * &pools;
        let input = self.input.rate_at(t);
        let allocation = self.matrices.allocation();

        dy_dt[0] = flux.sum();
        for i in 0..n {
            dy_dt[i + 1] = input * allocation[i] - flux[i];
        }

        // Whole-system balance: transfers cancel, so the derivatives sum
        // to the input flux. Checked whenever carbon is entering.
        if input != 0.0 {
            let total_rate = dy_dt.sum();
            let relative_error = ((total_rate - input) / input).abs();
            if relative_error > self.conservation_tolerance {
                return Err(SOCMError::ConservationViolation {
                    time: t,
                    expected: input,
                    actual: total_rate,
                    relative_error,
                });
            }
        }
        Ok(())
    }
}
