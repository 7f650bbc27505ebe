//! Reduced one-pool decomposition model
//!
//! A single aggregate pool decaying at `1/turnover_time`, fed by a carbon
//! input source:
//!
//! ```text
//! dCO2/dt  = soil / turnover_time
//! dSoil/dt = u(t) - soil / turnover_time
//! ```
//!
//! Driven with the aggregate turnover time of an n-pool system
//! ([`crate::aggregate`]), this model reproduces the full system's total
//! steady-state carbon and acts as its cheap stand-in in comparisons.

use crate::errors::{SOCMError, SOCMResult};
use crate::input::CarbonInput;
use crate::ivp::{integrate, Ivp, SolverOptions};
use crate::model::DEFAULT_CONSERVATION_TOLERANCE;
use crate::pools::OnePoolParameters;
use crate::trajectory::{
    FloatValue, Time, Trajectory, COL_CUMULATIVE_RESPIRATION, COL_INPUT_RATE,
    COL_RESPIRATION_RATE, COL_TIME, COL_TOTAL_CARBON,
};
use ode_solvers::Vector2;

/// State vector `[cumulative respiration, soil carbon]`.
pub type OnePoolState = Vector2<FloatValue>;

/// Column label of the single soil pool.
pub const COL_SOIL: &str = "soil";

/// The one-pool model: parameters, input source and mass-balance tolerance.
#[derive(Debug, Clone)]
pub struct OnePoolModel {
    parameters: OnePoolParameters,
    input: CarbonInput,
    conservation_tolerance: FloatValue,
}

impl OnePoolModel {
    pub fn new(parameters: OnePoolParameters, input: CarbonInput) -> Self {
        Self {
            parameters,
            input,
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

    pub fn parameters(&self) -> &OnePoolParameters {
        &self.parameters
    }

    pub fn input(&self) -> &CarbonInput {
        &self.input
    }

    /// Equilibrium soil carbon under a constant input rate.
    pub fn steady_state(&self, input_rate: FloatValue) -> FloatValue {
        input_rate * self.parameters.turnover_time
    }

    /// Build a state with the given soil carbon and no respired carbon.
    pub fn initial_state(soil: FloatValue) -> OnePoolState {
        OnePoolState::new(0.0, soil)
    }

    /// Evaluate the derivatives at `(t, y)`.
    pub fn derivatives(&self, t: Time, y: &OnePoolState) -> SOCMResult<OnePoolState> {
        let mut dy_dt = OnePoolState::zeros();
        self.calculate_dy_dt(t, y, &mut dy_dt)?;
        Ok(dy_dt)
    }

    /// Integrate the model and assemble the trajectory table.
    pub fn simulate(
        &self,
        initial_state: OnePoolState,
        t_start: Time,
        t_end: Time,
        options: &SolverOptions,
    ) -> SOCMResult<Trajectory> {
        let (times, states) = integrate(self, initial_state, t_start, t_end, options)?;

        let columns = vec![
            COL_TIME.to_string(),
            COL_CUMULATIVE_RESPIRATION.to_string(),
            COL_SOIL.to_string(),
            COL_TOTAL_CARBON.to_string(),
            COL_RESPIRATION_RATE.to_string(),
            COL_INPUT_RATE.to_string(),
        ];
        let rows = times
            .iter()
            .zip(&states)
            .map(|(&t, y)| {
                let soil = y[1];
                vec![
                    t,
                    y[0],
                    soil,
                    soil,
                    soil / self.parameters.turnover_time,
                    self.input.rate_at(t),
                ]
            })
            .collect();
        Ok(Trajectory::from_rows(columns, rows))
    }
}

impl Ivp<OnePoolState> for OnePoolModel {
    fn calculate_dy_dt(
        &self,
        t: Time,
        y: &OnePoolState,
        dy_dt: &mut OnePoolState,
    ) -> SOCMResult<()> {
        let soil = y[1];
        let decay = soil / self.parameters.turnover_time;
        let input = self.input.rate_at(t);

        dy_dt[0] = decay;
        dy_dt[1] = input - decay;

        // Self-consistency assertion on the derivative computation: the
        // derivatives sum to the input flux by construction, so a
        // violation means corrupted parameters or broken arithmetic.
        // Only meaningful under a nonzero static input.
        if let Some(static_rate) = self.input.static_rate() {
            if static_rate != 0.0 {
                let total_rate = dy_dt[0] + dy_dt[1];
                let relative_error = ((total_rate - static_rate) / static_rate).abs();
                if relative_error > self.conservation_tolerance {
                    return Err(SOCMError::ConservationViolation {
                        time: t,
                        expected: static_rate,
                        actual: total_rate,
                        relative_error,
                    });
                }
            }
        }
        Ok(())
    }
}
