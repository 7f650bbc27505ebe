//! Scenario orchestration
//!
//! Every scenario runs the five-pool model and its reduced one-pool
//! equivalent side by side over the same time grid. The pair is seeded
//! consistently: the multi-pool steady state under the input's reference
//! rate (or bare substrate for spin-up), with the total handed to the
//! one-pool model. The reduced model's turnover time comes from the
//! aggregate reduction, so the two runs share their total steady-state
//! carbon by construction and differ only transiently.

use crate::parameters::FivePoolParameters;
use log::{debug, info};
use nalgebra::DVector;
use socm_core::errors::SOCMResult;
use socm_core::input::CarbonInput;
use socm_core::ivp::SolverOptions;
use socm_core::model::{MultiPoolModel, OnePoolModel};
use socm_core::trajectory::{FloatValue, Time, Trajectory};

/// Paired trajectories of the full and reduced models for one scenario.
#[derive(Debug, Clone)]
pub struct ModelComparison {
    /// Aggregate turnover time driving the reduced model.
    pub aggregate_turnover: FloatValue,
    /// Pool contents both runs started from.
    pub initial_pools: DVector<FloatValue>,
    /// Trajectory of the five-pool model.
    pub five_pool: Trajectory,
    /// Trajectory of the reduced one-pool model.
    pub one_pool: Trajectory,
}

/// Run both models under an input source, seeded from the multi-pool
/// steady state at the input's reference rate.
pub fn run_comparison(
    parameters: &FivePoolParameters,
    input: CarbonInput,
    t_end: Time,
    options: &SolverOptions,
) -> SOCMResult<ModelComparison> {
    let seed_rate = input.reference_rate();
    run_pair(parameters, input, Some(seed_rate), t_end, options)
}

/// Constant input onto bare substrate: both models accumulate carbon
/// towards the shared equilibrium total.
pub fn spin_up(
    parameters: &FivePoolParameters,
    t_end: Time,
    options: &SolverOptions,
) -> SOCMResult<ModelComparison> {
    let input = CarbonInput::constant(parameters.input_rate)?;
    run_pair(parameters, input, None, t_end, options)
}

/// Zero input from an equilibrated sample: a laboratory incubation of
/// soil removed from its carbon source.
pub fn incubation(
    parameters: &FivePoolParameters,
    t_end: Time,
    options: &SolverOptions,
) -> SOCMResult<ModelComparison> {
    run_pair(
        parameters,
        CarbonInput::Zero,
        Some(parameters.input_rate),
        t_end,
        options,
    )
}

/// Sinusoidal annual input cycle around the long-run mean, seeded at the
/// mean-input equilibrium.
pub fn seasonal(
    parameters: &FivePoolParameters,
    amplitude: FloatValue,
    t_end: Time,
    options: &SolverOptions,
) -> SOCMResult<ModelComparison> {
    let input = CarbonInput::seasonal(parameters.input_rate, amplitude, 1.0, 0.0)?;
    run_pair(
        parameters,
        input,
        Some(parameters.input_rate),
        t_end,
        options,
    )
}

/// A step change of the input rate at `cutoff`, seeded at the pre-shift
/// equilibrium.
pub fn regime_shift(
    parameters: &FivePoolParameters,
    cutoff: Time,
    factor: FloatValue,
    t_end: Time,
    options: &SolverOptions,
) -> SOCMResult<ModelComparison> {
    let input = CarbonInput::step_shift(parameters.input_rate, cutoff, factor)?;
    run_pair(
        parameters,
        input,
        Some(parameters.input_rate),
        t_end,
        options,
    )
}

/// Respired flux of the five-pool model at its steady state under a
/// constant input rate. Equals the input rate for any invertible system,
/// which makes it a cheap cross-check of a parameterization.
pub fn equilibrium_respiration(
    parameters: &FivePoolParameters,
    input_rate: FloatValue,
) -> SOCMResult<FloatValue> {
    let model = MultiPoolModel::new(
        parameters.to_multi_pool()?,
        CarbonInput::constant(input_rate)?,
    );
    let steady = model.steady_state(input_rate)?;
    let flux = model.matrices().outflow() * steady;
    Ok(flux.sum())
}

fn run_pair(
    parameters: &FivePoolParameters,
    input: CarbonInput,
    seed_rate: Option<FloatValue>,
    t_end: Time,
    options: &SolverOptions,
) -> SOCMResult<ModelComparison> {
    let five_pool_model = MultiPoolModel::new(parameters.to_multi_pool()?, input.clone());
    let one_pool_parameters = five_pool_model.reduce()?;
    let one_pool_model = OnePoolModel::new(one_pool_parameters, input);

    let initial_pools = match seed_rate {
        Some(rate) => five_pool_model.steady_state(rate)?,
        None => DVector::zeros(five_pool_model.num_pools()),
    };
    info!(
        "comparison run to t={t_end}: aggregate turnover {:.3} yr, seeded total {:.4}",
        one_pool_parameters.turnover_time,
        initial_pools.sum()
    );
    debug!("initial pools: {:?}", initial_pools.as_slice());

    let five_pool = five_pool_model.simulate(
        five_pool_model.initial_state(&initial_pools),
        0.0,
        t_end,
        options,
    )?;
    let one_pool = one_pool_model.simulate(
        OnePoolModel::initial_state(initial_pools.sum()),
        0.0,
        t_end,
        options,
    )?;

    Ok(ModelComparison {
        aggregate_turnover: one_pool_parameters.turnover_time,
        initial_pools,
        five_pool,
        one_pool,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use socm_core::trajectory::{COL_INPUT_RATE, COL_TOTAL_CARBON};

    fn options() -> SolverOptions {
        SolverOptions::default()
    }

    #[test]
    fn test_spin_up_accumulates_carbon() {
        let comparison =
            spin_up(&FivePoolParameters::default(), 50.0, &options()).unwrap();

        assert_eq!(comparison.initial_pools.sum(), 0.0);
        let total = comparison.five_pool.column(COL_TOTAL_CARBON).unwrap();
        assert!(total[0] < 1e-12);
        for i in 1..comparison.five_pool.num_rows() {
            assert!(
                total[i] >= total[i - 1] - 1e-12,
                "spin-up totals must not decrease (row {i})"
            );
        }
    }

    #[test]
    fn test_runs_share_time_grid() {
        let comparison =
            incubation(&FivePoolParameters::default(), 10.0, &options()).unwrap();
        assert_eq!(
            comparison.five_pool.num_rows(),
            comparison.one_pool.num_rows()
        );
        let five_times = comparison.five_pool.times();
        let one_times = comparison.one_pool.times();
        for i in 0..five_times.len() {
            assert_eq!(five_times[i], one_times[i]);
        }
    }

    #[test]
    fn test_incubation_has_zero_input_column() {
        let comparison =
            incubation(&FivePoolParameters::default(), 5.0, &options()).unwrap();
        let input = comparison.five_pool.column(COL_INPUT_RATE).unwrap();
        assert!(input.iter().all(|&u| u == 0.0));
    }

    #[test]
    fn test_regime_shift_input_column_steps_down() {
        let comparison = regime_shift(
            &FivePoolParameters::default(),
            10.0,
            0.5,
            20.0,
            &options(),
        )
        .unwrap();

        let trajectory = &comparison.five_pool;
        let times = trajectory.times();
        let input = trajectory.column(COL_INPUT_RATE).unwrap();
        for i in 0..trajectory.num_rows() {
            let expected = if times[i] < 10.0 { 0.26 } else { 0.13 };
            assert!(
                (input[i] - expected).abs() < 1e-12,
                "input at t={} should be {expected}, got {}",
                times[i],
                input[i]
            );
        }
    }

    #[test]
    fn test_equilibrium_comparison_totals_stay_matched() {
        let parameters = FivePoolParameters::default();
        let input = CarbonInput::constant(parameters.input_rate).unwrap();
        let comparison = run_comparison(&parameters, input, 25.0, &options()).unwrap();

        let expected = parameters.input_rate * comparison.aggregate_turnover;
        let five_total = comparison.five_pool.final_value(COL_TOTAL_CARBON).unwrap();
        let one_total = comparison.one_pool.final_value(COL_TOTAL_CARBON).unwrap();
        assert!(
            (five_total - expected).abs() < 1e-6,
            "five-pool total drifted from equilibrium: {five_total} vs {expected}"
        );
        assert!(
            (one_total - expected).abs() < 1e-6,
            "one-pool total drifted from equilibrium: {one_total} vs {expected}"
        );
    }

    #[test]
    fn test_equilibrium_respiration_matches_input() {
        let respiration =
            equilibrium_respiration(&FivePoolParameters::default(), 0.26).unwrap();
        assert!(
            (respiration - 0.26).abs() < 1e-10,
            "steady-state respiration should equal the input rate, got {respiration}"
        );
    }

    #[test]
    fn test_seasonal_rejects_excess_amplitude() {
        let parameters = FivePoolParameters::default();
        let err = seasonal(&parameters, parameters.input_rate * 2.0, 5.0, &options());
        assert!(err.is_err(), "amplitude above the mean must be rejected");
    }
}
