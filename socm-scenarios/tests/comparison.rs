//! Equivalence of the five-pool model and its one-pool reduction.
//!
//! The reduction guarantees equal total steady-state carbon under the
//! same input. These tests check the guarantee algebraically, numerically
//! by running both models to equilibrium, and against the closed-form
//! solutions of the degenerate cases.

use approx::assert_relative_eq;
use nalgebra::DVector;
use socm_core::aggregate::aggregate_turnover_time;
use socm_core::input::CarbonInput;
use socm_core::ivp::SolverOptions;
use socm_core::matrix::PoolMatrices;
use socm_core::model::{MultiPoolModel, OnePoolModel};
use socm_core::pools::{MultiPoolParameters, OnePoolParameters, PoolDefinition};
use socm_core::steady_state::solve_steady_state;
use socm_core::trajectory::{COL_RESPIRATION_RATE, COL_TOTAL_CARBON};
use socm_scenarios::scenarios::run_comparison;
use socm_scenarios::FivePoolParameters;

mod steady_state_equivalence {
    use super::*;

    /// Total steady-state carbon equals input x aggregate turnover time,
    /// for any positive input rate.
    #[test]
    fn test_total_carbon_identity() {
        let parameters = FivePoolParameters::default().to_multi_pool().unwrap();
        let matrices = PoolMatrices::from_parameters(&parameters);
        let tau = aggregate_turnover_time(&matrices).unwrap();

        for input_rate in [0.01, 0.26, 1.0, 42.0] {
            let total = solve_steady_state(&matrices, input_rate).unwrap().sum();
            assert_relative_eq!(total, input_rate * tau, max_relative = 1e-12);
        }
    }

    /// Feeding the solved steady state back into the right-hand side
    /// yields zero pool derivatives and a respiration rate equal to the
    /// input.
    #[test]
    fn test_steady_state_nulls_the_derivatives() {
        let parameters = FivePoolParameters::default();
        let model = MultiPoolModel::new(
            parameters.to_multi_pool().unwrap(),
            CarbonInput::constant(parameters.input_rate).unwrap(),
        );
        let steady = model.steady_state(parameters.input_rate).unwrap();

        let dy_dt = model
            .derivatives(0.0, &model.initial_state(&steady))
            .unwrap();
        for i in 0..model.num_pools() {
            assert!(
                dy_dt[i + 1].abs() < 1e-12,
                "pool {i} derivative at equilibrium: {}",
                dy_dt[i + 1]
            );
        }
        assert_relative_eq!(dy_dt[0], parameters.input_rate, max_relative = 1e-10);
    }

    /// Spinning both models up from bare substrate converges on the same
    /// total, the one the reduction predicts.
    #[test]
    fn test_numeric_spin_up_convergence() {
        let parameters = FivePoolParameters::default();
        // Ten turnover times of the slowest (passive, 800 yr) pool
        let comparison = socm_scenarios::spin_up(
            &parameters,
            8000.0,
            &SolverOptions { step_size: 0.1 },
        )
        .unwrap();

        let expected = parameters.input_rate * comparison.aggregate_turnover;
        let five_total = comparison.five_pool.final_value(COL_TOTAL_CARBON).unwrap();
        let one_total = comparison.one_pool.final_value(COL_TOTAL_CARBON).unwrap();

        assert_relative_eq!(five_total, expected, max_relative = 1e-3);
        assert_relative_eq!(one_total, expected, max_relative = 1e-3);
        assert_relative_eq!(five_total, one_total, max_relative = 1e-3);
    }

    /// The comparison pair seeded at equilibrium starts at matched totals
    /// and matched respiration rates.
    #[test]
    fn test_equilibrium_seeding_is_consistent() {
        let parameters = FivePoolParameters::default();
        let comparison = run_comparison(
            &parameters,
            CarbonInput::constant(parameters.input_rate).unwrap(),
            5.0,
            &SolverOptions::default(),
        )
        .unwrap();

        let five_first = comparison.five_pool.value(0, COL_TOTAL_CARBON).unwrap();
        let one_first = comparison.one_pool.value(0, COL_TOTAL_CARBON).unwrap();
        assert_relative_eq!(five_first, one_first, max_relative = 1e-12);

        // At equilibrium both models respire exactly what enters
        let five_resp = comparison.five_pool.value(0, COL_RESPIRATION_RATE).unwrap();
        let one_resp = comparison.one_pool.value(0, COL_RESPIRATION_RATE).unwrap();
        assert_relative_eq!(five_resp, parameters.input_rate, max_relative = 1e-10);
        assert_relative_eq!(one_resp, parameters.input_rate, max_relative = 1e-10);
    }
}

mod closed_forms {
    use super::*;

    /// With all transfer fractions zero the pools decouple and each
    /// equilibrates at input x allocation x turnover time.
    #[test]
    fn test_independent_pools_closed_form() {
        let parameters = MultiPoolParameters::new(
            vec![
                PoolDefinition::new("litter", 3.0),
                PoolDefinition::new("soil", 40.0),
                PoolDefinition::new("stable", 200.0),
            ],
            vec![],
            vec![0.2, 0.3, 0.5],
        )
        .unwrap();
        let matrices = PoolMatrices::from_parameters(&parameters);

        let steady = solve_steady_state(&matrices, 1.0).unwrap();
        assert_relative_eq!(steady[0], 0.6, max_relative = 1e-12);
        assert_relative_eq!(steady[1], 12.0, max_relative = 1e-12);
        assert_relative_eq!(steady[2], 100.0, max_relative = 1e-12);

        // And the aggregate is the allocation-weighted turnover time
        let tau = aggregate_turnover_time(&matrices).unwrap();
        assert_relative_eq!(tau, 112.6, max_relative = 1e-12);
    }

    /// Incubation of a one-pool sample follows the analytic exponential.
    #[test]
    fn test_one_pool_incubation_analytic() {
        let model = OnePoolModel::new(
            OnePoolParameters::new(15.0).unwrap(),
            CarbonInput::Zero,
        );
        let trajectory = model
            .simulate(
                OnePoolModel::initial_state(100.0),
                0.0,
                15.0,
                &SolverOptions::default(),
            )
            .unwrap();

        // soil(15) = 100 / e ~= 36.79
        let soil = trajectory.final_value(COL_TOTAL_CARBON).unwrap();
        assert!(
            ((soil - 36.79) / 36.79).abs() < 0.01,
            "one turnover time of decay should leave ~36.79, got {soil}"
        );
    }

    /// One-pool spin-up approaches input x turnover time from below and
    /// never overshoots.
    #[test]
    fn test_one_pool_spin_up_asymptote() {
        let model = OnePoolModel::new(
            OnePoolParameters::new(20.0).unwrap(),
            CarbonInput::constant(0.26).unwrap(),
        );
        let trajectory = model
            .simulate(
                OnePoolModel::initial_state(0.0),
                0.0,
                200.0,
                &SolverOptions::default(),
            )
            .unwrap();

        let soil = trajectory.column(COL_TOTAL_CARBON).unwrap();
        for &value in soil.iter() {
            assert!(value <= 5.2 + 1e-9, "spin-up exceeded 5.2: {value}");
        }
        assert_relative_eq!(soil[soil.len() - 1], 5.2, max_relative = 1e-3);
    }
}

mod evaluation_properties {
    use super::*;

    /// Identical (t, state) evaluations return bit-identical derivatives
    /// for both models, under every input regime.
    #[test]
    fn test_rhs_idempotence() {
        let parameters = FivePoolParameters::default();
        let inputs = [
            CarbonInput::constant(0.26).unwrap(),
            CarbonInput::seasonal(0.26, 0.13, 1.0, 0.4).unwrap(),
            CarbonInput::Zero,
            CarbonInput::step_shift(0.26, 3.0, 0.7).unwrap(),
        ];

        for input in inputs {
            let multi = MultiPoolModel::new(
                parameters.to_multi_pool().unwrap(),
                input.clone(),
            );
            let state =
                multi.initial_state(&DVector::from_vec(vec![0.1, 0.9, 4.2, 11.0, 7.7]));
            let first = multi.derivatives(2.71, &state).unwrap();
            let second = multi.derivatives(2.71, &state).unwrap();
            assert_eq!(first, second);

            let one = OnePoolModel::new(OnePoolParameters::new(25.9).unwrap(), input);
            let state = OnePoolModel::initial_state(6.7);
            let first = one.derivatives(2.71, &state).unwrap();
            let second = one.derivatives(2.71, &state).unwrap();
            assert_eq!(first, second);
        }
    }

    /// The transient responses genuinely differ: under incubation the
    /// multi-pool system sheds its litter pools faster than the aggregate
    /// model early on, while the reduction only pins the equilibria.
    #[test]
    fn test_transients_differ_but_start_matched() {
        let parameters = FivePoolParameters::default();
        let comparison = socm_scenarios::incubation(
            &parameters,
            30.0,
            &SolverOptions::default(),
        )
        .unwrap();

        let five = comparison.five_pool.column(COL_TOTAL_CARBON).unwrap();
        let one = comparison.one_pool.column(COL_TOTAL_CARBON).unwrap();
        assert_relative_eq!(five[0], one[0], max_relative = 1e-12);

        let last = five.len() - 1;
        let divergence = (five[last] - one[last]).abs() / one[last];
        assert!(
            divergence > 0.01,
            "expected visible transient divergence, got {divergence}"
        );
    }
}
