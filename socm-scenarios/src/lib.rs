//! Concrete soil carbon parameterizations and scenario drivers
//!
//! This crate holds the five-pool parameterization (metabolic and
//! structural litter feeding fast, slow and passive soil pools) and the
//! scenario orchestration that compares the full model against its reduced
//! one-pool equivalent:
//!
//! - `spin_up`: constant input onto bare substrate
//! - `incubation`: zero input from an equilibrated sample
//! - `seasonal`: sinusoidal annual input cycle around the mean
//! - `regime_shift`: a step change in the long-run input rate
//!
//! Each driver seeds both models consistently (the multi-pool steady
//! state, with its total handed to the one-pool model), integrates both
//! over the same grid and returns the paired trajectories.

pub mod parameters;
pub mod scenarios;

pub use parameters::FivePoolParameters;
pub use scenarios::{
    incubation, regime_shift, run_comparison, seasonal, spin_up, ModelComparison,
};
