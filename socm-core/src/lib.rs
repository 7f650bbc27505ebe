//! Core functionality for first-order multi-pool soil organic carbon models
//!
//! A soil carbon model here is a set of pools with fixed turnover times,
//! connected by transfer fractions and fed by an external carbon input.
//! The crate provides:
//!
//! - the flat parameter table and the validated parameter structures
//!   ([`table`], [`pools`])
//! - construction of the decay/transfer matrices ([`matrix`])
//! - the steady-state linear solve and the aggregate turnover-time
//!   reduction to an equivalent one-pool model ([`steady_state`],
//!   [`aggregate`])
//! - pluggable carbon input sources ([`input`])
//! - the one-pool and multi-pool ODE right-hand sides ([`model`])
//! - fixed-step integration and the tabular trajectory output
//!   ([`ivp`], [`trajectory`])
//!
//! Concrete parameterizations and scenario orchestration live in the
//! `socm-scenarios` crate.

pub mod aggregate;
pub mod errors;
pub mod input;
pub mod ivp;
pub mod matrix;
pub mod model;
pub mod pools;
pub mod steady_state;
pub mod table;
pub mod trajectory;
