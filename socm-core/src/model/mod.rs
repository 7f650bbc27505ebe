//! One-pool and multi-pool decomposition models
//!
//! Both models share the same state convention: element 0 is the
//! cumulative respired carbon, the remaining elements are pool contents.
//! Each model owns its validated parameters, its input source and a
//! mass-balance tolerance; the multi-pool model additionally caches the
//! matrices derived from its parameters so they are built once per run
//! rather than on every derivative evaluation.

mod multi_pool;
mod one_pool;

pub use multi_pool::{MultiPoolModel, MultiPoolState};
pub use one_pool::{OnePoolModel, OnePoolState};

use crate::trajectory::FloatValue;

/// Default relative tolerance of the mass-balance self-check.
///
/// The check asserts that the state derivatives sum to the input flux, an
/// identity that holds algebraically; a violation indicates a
/// floating-point or parameter-corruption bug rather than a modeling
/// choice. Call sites wanting a stricter or looser tolerance configure it
/// per model.
pub const DEFAULT_CONSERVATION_TOLERANCE: FloatValue = 1e-8;
