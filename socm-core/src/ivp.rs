//! Initial-value-problem plumbing
//!
//! Models expose their derivatives through the [`Ivp`] trait and are run
//! through a fixed-step RK4 integrator. Derivative evaluation is fallible
//! (the mass-balance self-check can trip); the ODE solver's calling
//! convention is not, so the adapter records the first error raised inside
//! an evaluation, zeroes the derivatives from then on, and the driver
//! surfaces the recorded error after the solver returns. The right-hand
//! sides themselves stay pure and are safe to call at arbitrary, repeated
//! and non-monotonic times.

use crate::errors::{SOCMError, SOCMResult};
use crate::trajectory::{FloatValue, Time};
use log::debug;
use nalgebra::{allocator::Allocator, DefaultAllocator, Dim, OVector};
use ode_solvers::{Rk4, System};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;

/// A set of ordinary differential equations with fallible evaluation.
pub trait Ivp<V> {
    /// Compute `dy/dt` at `(t, y)` into `dy_dt`.
    fn calculate_dy_dt(&self, t: Time, y: &V, dy_dt: &mut V) -> SOCMResult<()>;
}

/// Options for the ODE integration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverOptions {
    /// Fixed RK4 step size, which is also the output spacing.
    pub step_size: FloatValue,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self { step_size: 0.1 }
    }
}

/// Bridges a fallible [`Ivp`] onto the infallible solver interface.
struct IvpAdapter<'a, M> {
    model: &'a M,
    error: RefCell<Option<SOCMError>>,
}

impl<'a, M> IvpAdapter<'a, M> {
    fn new(model: &'a M) -> Self {
        Self {
            model,
            error: RefCell::new(None),
        }
    }

    fn take_error(&self) -> Option<SOCMError> {
        self.error.borrow_mut().take()
    }
}

impl<'a, 'b, M, D> System<Time, OVector<FloatValue, D>> for &'b IvpAdapter<'a, M>
where
    M: Ivp<OVector<FloatValue, D>>,
    D: Dim,
    DefaultAllocator: Allocator<FloatValue, D>,
{
    fn system(&self, t: Time, y: &OVector<FloatValue, D>, dy: &mut OVector<FloatValue, D>) {
        if self.error.borrow().is_some() {
            dy.fill(0.0);
            return;
        }
        if let Err(err) = self.model.calculate_dy_dt(t, y, dy) {
            dy.fill(0.0);
            *self.error.borrow_mut() = Some(err);
        }
    }
}

/// Integrate a model over `[t_start, t_end]` with fixed RK4 steps.
///
/// Returns the solver's output times and states, one entry per step
/// including the initial condition.
pub fn integrate<M, D>(
    model: &M,
    y0: OVector<FloatValue, D>,
    t_start: Time,
    t_end: Time,
    options: &SolverOptions,
) -> SOCMResult<(Vec<Time>, Vec<OVector<FloatValue, D>>)>
where
    M: Ivp<OVector<FloatValue, D>>,
    D: Dim,
    DefaultAllocator: Allocator<FloatValue, D>,
{
    if !options.step_size.is_finite() || options.step_size <= 0.0 {
        return Err(SOCMError::InvalidParameter {
            name: "step_size".to_string(),
            reason: format!("step size must be positive, got {}", options.step_size),
        });
    }
    if !(t_end > t_start) {
        return Err(SOCMError::InvalidParameter {
            name: "t_end".to_string(),
            reason: format!("integration span [{t_start}, {t_end}] is empty or reversed"),
        });
    }

    debug!(
        "integrating over [{t_start}, {t_end}] with step {}",
        options.step_size
    );

    let adapter = IvpAdapter::new(model);
    let mut solver = Rk4::new(&adapter, t_start, y0, t_end, options.step_size);
    let outcome = solver.integrate();

    // A right-hand-side failure takes precedence over the solver's own
    // report, since the zeroed derivatives it saw afterwards are fiction.
    if let Some(err) = adapter.take_error() {
        return Err(err);
    }
    outcome.map_err(|e| SOCMError::Integration(e.to_string()))?;

    let (times, states) = solver.results().get();
    Ok((times.clone(), states.clone()))
}
