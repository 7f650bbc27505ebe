//! Carbon input sources
//!
//! The external carbon flux feeding a model is a pure function of time,
//! represented as a closed set of variants rather than a callback stored in
//! the parameter set, so input sources serialize alongside parameters and
//! are testable in isolation. Evaluation is stateless and safe at
//! arbitrary, repeated and non-monotonic times; adaptive integrators
//! evaluate derivatives speculatively and out of order.

use crate::errors::{SOCMError, SOCMResult};
use crate::trajectory::{FloatValue, Time};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// A time-dependent carbon input flux.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CarbonInput {
    /// A fixed input rate at all times.
    Constant { rate: FloatValue },
    /// A sinusoid around `mean` that never goes negative.
    /// The period is 1 time unit in the provided scenarios (annual cycling).
    Seasonal {
        mean: FloatValue,
        amplitude: FloatValue,
        period: FloatValue,
        phase: FloatValue,
    },
    /// No input at any time: a sample removed from its carbon source.
    Zero,
    /// `baseline` before the cutoff time, `baseline * factor` from the
    /// cutoff onwards.
    StepShift {
        baseline: FloatValue,
        cutoff: Time,
        factor: FloatValue,
    },
}

impl CarbonInput {
    /// A constant input source.
    pub fn constant(rate: FloatValue) -> SOCMResult<Self> {
        if !rate.is_finite() || rate < 0.0 {
            return Err(invalid("rate", format!("input rate must be non-negative, got {rate}")));
        }
        Ok(Self::Constant { rate })
    }

    /// A seasonal input source oscillating around `mean`.
    ///
    /// The amplitude may not exceed the mean, keeping the flux
    /// non-negative over the whole cycle.
    pub fn seasonal(
        mean: FloatValue,
        amplitude: FloatValue,
        period: FloatValue,
        phase: FloatValue,
    ) -> SOCMResult<Self> {
        if !mean.is_finite() || mean < 0.0 {
            return Err(invalid("mean", format!("mean input must be non-negative, got {mean}")));
        }
        if !amplitude.is_finite() || amplitude < 0.0 || amplitude > mean {
            return Err(invalid(
                "amplitude",
                format!("amplitude must lie in [0, mean], got {amplitude} for mean {mean}"),
            ));
        }
        if !period.is_finite() || period <= 0.0 {
            return Err(invalid("period", format!("period must be positive, got {period}")));
        }
        if !phase.is_finite() {
            return Err(invalid("phase", format!("phase must be finite, got {phase}")));
        }
        Ok(Self::Seasonal {
            mean,
            amplitude,
            period,
            phase,
        })
    }

    /// A step change in the long-run input rate at `cutoff`.
    pub fn step_shift(baseline: FloatValue, cutoff: Time, factor: FloatValue) -> SOCMResult<Self> {
        if !baseline.is_finite() || baseline < 0.0 {
            return Err(invalid(
                "baseline",
                format!("baseline input must be non-negative, got {baseline}"),
            ));
        }
        if !factor.is_finite() || factor < 0.0 {
            return Err(invalid(
                "factor",
                format!("shift factor must be non-negative, got {factor}"),
            ));
        }
        if !cutoff.is_finite() {
            return Err(invalid("cutoff", format!("cutoff time must be finite, got {cutoff}")));
        }
        Ok(Self::StepShift {
            baseline,
            cutoff,
            factor,
        })
    }

    /// The input flux at time `t`.
    pub fn rate_at(&self, t: Time) -> FloatValue {
        match *self {
            Self::Constant { rate } => rate,
            Self::Seasonal {
                mean,
                amplitude,
                period,
                phase,
            } => mean + amplitude * (2.0 * PI * (t - phase) / period).sin(),
            Self::Zero => 0.0,
            Self::StepShift {
                baseline,
                cutoff,
                factor,
            } => {
                if t < cutoff {
                    baseline
                } else {
                    baseline * factor
                }
            }
        }
    }

    /// The rate used for steady-state seeding: the constant rate, the
    /// seasonal mean, or the pre-shift baseline.
    pub fn reference_rate(&self) -> FloatValue {
        match *self {
            Self::Constant { rate } => rate,
            Self::Seasonal { mean, .. } => mean,
            Self::Zero => 0.0,
            Self::StepShift { baseline, .. } => baseline,
        }
    }

    /// The rate of a time-invariant source, `None` for time-varying ones.
    ///
    /// The one-pool mass-balance self-check only applies under a nonzero
    /// static input.
    pub fn static_rate(&self) -> Option<FloatValue> {
        match *self {
            Self::Constant { rate } => Some(rate),
            Self::Zero => Some(0.0),
            Self::Seasonal { .. } | Self::StepShift { .. } => None,
        }
    }
}

fn invalid(name: &str, reason: String) -> SOCMError {
    SOCMError::InvalidParameter {
        name: name.to_string(),
        reason,
    }
}
