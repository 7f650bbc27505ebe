//! Validated model parameter structures
//!
//! Parameters are validated once, at construction, rather than on every
//! lookup inside a derivative evaluation. A [`MultiPoolParameters`] value
//! therefore guarantees:
//!
//! - every turnover time is finite and strictly positive
//! - every transfer fraction lies in [0, 1], connects two distinct pools
//!   and appears at most once per pool pair
//! - the fractions leaving any one pool sum to at most 1 (the remainder
//!   is respired)
//! - the allocation vector is non-negative and sums to 1
//!
//! Pools are conventionally ordered fastest to slowest turnover so that the
//! matrix rows/columns read in the same order everywhere; this is a naming
//! convention, not an enforced constraint.

use crate::errors::{SOCMError, SOCMResult};
use crate::trajectory::FloatValue;
use is_close::is_close;
use serde::{Deserialize, Serialize};

/// A single carbon pool: a name and a turnover time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolDefinition {
    /// Pool label, used for trajectory columns and diagnostics.
    pub name: String,
    /// Expected residence time of carbon in the pool.
    /// unit: time (yr in the provided parameterizations)
    pub turnover_time: FloatValue,
}

impl PoolDefinition {
    pub fn new(name: impl Into<String>, turnover_time: FloatValue) -> Self {
        Self {
            name: name.into(),
            turnover_time,
        }
    }

    /// Decay rate, the reciprocal turnover time.
    pub fn decay_rate(&self) -> FloatValue {
        1.0 / self.turnover_time
    }
}

/// Fraction of the carbon decaying out of pool `from` that is redirected
/// into pool `to` instead of being respired.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransferFraction {
    pub from: usize,
    pub to: usize,
    pub fraction: FloatValue,
}

impl TransferFraction {
    pub fn new(from: usize, to: usize, fraction: FloatValue) -> Self {
        Self { from, to, fraction }
    }
}

/// Validated parameter set for an n-pool model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiPoolParameters {
    pools: Vec<PoolDefinition>,
    transfers: Vec<TransferFraction>,
    allocation: Vec<FloatValue>,
}

impl MultiPoolParameters {
    /// Validate and construct an n-pool parameter set.
    pub fn new(
        pools: Vec<PoolDefinition>,
        transfers: Vec<TransferFraction>,
        allocation: Vec<FloatValue>,
    ) -> SOCMResult<Self> {
        if pools.is_empty() {
            return Err(SOCMError::InvalidParameter {
                name: "pools".to_string(),
                reason: "at least one pool is required".to_string(),
            });
        }
        let num_pools = pools.len();

        for pool in &pools {
            if !pool.turnover_time.is_finite() || pool.turnover_time <= 0.0 {
                return Err(SOCMError::InvalidParameter {
                    name: format!("pools.{}.turnover_time", pool.name),
                    reason: format!(
                        "turnover time must be finite and positive, got {}",
                        pool.turnover_time
                    ),
                });
            }
        }

        for (index, transfer) in transfers.iter().enumerate() {
            let name = || format!("transfers[{index}]");
            if transfer.from >= num_pools || transfer.to >= num_pools {
                return Err(SOCMError::InvalidParameter {
                    name: name(),
                    reason: format!(
                        "pool indices {}->{} out of range for {} pools",
                        transfer.from, transfer.to, num_pools
                    ),
                });
            }
            if transfer.from == transfer.to {
                return Err(SOCMError::InvalidParameter {
                    name: name(),
                    reason: format!("pool {} cannot transfer to itself", transfer.from),
                });
            }
            if !transfer.fraction.is_finite() || !(0.0..=1.0).contains(&transfer.fraction) {
                return Err(SOCMError::InvalidParameter {
                    name: name(),
                    reason: format!("fraction must lie in [0, 1], got {}", transfer.fraction),
                });
            }
            let duplicated = transfers[..index]
                .iter()
                .any(|other| other.from == transfer.from && other.to == transfer.to);
            if duplicated {
                return Err(SOCMError::InvalidParameter {
                    name: name(),
                    reason: format!(
                        "duplicate transfer fraction for pool pair {}->{}",
                        transfer.from, transfer.to
                    ),
                });
            }
        }

        for from in 0..num_pools {
            let outgoing: FloatValue = transfers
                .iter()
                .filter(|t| t.from == from)
                .map(|t| t.fraction)
                .sum();
            if outgoing > 1.0 + 1e-12 {
                return Err(SOCMError::InvalidParameter {
                    name: format!("transfers from pool '{}'", pools[from].name),
                    reason: format!("outgoing fractions sum to {outgoing}, exceeding 1"),
                });
            }
        }

        if allocation.len() != num_pools {
            return Err(SOCMError::InvalidParameter {
                name: "allocation".to_string(),
                reason: format!(
                    "allocation has {} entries for {} pools",
                    allocation.len(),
                    num_pools
                ),
            });
        }
        for (index, &entry) in allocation.iter().enumerate() {
            if !entry.is_finite() || entry < 0.0 {
                return Err(SOCMError::InvalidParameter {
                    name: format!("allocation[{index}]"),
                    reason: format!("allocation fractions must be non-negative, got {entry}"),
                });
            }
        }
        let allocation_sum: FloatValue = allocation.iter().sum();
        if !is_close!(allocation_sum, 1.0, abs_tol = 1e-9) {
            return Err(SOCMError::InvalidParameter {
                name: "allocation".to_string(),
                reason: format!("allocation fractions must sum to 1, got {allocation_sum}"),
            });
        }

        Ok(Self {
            pools,
            transfers,
            allocation,
        })
    }

    pub fn num_pools(&self) -> usize {
        self.pools.len()
    }

    pub fn pools(&self) -> &[PoolDefinition] {
        &self.pools
    }

    pub fn transfers(&self) -> &[TransferFraction] {
        &self.transfers
    }

    pub fn allocation(&self) -> &[FloatValue] {
        &self.allocation
    }

    /// Pool labels in matrix order.
    pub fn pool_names(&self) -> Vec<&str> {
        self.pools.iter().map(|pool| pool.name.as_str()).collect()
    }

    /// Fraction of pool `from`'s decay respired rather than transferred.
    pub fn respired_fraction(&self, from: usize) -> FloatValue {
        let outgoing: FloatValue = self
            .transfers
            .iter()
            .filter(|t| t.from == from)
            .map(|t| t.fraction)
            .sum();
        1.0 - outgoing
    }
}

/// Validated parameter set for the reduced one-pool model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OnePoolParameters {
    /// Turnover time of the single aggregate pool.
    /// unit: time (yr in the provided parameterizations)
    pub turnover_time: FloatValue,
}

impl OnePoolParameters {
    pub fn new(turnover_time: FloatValue) -> SOCMResult<Self> {
        if !turnover_time.is_finite() || turnover_time <= 0.0 {
            return Err(SOCMError::InvalidParameter {
                name: "turnover_time".to_string(),
                reason: format!(
                    "turnover time must be finite and positive, got {turnover_time}"
                ),
            });
        }
        Ok(Self { turnover_time })
    }

    /// Decay rate, the reciprocal turnover time.
    pub fn decay_rate(&self) -> FloatValue {
        1.0 / self.turnover_time
    }
}
