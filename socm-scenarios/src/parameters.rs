//! Five-pool soil carbon parameters
//!
//! The concrete parameterization tracks five pools in ascending turnover
//! time:
//!
//! 1. Metabolic litter - easily decomposable plant residue
//! 2. Structural litter - cellulose/lignin-bound residue
//! 3. Fast soil carbon - microbially active organic matter
//! 4. Slow soil carbon - stabilized organic matter
//! 5. Passive soil carbon - mineral-protected, near-inert carbon
//!
//! # Carbon Flows
//!
//! ```text
//!  input --> [METABOLIC]  [STRUCTURAL] <-- input
//!                 |          |     |
//!                 v          v     |
//!               [FAST] <-----+     |
//!                 |  \             v
//!                 v   \--------> [SLOW]
//!            [PASSIVE] <-----------/
//! ```
//!
//! Whatever a pool's decay does not hand to another pool is respired as
//! CO2. External input enters the two litter pools only.

use serde::{Deserialize, Serialize};
use socm_core::errors::SOCMResult;
use socm_core::pools::{MultiPoolParameters, PoolDefinition, TransferFraction};
use socm_core::table::ParameterTable;
use socm_core::trajectory::FloatValue;

/// Matrix index of the metabolic litter pool.
pub const POOL_METABOLIC: usize = 0;
/// Matrix index of the structural litter pool.
pub const POOL_STRUCTURAL: usize = 1;
/// Matrix index of the fast soil pool.
pub const POOL_FAST: usize = 2;
/// Matrix index of the slow soil pool.
pub const POOL_SLOW: usize = 3;
/// Matrix index of the passive soil pool.
pub const POOL_PASSIVE: usize = 4;

/// Pool labels in matrix order.
pub const POOL_NAMES: [&str; 5] = ["metabolic", "structural", "fast", "slow", "passive"];

/// Parameters of the five-pool decomposition model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FivePoolParameters {
    /// Turnover time of the metabolic litter pool
    /// unit: yr
    /// default: 0.5
    pub tau_metabolic: FloatValue,

    /// Turnover time of the structural litter pool
    /// unit: yr
    /// default: 3.0
    pub tau_structural: FloatValue,

    /// Turnover time of the fast soil pool
    /// unit: yr
    /// default: 12.0
    pub tau_fast: FloatValue,

    /// Turnover time of the slow soil pool
    /// unit: yr
    /// default: 50.0
    pub tau_slow: FloatValue,

    /// Turnover time of the passive soil pool
    /// unit: yr
    /// default: 800.0
    pub tau_passive: FloatValue,

    /// Fraction of metabolic decay entering the fast pool
    /// unit: dimensionless
    /// default: 0.45
    pub metabolic_to_fast: FloatValue,

    /// Fraction of structural decay entering the fast pool
    /// unit: dimensionless
    /// default: 0.45
    pub structural_to_fast: FloatValue,

    /// Fraction of structural decay entering the slow pool (lignin-bound)
    /// unit: dimensionless
    /// default: 0.3
    pub structural_to_slow: FloatValue,

    /// Fraction of fast-pool decay entering the slow pool
    /// unit: dimensionless
    /// default: 0.25
    pub fast_to_slow: FloatValue,

    /// Fraction of fast-pool decay entering the passive pool
    /// unit: dimensionless
    /// default: 0.005
    pub fast_to_passive: FloatValue,

    /// Fraction of slow-pool decay entering the passive pool
    /// unit: dimensionless
    /// default: 0.03
    pub slow_to_passive: FloatValue,

    /// Fraction of external input entering the metabolic litter pool
    /// unit: dimensionless
    /// default: 0.6
    pub alloc_metabolic: FloatValue,

    /// Fraction of external input entering the structural litter pool
    /// unit: dimensionless
    /// default: 0.4
    pub alloc_structural: FloatValue,

    /// Long-run average carbon input rate
    /// unit: kg C m-2 yr-1
    /// default: 0.26
    pub input_rate: FloatValue,
}

impl Default for FivePoolParameters {
    fn default() -> Self {
        Self {
            // Turnover times, fastest to slowest
            tau_metabolic: 0.5,
            tau_structural: 3.0,
            tau_fast: 12.0,
            tau_slow: 50.0,
            tau_passive: 800.0,

            // Transfer fractions
            metabolic_to_fast: 0.45,
            structural_to_fast: 0.45,
            structural_to_slow: 0.3,
            fast_to_slow: 0.25,
            fast_to_passive: 0.005,
            slow_to_passive: 0.03,

            // Input allocation (litter pools only)
            alloc_metabolic: 0.6,
            alloc_structural: 0.4,

            // Input
            input_rate: 0.26,
        }
    }
}

impl FivePoolParameters {
    /// Read the parameter set from a flat named table.
    ///
    /// Fails with [`socm_core::errors::SOCMError::MissingParameter`] on the
    /// first absent key.
    pub fn from_table(table: &ParameterTable) -> SOCMResult<Self> {
        Ok(Self {
            tau_metabolic: table.get("tau_metabolic")?,
            tau_structural: table.get("tau_structural")?,
            tau_fast: table.get("tau_fast")?,
            tau_slow: table.get("tau_slow")?,
            tau_passive: table.get("tau_passive")?,
            metabolic_to_fast: table.get("metabolic_to_fast")?,
            structural_to_fast: table.get("structural_to_fast")?,
            structural_to_slow: table.get("structural_to_slow")?,
            fast_to_slow: table.get("fast_to_slow")?,
            fast_to_passive: table.get("fast_to_passive")?,
            slow_to_passive: table.get("slow_to_passive")?,
            alloc_metabolic: table.get("alloc_metabolic")?,
            alloc_structural: table.get("alloc_structural")?,
            input_rate: table.get("input_rate")?,
        })
    }

    /// Write the parameter set into a flat named table.
    pub fn to_table(&self) -> ParameterTable {
        ParameterTable::from_pairs([
            ("tau_metabolic", self.tau_metabolic),
            ("tau_structural", self.tau_structural),
            ("tau_fast", self.tau_fast),
            ("tau_slow", self.tau_slow),
            ("tau_passive", self.tau_passive),
            ("metabolic_to_fast", self.metabolic_to_fast),
            ("structural_to_fast", self.structural_to_fast),
            ("structural_to_slow", self.structural_to_slow),
            ("fast_to_slow", self.fast_to_slow),
            ("fast_to_passive", self.fast_to_passive),
            ("slow_to_passive", self.slow_to_passive),
            ("alloc_metabolic", self.alloc_metabolic),
            ("alloc_structural", self.alloc_structural),
            ("input_rate", self.input_rate),
        ])
    }

    /// Build the validated n-pool parameter set.
    pub fn to_multi_pool(&self) -> SOCMResult<MultiPoolParameters> {
        MultiPoolParameters::new(
            vec![
                PoolDefinition::new(POOL_NAMES[POOL_METABOLIC], self.tau_metabolic),
                PoolDefinition::new(POOL_NAMES[POOL_STRUCTURAL], self.tau_structural),
                PoolDefinition::new(POOL_NAMES[POOL_FAST], self.tau_fast),
                PoolDefinition::new(POOL_NAMES[POOL_SLOW], self.tau_slow),
                PoolDefinition::new(POOL_NAMES[POOL_PASSIVE], self.tau_passive),
            ],
            vec![
                TransferFraction::new(POOL_METABOLIC, POOL_FAST, self.metabolic_to_fast),
                TransferFraction::new(POOL_STRUCTURAL, POOL_FAST, self.structural_to_fast),
                TransferFraction::new(POOL_STRUCTURAL, POOL_SLOW, self.structural_to_slow),
                TransferFraction::new(POOL_FAST, POOL_SLOW, self.fast_to_slow),
                TransferFraction::new(POOL_FAST, POOL_PASSIVE, self.fast_to_passive),
                TransferFraction::new(POOL_SLOW, POOL_PASSIVE, self.slow_to_passive),
            ],
            vec![self.alloc_metabolic, self.alloc_structural, 0.0, 0.0, 0.0],
        )
    }
}
