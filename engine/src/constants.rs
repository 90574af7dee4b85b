//! Game constant tables: copies per unit, units per tier, drop rates, xp curve
//!
//! The built-in table is a `static` and is never mutated. Custom tables go
//! through [`GameConstants::new`], which rejects malformed data up front so
//! the calculators can index without further checks.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::model::{Level, Tier, MAX_LEVEL, TIER_COUNT};

/// Tolerance for a drop-rate row summing to 1.
const ROW_SUM_EPSILON: f64 = 1e-6;

/// Built-in table used by [`GameConstants::standard`].
static STANDARD: GameConstants = GameConstants {
    copies_per_unit: [30, 25, 18, 10, 9],
    units_per_tier: [15, 13, 12, 13, 8],
    drop_rates: [
        [1.00, 0.00, 0.00, 0.00, 0.00],
        [1.00, 0.00, 0.00, 0.00, 0.00],
        [0.75, 0.25, 0.00, 0.00, 0.00],
        [0.55, 0.30, 0.15, 0.00, 0.00],
        [0.45, 0.33, 0.20, 0.02, 0.00],
        [0.30, 0.40, 0.25, 0.05, 0.00],
        [0.19, 0.30, 0.40, 0.10, 0.01],
        [0.17, 0.24, 0.32, 0.24, 0.03],
        [0.15, 0.18, 0.25, 0.30, 0.12],
        [0.05, 0.10, 0.20, 0.40, 0.25],
    ],
    xp_to_next_level: [0, 2, 6, 10, 20, 36, 48, 76, 84, 0],
};

/// Plain serializable mirror of [`GameConstants`].
///
/// Column `i` of each per-tier array is tier `i + 1`; row `j` of the per-level
/// arrays is level `j + 1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstantsTable {
    pub copies_per_unit: [u32; TIER_COUNT],
    pub units_per_tier: [u32; TIER_COUNT],
    pub drop_rates: [[f64; TIER_COUNT]; MAX_LEVEL as usize],
    pub xp_to_next_level: [u32; MAX_LEVEL as usize],
}

/// Validated, read-only game constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ConstantsTable", into = "ConstantsTable")]
pub struct GameConstants {
    copies_per_unit: [u32; TIER_COUNT],
    units_per_tier: [u32; TIER_COUNT],
    drop_rates: [[f64; TIER_COUNT]; MAX_LEVEL as usize],
    xp_to_next_level: [u32; MAX_LEVEL as usize],
}

impl GameConstants {
    /// The built-in table.
    pub fn standard() -> &'static GameConstants {
        &STANDARD
    }

    /// Build a custom table after validating it.
    pub fn new(table: ConstantsTable) -> Result<Self, EngineError> {
        for (i, (&copies, &units)) in table
            .copies_per_unit
            .iter()
            .zip(table.units_per_tier.iter())
            .enumerate()
        {
            if copies == 0 || units == 0 {
                return Err(EngineError::InvalidConstants(format!(
                    "tier {} must have positive copies and units (got {} copies, {} units)",
                    i + 1,
                    copies,
                    units
                )));
            }
        }

        for (i, row) in table.drop_rates.iter().enumerate() {
            if let Some(&p) = row.iter().find(|p| !(0.0..=1.0).contains(*p)) {
                return Err(EngineError::InvalidConstants(format!(
                    "level {} has drop rate {} outside [0, 1]",
                    i + 1,
                    p
                )));
            }
            let sum: f64 = row.iter().sum();
            if (sum - 1.0).abs() > ROW_SUM_EPSILON {
                return Err(EngineError::InvalidConstants(format!(
                    "level {} drop rates sum to {} (expected 1)",
                    i + 1,
                    sum
                )));
            }
        }

        let last_xp = table.xp_to_next_level[MAX_LEVEL as usize - 1];
        if last_xp != 0 {
            return Err(EngineError::InvalidConstants(format!(
                "max level must need 0 xp to advance (got {})",
                last_xp
            )));
        }

        Ok(GameConstants {
            copies_per_unit: table.copies_per_unit,
            units_per_tier: table.units_per_tier,
            drop_rates: table.drop_rates,
            xp_to_next_level: table.xp_to_next_level,
        })
    }

    /// Copies printed of a single unit in `tier`.
    pub fn copies_per_unit(&self, tier: Tier) -> u32 {
        self.copies_per_unit[tier.index()]
    }

    /// Distinct units sharing `tier`.
    pub fn units_per_tier(&self, tier: Tier) -> u32 {
        self.units_per_tier[tier.index()]
    }

    /// Full shared pool of `tier` before anything is removed.
    pub fn tier_pool_size(&self, tier: Tier) -> u32 {
        self.copies_per_unit(tier) * self.units_per_tier(tier)
    }

    /// Probability that one draw at `level` lands in `tier`.
    pub fn drop_rate(&self, level: Level, tier: Tier) -> f64 {
        self.drop_rates[level.index()][tier.index()]
    }

    /// Whole drop-rate row for `level`, indexed by tier.
    pub fn drop_rates(&self, level: Level) -> &[f64; TIER_COUNT] {
        &self.drop_rates[level.index()]
    }

    /// Experience needed to go from `level` to the next one (0 at max).
    pub fn xp_to_next_level(&self, level: Level) -> u32 {
        self.xp_to_next_level[level.index()]
    }

    /// Total copies in each tier's pool, in tier order.
    pub fn total_copies_per_tier(&self) -> Vec<(Tier, u32)> {
        Tier::all().map(|tier| (tier, self.tier_pool_size(tier))).collect()
    }

    /// Copy of the raw tables.
    pub fn to_table(&self) -> ConstantsTable {
        ConstantsTable::from(self.clone())
    }
}

impl Default for GameConstants {
    fn default() -> Self {
        STANDARD.clone()
    }
}

impl TryFrom<ConstantsTable> for GameConstants {
    type Error = EngineError;

    fn try_from(table: ConstantsTable) -> Result<Self, Self::Error> {
        GameConstants::new(table)
    }
}

impl From<GameConstants> for ConstantsTable {
    fn from(constants: GameConstants) -> Self {
        ConstantsTable {
            copies_per_unit: constants.copies_per_unit,
            units_per_tier: constants.units_per_tier,
            drop_rates: constants.drop_rates,
            xp_to_next_level: constants.xp_to_next_level,
        }
    }
}
