//! Core value types for the shop model
//!
//! Tiers and levels are validated on construction so that every table lookup
//! downstream is infallible. Acquisition state is plain data built fresh for
//! each calculation; nothing here carries state between calls.

use std::fmt;
use std::ops::Add;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Number of cost tiers (1-5).
pub const TIER_COUNT: usize = 5;

/// Highest player level. Levels run 1..=MAX_LEVEL.
pub const MAX_LEVEL: u8 = 10;

/// Copies needed for a two-star unit.
pub const TWO_STAR_COPIES: u32 = 3;

/// Copies needed for a three-star unit.
pub const THREE_STAR_COPIES: u32 = 9;

/// A unit's cost tier (1-5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Tier(u8);

impl Tier {
    /// Create a tier, rejecting anything outside 1-5.
    pub fn new(value: u8) -> Result<Self, EngineError> {
        if (1..=TIER_COUNT as u8).contains(&value) {
            Ok(Tier(value))
        } else {
            Err(EngineError::InvalidTier(value))
        }
    }

    /// Get the raw tier value (1-5)
    pub fn value(self) -> u8 {
        self.0
    }

    /// Zero-based column index into per-tier tables.
    pub fn index(self) -> usize {
        (self.0 - 1) as usize
    }

    /// All tiers in ascending order.
    pub fn all() -> impl Iterator<Item = Tier> {
        (1..=TIER_COUNT as u8).map(Tier)
    }
}

impl TryFrom<u8> for Tier {
    type Error = EngineError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Tier::new(value)
    }
}

impl From<Tier> for u8 {
    fn from(tier: Tier) -> u8 {
        tier.0
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A player level (1-10).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Level(u8);

impl Level {
    /// Create a level, rejecting anything outside 1-10.
    pub fn new(value: u8) -> Result<Self, EngineError> {
        if (1..=MAX_LEVEL).contains(&value) {
            Ok(Level(value))
        } else {
            Err(EngineError::InvalidLevel(value))
        }
    }

    /// Get the raw level value (1-10)
    pub fn value(self) -> u8 {
        self.0
    }

    /// Zero-based row index into per-level tables.
    pub fn index(self) -> usize {
        (self.0 - 1) as usize
    }

    /// The level above this one, or `None` at the max level.
    pub fn next(self) -> Option<Level> {
        Level::new(self.0 + 1).ok()
    }

    /// Check if this is the max level
    pub fn is_max(self) -> bool {
        self.0 == MAX_LEVEL
    }

    /// All levels in ascending order.
    pub fn all() -> impl Iterator<Item = Level> {
        (1..=MAX_LEVEL).map(Level)
    }
}

impl TryFrom<u8> for Level {
    type Error = EngineError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Level::new(value)
    }
}

impl From<Level> for u8 {
    fn from(level: Level) -> u8 {
        level.0
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Currency cost of reaching a target.
///
/// `Unreachable` orders after every finite amount, so `min`/`<` comparisons
/// between alternatives behave like comparisons against positive infinity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Cost {
    /// A whole number of currency units
    Finite(u32),
    /// Not enough drawable copies remain to ever reach the target
    Unreachable,
}

impl Cost {
    pub fn is_reachable(self) -> bool {
        matches!(self, Cost::Finite(_))
    }

    /// The finite amount, or `None` when unreachable.
    pub fn finite(self) -> Option<u32> {
        match self {
            Cost::Finite(amount) => Some(amount),
            Cost::Unreachable => None,
        }
    }

    /// True when `budget` covers this cost.
    pub fn affordable_with(self, budget: u32) -> bool {
        match self {
            Cost::Finite(amount) => budget >= amount,
            Cost::Unreachable => false,
        }
    }
}

impl From<u32> for Cost {
    fn from(amount: u32) -> Self {
        Cost::Finite(amount)
    }
}

impl Add for Cost {
    type Output = Cost;

    fn add(self, rhs: Cost) -> Cost {
        match (self, rhs) {
            (Cost::Finite(a), Cost::Finite(b)) => Cost::Finite(a.saturating_add(b)),
            _ => Cost::Unreachable,
        }
    }
}

impl fmt::Display for Cost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cost::Finite(amount) => write!(f, "{}", amount),
            Cost::Unreachable => write!(f, "unreachable"),
        }
    }
}

/// Per-call acquisition state for one target unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AcquisitionState {
    /// Copies of the target unit already held
    pub owned: u32,
    /// Copies of the target unit held elsewhere (out of the pool)
    pub outside: u32,
    /// Copies of other same-tier units out of the pool
    pub outside_other: u32,
    /// Copies required (3 for two-star, 9 for three-star)
    pub target_copies: u32,
}

impl AcquisitionState {
    pub fn new(owned: u32, outside: u32, outside_other: u32, target_copies: u32) -> Self {
        AcquisitionState { owned, outside, outside_other, target_copies }
    }

    /// State targeting a two-star unit (3 copies).
    pub fn two_star(owned: u32, outside: u32, outside_other: u32) -> Self {
        Self::new(owned, outside, outside_other, TWO_STAR_COPIES)
    }

    /// State targeting a three-star unit (9 copies).
    pub fn three_star(owned: u32, outside: u32, outside_other: u32) -> Self {
        Self::new(owned, outside, outside_other, THREE_STAR_COPIES)
    }

    /// Same counts, different target.
    pub fn with_target(self, target_copies: u32) -> Self {
        AcquisitionState { target_copies, ..self }
    }

    pub fn is_satisfied(&self) -> bool {
        self.owned >= self.target_copies
    }

    /// Copies still missing from the target.
    pub fn needed(&self) -> u32 {
        self.target_copies.saturating_sub(self.owned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_bounds() {
        assert!(Tier::new(1).is_ok());
        assert!(Tier::new(5).is_ok());
        assert_eq!(Tier::new(0), Err(EngineError::InvalidTier(0)));
        assert_eq!(Tier::new(6), Err(EngineError::InvalidTier(6)));
        assert_eq!(Tier::new(3).unwrap().index(), 2);
        assert_eq!(Tier::all().count(), TIER_COUNT);
    }

    #[test]
    fn test_level_bounds_and_next() {
        assert_eq!(Level::new(0), Err(EngineError::InvalidLevel(0)));
        assert_eq!(Level::new(11), Err(EngineError::InvalidLevel(11)));
        let nine = Level::new(9).unwrap();
        assert_eq!(nine.next(), Some(Level::new(10).unwrap()));
        assert!(nine.next().unwrap().is_max());
        assert_eq!(Level::new(10).unwrap().next(), None);
    }

    #[test]
    fn test_cost_ordering_treats_unreachable_as_infinite() {
        assert!(Cost::Finite(u32::MAX) < Cost::Unreachable);
        assert!(Cost::Finite(3) < Cost::Finite(4));
        assert_eq!(Cost::Finite(10).min(Cost::Unreachable), Cost::Finite(10));
        assert_eq!(Cost::Unreachable.max(Cost::Finite(0)), Cost::Unreachable);
    }

    #[test]
    fn test_cost_addition() {
        assert_eq!(Cost::Finite(4) + Cost::Finite(19), Cost::Finite(23));
        assert_eq!(Cost::Finite(4) + Cost::Unreachable, Cost::Unreachable);
        assert_eq!(Cost::Finite(u32::MAX) + Cost::Finite(1), Cost::Finite(u32::MAX));
    }

    #[test]
    fn test_cost_display_and_budget() {
        assert_eq!(Cost::Finite(19).to_string(), "19");
        assert_eq!(Cost::Unreachable.to_string(), "unreachable");
        assert!(Cost::Finite(19).affordable_with(19));
        assert!(!Cost::Finite(19).affordable_with(18));
        assert!(!Cost::Unreachable.affordable_with(u32::MAX));
    }

    #[test]
    fn test_acquisition_state_targets() {
        let s = AcquisitionState::three_star(7, 1, 20);
        assert_eq!(s.target_copies, 9);
        assert_eq!(s.needed(), 2);
        assert!(!s.is_satisfied());
        let two = s.with_target(TWO_STAR_COPIES);
        assert!(two.is_satisfied());
        assert_eq!(two.needed(), 0);
        assert_eq!(AcquisitionState::two_star(0, 0, 0).needed(), 3);
    }

    #[test]
    fn test_tier_deserialize_rejects_out_of_range() {
        let ok: Tier = serde_json::from_str("4").unwrap();
        assert_eq!(ok.value(), 4);
        assert!(serde_json::from_str::<Tier>("9").is_err());
        assert!(serde_json::from_str::<Level>("0").is_err());
    }
}
