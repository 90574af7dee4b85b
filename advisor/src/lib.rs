//! shopodds Advisor - Roll-or-level decisions and reference tables
//!
//! This crate turns engine results into the answers a player asks for: what
//! two-star and three-star cost right now, whether buying the next level first
//! is cheaper, whether the gold on hand covers it, and the reference tables
//! a front-end shows next to them. It holds no state of its own.

use shopodds_engine::expectation::expected_currency;
use shopodds_engine::model::TWO_STAR_COPIES;
use shopodds_engine::simulator::{simulate, ProbabilityCurve, SimConfig};
use shopodds_engine::upgrade::upgrade_cost;
use shopodds_engine::{AcquisitionState, Cost, EngineError, GameConstants, Level, Tier};
use tracing::debug;

/// Everything the player knows about their current spot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Situation {
    pub level: Level,
    pub tier: Tier,
    /// Copies of the target unit held
    pub owned: u32,
    /// Copies of the target unit held by others
    pub outside: u32,
    /// Copies of other same-tier units held by others
    pub outside_other: u32,
    /// Experience still needed for the next level
    pub xp_remaining: i64,
    /// Gold on hand
    pub gold: u32,
}

impl Situation {
    /// Situation with `xp_remaining` taken from the constants table.
    pub fn at_level_start(
        constants: &GameConstants,
        level: Level,
        tier: Tier,
        owned: u32,
        outside: u32,
        outside_other: u32,
        gold: u32,
    ) -> Self {
        Situation {
            level,
            tier,
            owned,
            outside,
            outside_other,
            xp_remaining: constants.xp_to_next_level(level) as i64,
            gold,
        }
    }

    fn state(&self) -> AcquisitionState {
        AcquisitionState::three_star(self.owned, self.outside, self.outside_other)
    }
}

/// What to do with the next gold spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Roll at the current level
    StayAndRoll,
    /// Buy the next level, then roll
    LevelUp,
}

/// Costs and recommendation for one [`Situation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Advice {
    /// Expected cost to two-star at the current level
    pub two_star: Cost,
    /// Expected cost to three-star at the current level
    pub three_star: Cost,
    /// Gold to buy the remaining experience
    pub upgrade_cost: u32,
    /// Expected cost to three-star one level up (unreachable at max level)
    pub next_level_three_star: Cost,
    /// `upgrade_cost + next_level_three_star`
    pub total_if_upgrade: Cost,
    pub decision: Decision,
    /// Gold on hand covers the cheaper of the two plans
    pub affordable: bool,
}

/// Compare rolling now against levelling first.
///
/// Rolling wins only when it is strictly cheaper; ties and the case where both
/// plans are unreachable recommend levelling.
pub fn advise(constants: &GameConstants, situation: &Situation) -> Advice {
    let state = situation.state();
    let two_star = expected_currency(
        constants,
        situation.level,
        situation.tier,
        &state.with_target(TWO_STAR_COPIES),
    );
    let three_star = expected_currency(constants, situation.level, situation.tier, &state);

    let upgrade = upgrade_cost(situation.xp_remaining);
    let next_level_three_star = match situation.level.next() {
        Some(next) => expected_currency(constants, next, situation.tier, &state),
        None => Cost::Unreachable,
    };
    let total_if_upgrade = Cost::Finite(upgrade) + next_level_three_star;

    let decision = if three_star < total_if_upgrade {
        Decision::StayAndRoll
    } else {
        Decision::LevelUp
    };
    let affordable = three_star.min(total_if_upgrade).affordable_with(situation.gold);

    debug!(
        level = situation.level.value(),
        tier = situation.tier.value(),
        %three_star,
        %total_if_upgrade,
        ?decision,
        affordable,
        "advice"
    );

    Advice {
        two_star,
        three_star,
        upgrade_cost: upgrade,
        next_level_three_star,
        total_if_upgrade,
        decision,
        affordable,
    }
}

/// Three-star and two-star curves for the same spot.
#[derive(Debug, Clone, PartialEq)]
pub struct StarCurves {
    pub three_star: ProbabilityCurve,
    pub two_star: ProbabilityCurve,
}

/// Simulate both star targets with one config.
pub fn probability_curves(
    constants: &GameConstants,
    situation: &Situation,
    config: &SimConfig,
) -> Result<StarCurves, EngineError> {
    let state = situation.state();
    let three_star = simulate(constants, situation.level, situation.tier, &state, config)?;
    let two_star = simulate(
        constants,
        situation.level,
        situation.tier,
        &state.with_target(TWO_STAR_COPIES),
        config,
    )?;
    Ok(StarCurves { three_star, two_star })
}

/// One row of the drop-rate reference table.
#[derive(Debug, Clone, PartialEq)]
pub struct TierRow {
    pub tier: Tier,
    /// Copies in the whole tier pool
    pub total_copies: u32,
    /// Drop chance per level, as a percentage, index 0 = level 1
    pub drop_percent: Vec<f64>,
}

/// Drop-rate table: one row per tier, one column per level.
pub fn reference_table(constants: &GameConstants) -> Vec<TierRow> {
    constants
        .total_copies_per_tier()
        .into_iter()
        .map(|(tier, total_copies)| TierRow {
            tier,
            total_copies,
            drop_percent: Level::all()
                .map(|level| constants.drop_rate(level, tier) * 100.0)
                .collect(),
        })
        .collect()
}

/// One row of the level table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelRow {
    pub level: Level,
    pub xp_to_next: u32,
    /// Gold to buy `xp_to_next` from scratch
    pub upgrade_cost: u32,
}

/// Experience and gold needed to leave each level.
pub fn level_table(constants: &GameConstants) -> Vec<LevelRow> {
    Level::all()
        .map(|level| {
            let xp_to_next = constants.xp_to_next_level(level);
            LevelRow {
                level,
                xp_to_next,
                upgrade_cost: upgrade_cost(xp_to_next as i64),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn situation(level: u8, tier: u8, owned: u32, outside: u32, other: u32) -> Situation {
        Situation {
            level: Level::new(level).unwrap(),
            tier: Tier::new(tier).unwrap(),
            owned,
            outside,
            outside_other: other,
            xp_remaining: 0,
            gold: 0,
        }
    }

    #[test]
    fn test_advice_prefers_levelling_for_unoffered_tier() {
        // Level 4 never offers tier 4; level 5 does.
        let s = Situation { xp_remaining: 20, gold: 1000, ..situation(4, 4, 0, 0, 0) };
        let advice = advise(GameConstants::standard(), &s);
        assert_eq!(advice.three_star, Cost::Unreachable);
        assert_eq!(advice.upgrade_cost, 20);
        assert!(advice.next_level_three_star.is_reachable());
        assert_eq!(advice.total_if_upgrade, Cost::Finite(20) + advice.next_level_three_star);
        assert_eq!(advice.decision, Decision::LevelUp);
    }

    #[test]
    fn test_advice_prefers_rolling_when_levelling_dilutes_tier() {
        // Tier 1 odds drop from 100% at level 2 to 75% at level 3.
        let s = Situation { xp_remaining: 2, gold: 100, ..situation(2, 1, 6, 0, 0) };
        let advice = advise(GameConstants::standard(), &s);
        assert_eq!(advice.decision, Decision::StayAndRoll);
        assert!(advice.three_star < advice.total_if_upgrade);
        assert!(advice.affordable);
        assert_eq!(advice.two_star, Cost::Finite(0));
    }

    #[test]
    fn test_max_level_cannot_upgrade() {
        let s = situation(10, 5, 0, 0, 0);
        let advice = advise(GameConstants::standard(), &s);
        assert_eq!(advice.next_level_three_star, Cost::Unreachable);
        assert_eq!(advice.total_if_upgrade, Cost::Unreachable);
        assert!(advice.three_star.is_reachable());
        assert_eq!(advice.decision, Decision::StayAndRoll);
    }

    #[test]
    fn test_affordability_uses_cheaper_plan() {
        let constants = GameConstants::standard();
        let base = Situation { xp_remaining: 76, ..situation(8, 4, 7, 0, 42) };
        let advice = advise(constants, &base);
        assert_eq!(advice.three_star, Cost::Finite(112));
        let cheapest = advice.three_star.min(advice.total_if_upgrade).finite().unwrap();

        let rich = advise(constants, &Situation { gold: cheapest, ..base });
        assert!(rich.affordable);
        let poor = advise(constants, &Situation { gold: cheapest - 1, ..base });
        assert!(!poor.affordable);
    }

    #[test]
    fn test_both_plans_unreachable() {
        let s = Situation { gold: u32::MAX, ..situation(9, 4, 0, 10, 0) };
        let advice = advise(GameConstants::standard(), &s);
        assert_eq!(advice.three_star, Cost::Unreachable);
        assert_eq!(advice.total_if_upgrade, Cost::Unreachable);
        assert_eq!(advice.decision, Decision::LevelUp);
        assert!(!advice.affordable);
    }

    #[test]
    fn test_at_level_start_reads_xp_table() {
        let constants = GameConstants::standard();
        let s = Situation::at_level_start(
            constants,
            Level::new(7).unwrap(),
            Tier::new(3).unwrap(),
            0,
            0,
            0,
            50,
        );
        assert_eq!(s.xp_remaining, 48);
        assert_eq!(advise(constants, &s).upgrade_cost, 48);
    }

    #[test]
    fn test_probability_curves_two_star_dominates() {
        let s = situation(7, 3, 2, 1, 10);
        let curves =
            probability_curves(GameConstants::standard(), &s, &SimConfig::seeded(31)).unwrap();
        assert_eq!(curves.three_star.len(), curves.two_star.len());
        // Same seed, same draws: reaching 9 copies implies having reached 3.
        for (three, two) in curves.three_star.iter().zip(curves.two_star.iter()) {
            assert_eq!(three.currency, two.currency);
            assert!(two.probability_percent >= three.probability_percent);
        }
    }

    #[test]
    fn test_reference_table_shape() {
        let rows = reference_table(GameConstants::standard());
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0].total_copies, 450);
        assert_eq!(rows[4].total_copies, 72);
        assert_eq!(rows[0].drop_percent.len(), 10);
        assert!((rows[0].drop_percent[0] - 100.0).abs() < 1e-9);
        assert!((rows[4].drop_percent[9] - 25.0).abs() < 1e-9);
        for level_idx in 0..10 {
            let column: f64 = rows.iter().map(|r| r.drop_percent[level_idx]).sum();
            assert!((column - 100.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_level_table() {
        let rows = level_table(GameConstants::standard());
        assert_eq!(rows.len(), 10);
        assert_eq!(rows[1].xp_to_next, 2);
        assert_eq!(rows[1].upgrade_cost, 4);
        assert_eq!(rows[7].upgrade_cost, 76);
        assert_eq!(rows[9].upgrade_cost, 0);
    }
}
