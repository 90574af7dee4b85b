//! Closed-form expected currency to reach a copy target
//!
//! Each missing copy is a geometric waiting time. After a copy is taken, both
//! the unit's remaining copies and the shared tier pool shrink by one, so the
//! next waiting time is drawn with updated parameters:
//!
//!   p_k = rate(level, tier) * remaining_k / pool_k
//!   E[draws] = Σ_k 1 / p_k
//!
//! Draws are bought in rolls of `DRAWS_PER_ROLL` for `CURRENCY_PER_ROLL`, and
//! a partial roll is paid in full.

use tracing::{debug, trace};

use crate::constants::GameConstants;
use crate::model::{AcquisitionState, Cost, Level, Tier};

/// Draw attempts granted by one roll.
pub const DRAWS_PER_ROLL: u32 = 5;

/// Currency paid per roll.
pub const CURRENCY_PER_ROLL: u32 = 2;

/// Probability that a single draw yields one specific unit.
///
/// `tier_rate` is the chance the draw lands in the unit's tier; within the
/// tier every remaining copy is equally likely. A pool of 0 gives 0. The
/// result is clamped to [0, 1].
pub fn hit_probability(tier_rate: f64, remaining: u32, pool: u32) -> f64 {
    if pool == 0 {
        return 0.0;
    }
    (tier_rate * (remaining as f64 / pool as f64)).clamp(0.0, 1.0)
}

/// Expected draws until the next copy, or `None` if it can never come.
pub fn expected_draws_to_next(tier_rate: f64, remaining: u32, pool: u32) -> Option<f64> {
    if remaining == 0 {
        return None;
    }
    let p = hit_probability(tier_rate, remaining, pool);
    if p > 0.0 {
        Some(1.0 / p)
    } else {
        None
    }
}

/// Convert an expected draw count into whole currency units.
pub fn draws_to_currency(draws: f64) -> u32 {
    let rolls = draws / DRAWS_PER_ROLL as f64;
    (rolls * CURRENCY_PER_ROLL as f64).ceil() as u32
}

/// Expected number of draws to reach the target, `None` when unreachable.
///
/// Returns `Some(0.0)` when the target is already met.
pub fn expected_draws(
    constants: &GameConstants,
    level: Level,
    tier: Tier,
    state: &AcquisitionState,
) -> Option<f64> {
    if state.is_satisfied() {
        return Some(0.0);
    }

    let copies = constants.copies_per_unit(tier);
    let mut remaining = copies
        .saturating_sub(state.owned)
        .saturating_sub(state.outside);
    let needed = state.needed();
    if remaining < needed {
        debug!(
            remaining,
            needed, "not enough copies left in the pool to reach the target"
        );
        return None;
    }

    let mut pool = constants
        .tier_pool_size(tier)
        .saturating_sub(state.outside)
        .saturating_sub(state.outside_other)
        .saturating_sub(state.owned);
    let tier_rate = constants.drop_rate(level, tier);

    let mut total = 0.0_f64;
    for step in 0..needed {
        let draws = expected_draws_to_next(tier_rate, remaining, pool)?;
        trace!(step, remaining, pool, draws, "expected draws for next copy");
        total += draws;
        remaining -= 1;
        pool = pool.saturating_sub(1);
    }

    Some(total)
}

/// Expected currency to reach `state.target_copies`, or `Cost::Unreachable`.
pub fn expected_currency(
    constants: &GameConstants,
    level: Level,
    tier: Tier,
    state: &AcquisitionState,
) -> Cost {
    let cost = match expected_draws(constants, level, tier, state) {
        Some(draws) => Cost::Finite(draws_to_currency(draws)),
        None => Cost::Unreachable,
    };
    debug!(
        level = level.value(),
        tier = tier.value(),
        owned = state.owned,
        outside = state.outside,
        outside_other = state.outside_other,
        target = state.target_copies,
        %cost,
        "expected currency"
    );
    cost
}
