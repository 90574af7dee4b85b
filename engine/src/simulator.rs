//! Monte Carlo estimate of P(target reached) as a function of currency spent
//!
//! A trial draws one slot at a time from the shrinking tier pool until the
//! target is met, the unit's copies run out, the pool empties, or the draw
//! budget is spent. Every trial gets its own ChaCha8 stream seeded from
//! `base_seed + trial_index`, and uses that same stream at every currency
//! point. Because a bigger budget only extends the same draw sequence, each
//! trial is run once up to the largest budget and the draw at which it hit the
//! target is recorded; a point's success count is the number of trials whose
//! hit fits inside that point's budget. Trials share nothing but `&TrialSetup`,
//! so they are mapped in parallel with Rayon and reduced afterwards.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use tracing::{debug, warn};

use crate::constants::GameConstants;
use crate::error::EngineError;
use crate::expectation::{hit_probability, CURRENCY_PER_ROLL, DRAWS_PER_ROLL};
use crate::model::{AcquisitionState, Level, Tier};

/// How the shared tier pool shrinks while a trial draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PoolDepletion {
    /// Every draw removes one slot from the pool; a miss takes some other
    /// unit. The pool starts at `units * copies - outside - outside_other`.
    #[default]
    EveryDraw,
    /// Only a hit removes a slot, and the pool starts with owned copies
    /// already removed. This is the conditioning the closed form uses.
    OnHit,
}

/// Configuration for one probability curve.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Largest currency amount on the curve (inclusive when on a step)
    pub max_currency: u32,

    /// Spacing between curve points
    pub currency_step: u32,

    /// Independent trials behind every point
    pub trials_per_point: u32,

    /// Random seed for reproducibility (None = random)
    pub seed: Option<u64>,

    /// Pool depletion model
    pub depletion: PoolDepletion,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            max_currency: 100,
            currency_step: 2,
            trials_per_point: 1000,
            seed: None,
            depletion: PoolDepletion::EveryDraw,
        }
    }
}

impl SimConfig {
    /// Default config with a fixed seed
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Default::default()
        }
    }

    /// Config for checking the curve against the closed-form expectation
    pub fn cross_validation(max_currency: u32, seed: u64) -> Self {
        Self {
            max_currency,
            trials_per_point: 5000,
            seed: Some(seed),
            depletion: PoolDepletion::OnHit,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if self.currency_step == 0 {
            return Err(EngineError::InvalidParameter(
                "currency_step must be positive".to_string(),
            ));
        }
        if self.trials_per_point == 0 {
            return Err(EngineError::InvalidParameter(
                "trials_per_point must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Currency values on the curve: 0, step, 2*step, ... up to `max_currency`.
    pub fn currency_points(&self) -> Vec<u32> {
        (0..=self.max_currency)
            .step_by(self.currency_step.max(1) as usize)
            .collect()
    }
}

/// Draw attempts bought by `currency`. Only whole rolls count.
pub fn draw_budget(currency: u32) -> u64 {
    let rolls = (currency / CURRENCY_PER_ROLL) as u64;
    rolls * DRAWS_PER_ROLL as u64
}

/// One point of a probability curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurvePoint {
    pub currency: u32,
    /// Percentage of trials that reached the target, in [0, 100]
    pub probability_percent: f64,
}

/// Probability of reaching the target against currency spent, ascending by currency.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProbabilityCurve {
    pub points: Vec<CurvePoint>,
}

impl ProbabilityCurve {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CurvePoint> {
        self.points.iter()
    }

    /// First currency value whose probability is at least `percent`.
    pub fn crossing(&self, percent: f64) -> Option<u32> {
        self.points
            .iter()
            .find(|p| p.probability_percent >= percent)
            .map(|p| p.currency)
    }

    /// Probability at the last (largest) currency value.
    pub fn final_probability(&self) -> Option<f64> {
        self.points.last().map(|p| p.probability_percent)
    }

    /// Mean currency to reach the target, read as the area above the curve.
    ///
    /// E[X] = Σ step * P(X > point). Only meaningful once the curve's tail is
    /// close to 100%; the part beyond the last point is dropped.
    pub fn mean_currency(&self) -> f64 {
        self.points
            .windows(2)
            .map(|w| {
                let width = (w[1].currency - w[0].currency) as f64;
                width * (1.0 - w[0].probability_percent / 100.0)
            })
            .sum()
    }
}

/// Read-only starting point shared by every trial.
#[derive(Debug, Clone, Copy)]
struct TrialSetup {
    tier_rate: f64,
    owned: u32,
    target: u32,
    remaining: u32,
    pool: u32,
    depletion: PoolDepletion,
}

impl TrialSetup {
    fn new(
        constants: &GameConstants,
        level: Level,
        tier: Tier,
        state: &AcquisitionState,
        depletion: PoolDepletion,
    ) -> Self {
        let remaining = constants
            .copies_per_unit(tier)
            .saturating_sub(state.owned)
            .saturating_sub(state.outside);
        let mut pool = constants
            .tier_pool_size(tier)
            .saturating_sub(state.outside)
            .saturating_sub(state.outside_other);
        if depletion == PoolDepletion::OnHit {
            pool = pool.saturating_sub(state.owned);
        }
        TrialSetup {
            tier_rate: constants.drop_rate(level, tier),
            owned: state.owned,
            target: state.target_copies,
            remaining,
            pool,
            depletion,
        }
    }
}

/// Run one trial for at most `max_draws` draws.
///
/// Returns the number of draws used when the target was reached (0 if it
/// already was), or `None` if the trial stopped short.
fn run_trial<R: Rng>(setup: &TrialSetup, max_draws: u64, rng: &mut R) -> Option<u64> {
    let mut owned = setup.owned;
    let mut remaining = setup.remaining;
    let mut pool = setup.pool;

    if owned >= setup.target {
        return Some(0);
    }

    for draw in 1..=max_draws {
        if pool == 0 || remaining == 0 {
            break;
        }
        let p = hit_probability(setup.tier_rate, remaining, pool);
        if rng.gen::<f64>() < p {
            owned += 1;
            remaining -= 1;
            pool -= 1;
            if owned >= setup.target {
                return Some(draw);
            }
        } else if setup.depletion == PoolDepletion::EveryDraw {
            pool -= 1;
        }
    }

    None
}

/// Simulate the probability curve for reaching `state.target_copies`.
pub fn simulate(
    constants: &GameConstants,
    level: Level,
    tier: Tier,
    state: &AcquisitionState,
    config: &SimConfig,
) -> Result<ProbabilityCurve, EngineError> {
    config.validate()?;

    let setup = TrialSetup::new(constants, level, tier, state, config.depletion);
    if setup.pool == 0 && !state.is_satisfied() {
        warn!(
            level = level.value(),
            tier = tier.value(),
            "tier pool is empty; every point will be 0%"
        );
    }

    let currency_points = config.currency_points();
    let max_draws = currency_points
        .last()
        .map(|&c| draw_budget(c))
        .unwrap_or(0);
    let base_seed = config.seed.unwrap_or_else(rand::random);

    // Map: each trial independently, seeded by its index.
    let mut hits: Vec<u64> = (0..config.trials_per_point)
        .into_par_iter()
        .filter_map(|trial| {
            let mut rng = ChaCha8Rng::seed_from_u64(base_seed.wrapping_add(trial as u64));
            run_trial(&setup, max_draws, &mut rng)
        })
        .collect();
    hits.sort_unstable();

    // Reduce: a trial succeeds at a point if its hit fits in that budget.
    let trials = config.trials_per_point as f64;
    let points: Vec<CurvePoint> = currency_points
        .iter()
        .map(|&currency| {
            let budget = draw_budget(currency);
            let successes = hits.partition_point(|&d| d <= budget);
            CurvePoint {
                currency,
                probability_percent: successes as f64 / trials * 100.0,
            }
        })
        .collect();

    debug!(
        level = level.value(),
        tier = tier.value(),
        owned = state.owned,
        target = state.target_copies,
        points = points.len(),
        trials = config.trials_per_point,
        reached = hits.len(),
        "simulated probability curve"
    );

    Ok(ProbabilityCurve { points })
}
