//! shopodds Engine - Copy-acquisition cost model for a shared-pool unit shop
//!
//! This crate estimates how much currency it takes to collect enough copies of
//! one unit to reach a star target, both as a closed-form expectation and as a
//! Monte Carlo probability curve. The two must agree within sampling noise.
//!
//! The engine is pure: static constant tables in, numbers out. It does no I/O.

pub mod constants;
pub mod error;
pub mod expectation;
pub mod model;
pub mod simulator;
pub mod upgrade;

pub use constants::{ConstantsTable, GameConstants};
pub use error::EngineError;
pub use expectation::{expected_currency, expected_draws};
pub use model::{AcquisitionState, Cost, Level, Tier};
pub use simulator::{simulate, CurvePoint, PoolDepletion, ProbabilityCurve, SimConfig};
pub use upgrade::upgrade_cost;
