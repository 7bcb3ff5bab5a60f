//! Turn-based combat.

pub mod engine;
pub mod session;

#[cfg(test)]
mod test_support;

pub use engine::BattleEngine;
pub use session::{Battle, BattleContext, BattlePhase, TickOutcome, REVIVE_HP};
