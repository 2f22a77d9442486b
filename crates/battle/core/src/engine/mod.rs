//! Tick-driven battle scheduler.
//!
//! The [`BattleEngine`] advances a [`Battlefield`] by fixed time steps. Each
//! tick snapshots the living combatants in board scan order, decays their
//! status conditions and then runs one update of their behavior state
//! machine. Attacks resolve inline through the
//! [`AttackResolver`](crate::combat::AttackResolver); nothing is deferred to
//! a later tick.

mod behavior;
mod targeting;

pub use targeting::{in_range, nearest_target};

use tracing::{debug, info};

use crate::env::{BattleEnv, RandomSource};
use crate::state::{Battlefield, Team};

/// Final result of a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum BattleOutcome {
    /// Only this team has combatants left.
    Victory(Team),
    /// Nobody is left, or the time limit was reached.
    Draw,
}

/// Summary returned by [`BattleEngine::run`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleReport {
    pub outcome: BattleOutcome,
    /// Simulated time in milliseconds.
    pub elapsed_ms: u32,
    pub ticks: u32,
    /// The time limit ended the match.
    pub timed_out: bool,
}

/// Drives a battlefield forward in time.
///
/// Borrows the battlefield and the RNG stream for the duration of a run; the
/// environment is read-only.
pub struct BattleEngine<'a> {
    field: &'a mut Battlefield,
    env: BattleEnv<'a>,
    rng: &'a mut dyn RandomSource,
    elapsed_ms: u32,
    ticks: u32,
}

impl<'a> BattleEngine<'a> {
    pub fn new(field: &'a mut Battlefield, env: BattleEnv<'a>, rng: &'a mut dyn RandomSource) -> Self {
        Self {
            field,
            env,
            rng,
            elapsed_ms: 0,
            ticks: 0,
        }
    }

    pub fn field(&self) -> &Battlefield {
        self.field
    }

    pub fn elapsed_ms(&self) -> u32 {
        self.elapsed_ms
    }

    /// Advances the match by `dt_ms`.
    pub fn tick(&mut self, dt_ms: u32) {
        for id in self.field.turn_order() {
            // Earlier combatants in this tick may have killed this one.
            if !self.field.combatant(id).is_some_and(|c| c.is_alive()) {
                continue;
            }
            self.field.tick_status(id, dt_ms);
            self.update(id, dt_ms);
        }
        self.elapsed_ms = self.elapsed_ms.saturating_add(dt_ms);
        self.ticks += 1;
    }

    /// Result of the match so far, `None` while both teams still stand.
    pub fn outcome(&self) -> Option<BattleOutcome> {
        let blue = self.field.living(Team::Blue).next().is_some();
        let red = self.field.living(Team::Red).next().is_some();
        match (blue, red) {
            (true, true) => None,
            (true, false) => Some(BattleOutcome::Victory(Team::Blue)),
            (false, true) => Some(BattleOutcome::Victory(Team::Red)),
            (false, false) => Some(BattleOutcome::Draw),
        }
    }

    /// Ticks by `dt_ms` until one side wins or `max_ms` have elapsed.
    ///
    /// Reaching the limit, or a zero step that could never reach it, ends
    /// the match as a timed-out draw.
    pub fn run(&mut self, dt_ms: u32, max_ms: u32) -> BattleReport {
        debug!(dt_ms, max_ms, "battle started");
        loop {
            if let Some(outcome) = self.outcome() {
                info!(%outcome, elapsed_ms = self.elapsed_ms, "battle finished");
                return self.report(outcome, false);
            }
            if dt_ms == 0 || self.elapsed_ms >= max_ms {
                info!(elapsed_ms = self.elapsed_ms, "battle timed out");
                return self.report(BattleOutcome::Draw, true);
            }
            self.tick(dt_ms);
        }
    }

    fn report(&self, outcome: BattleOutcome, timed_out: bool) -> BattleReport {
        BattleReport {
            outcome,
            elapsed_ms: self.elapsed_ms,
            ticks: self.ticks,
            timed_out,
        }
    }
}
