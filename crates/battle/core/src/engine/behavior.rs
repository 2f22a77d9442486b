//! Behavior state machine: one update per combatant per tick.
//!
//! - `Idle`: wakes up into `Moving` while an enemy is alive.
//! - `Moving`: every `move_delay_ms`, attacks a reachable target or steps
//!   one cell towards it.
//! - `Attacking`: every attack delay, strikes the nearest enemy in range,
//!   possibly twice more through the bonus-attack family.
//! - `Dead`: terminal.

use arrayvec::ArrayVec;
use tracing::{debug, warn};

use super::BattleEngine;
use super::targeting::{in_range, nearest_target};
use crate::combat::{AttackResolver, bonus_attack_procs};
use crate::config::BattleConfig;
use crate::state::{
    BattleEvent, BehaviorState, Board, CombatantFields, EffectFamily, EntityId, Position,
};

/// One entry of the per-attempt strike list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Strike {
    Base,
    Bonus,
}

type StrikeList = ArrayVec<Strike, { BattleConfig::MAX_STRIKES_PER_ATTEMPT }>;

impl BattleEngine<'_> {
    /// Runs one state-machine update for `id`.
    pub(super) fn update(&mut self, id: EntityId, dt_ms: u32) {
        let Some(behavior) = self.field.combatant(id).map(|c| c.behavior) else {
            return;
        };
        match behavior {
            BehaviorState::Idle => self.update_idle(id),
            BehaviorState::Moving => self.update_moving(id, dt_ms),
            BehaviorState::Attacking => self.update_attacking(id, dt_ms),
            BehaviorState::Dead => {}
        }
    }

    /// Counts the cooldown down. Returns true when it was still running.
    fn cooling_down(&mut self, id: EntityId, dt_ms: u32) -> bool {
        let Some(unit) = self.field.combatant_mut(id) else {
            return true;
        };
        if unit.cooldown_ms == 0 {
            return false;
        }
        unit.cooldown_ms = unit.cooldown_ms.saturating_sub(dt_ms);
        true
    }

    fn update_idle(&mut self, id: EntityId) {
        let Some(unit) = self.field.combatant(id) else {
            return;
        };
        if unit.can_act() && self.field.living(unit.team.opponent()).next().is_some() {
            self.field.transition(id, BehaviorState::Moving);
        }
    }

    fn update_moving(&mut self, id: EntityId, dt_ms: u32) {
        if self.cooling_down(id, dt_ms) {
            return;
        }
        let Some(unit) = self.field.combatant_mut(id) else {
            return;
        };
        if !unit.can_act() {
            return;
        }
        unit.cooldown_ms = self.env.tables().movement.move_delay_ms;
        let confused = unit.is_confused();

        let Some(target) = nearest_target(self.field, id) else {
            self.field.transition(id, BehaviorState::Idle);
            return;
        };
        if !confused && in_range(self.field, id, target) {
            self.field.transition(id, BehaviorState::Attacking);
            return;
        }
        self.step(id, target, confused);
    }

    /// Moves one cell: randomly when confused, otherwise to the free cell
    /// closest to `target`. Stays put when surrounded.
    fn step(&mut self, id: EntityId, target: Position, confused: bool) {
        let Some(from) = self.field.combatant(id).map(|c| c.position) else {
            return;
        };
        let free: ArrayVec<Position, { BattleConfig::MAX_ADJACENT_CELLS }> = self
            .field
            .board()
            .adjacent_cells(from)
            .iter()
            .filter(|cell| cell.occupant.is_none())
            .map(|cell| cell.position)
            .collect();
        if free.is_empty() {
            return;
        }

        let destination = if confused {
            free[self.rng.next_index(free.len())]
        } else {
            let mut best = free[0];
            for &cell in &free[1..] {
                if Board::distance(cell, target) < Board::distance(best, target) {
                    best = cell;
                }
            }
            best
        };

        let orientation = Board::orientation(from, destination);
        if let (Some(orientation), Some(unit)) = (orientation, self.field.combatant_mut(id)) {
            unit.orientation = orientation;
            unit.mark(CombatantFields::ORIENTATION);
        }
        if let Err(err) = self.field.move_combatant(id, destination) {
            warn!(%id, %err, "step rejected by the board");
        }
    }

    fn update_attacking(&mut self, id: EntityId, dt_ms: u32) {
        if self.cooling_down(id, dt_ms) {
            return;
        }
        let Some(unit) = self.field.combatant_mut(id) else {
            return;
        };
        unit.cooldown_ms = unit.attack_delay_ms();
        let confused = unit.is_confused();

        let target = nearest_target(self.field, id).filter(|&t| in_range(self.field, id, t));
        let Some(target) = target.filter(|_| !confused) else {
            self.field.transition(id, BehaviorState::Moving);
            return;
        };

        self.attack(id, target);
    }

    /// Base strike, then the bonus roll; a successful roll queues two more
    /// strikes on the same cell. An attacker killed by one of its own strikes
    /// stops there.
    fn attack(&mut self, id: EntityId, target: Position) {
        let resolver = AttackResolver::new(self.env);
        let bonus_chance = self.field.combatant(id).and_then(|c| {
            c.effects
                .highest_tier(EffectFamily::BonusAttack)
                .map(|tier| self.env.tables().bonus_attack.get(tier))
        });

        let mut strikes = StrikeList::new();
        strikes.push(Strike::Base);

        let mut next = 0;
        while let Some(&strike) = strikes.get(next) {
            next += 1;
            let outcome = resolver.resolve(self.field, &mut *self.rng, id, target);
            debug!(%id, ?strike, ?outcome, "strike");

            if !self.field.combatant(id).is_some_and(|c| c.is_alive()) {
                debug!(%id, "attacker died mid-attempt");
                break;
            }
            if strike != Strike::Base {
                continue;
            }
            let Some(chance) = bonus_chance else {
                continue;
            };
            if !bonus_attack_procs(self.rng.next_f64(), chance) {
                continue;
            }
            if let Some(unit) = self.field.combatant_mut(id) {
                unit.counters.double_attack_count += 1;
                unit.mark(CombatantFields::COUNTERS);
            }
            self.field.record(BattleEvent::DoubleAttack { attacker: id });
            for _ in 0..2 {
                if strikes.try_push(Strike::Bonus).is_err() {
                    warn!(%id, "strike list full");
                }
            }
        }
    }
}
