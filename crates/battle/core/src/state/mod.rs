//! Battle state: the board, the roster of combatants and the replay log.
//!
//! [`Battlefield`] is the single owner of mutable battle data. Its mutation
//! helpers (`apply_damage`, `apply_heal`, `grant_mana`, `trigger_status`,
//! `transition`, `move_combatant`) keep the board, the change marks and the
//! event log consistent; the engine and the resolver go through them.

mod board;
mod combatant;
mod common;
mod delta;
mod effects;
mod events;
mod items;
mod status;

pub use board::{AdjacentCells, Board, BoardError, Cell};
pub use combatant::{BehaviorState, CombatStats, Combatant, Counters, DamageReport};
pub use common::{ActionState, Climate, DamageCategory, EntityId, Orientation, Position, Team};
pub use delta::{CombatantChange, CombatantFields};
pub use effects::{EffectFamily, Effects, Tier};
pub use events::{BattleEvent, SplashKind};
pub use items::{HeldItems, Item, ItemError};
pub use status::{StatusCondition, StatusEffects, StatusKind};

use arrayvec::ArrayVec;

use crate::config::BattleConfig;
use crate::env::DefenseRules;
use crate::error::{BattleError, ErrorSeverity};

/// Neighbouring combatants of a cell.
pub type Neighbours = ArrayVec<EntityId, { BattleConfig::MAX_ADJACENT_CELLS }>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SpawnError {
    #[error("combatant {0} is already on the battlefield")]
    DuplicateId(EntityId),

    #[error(transparent)]
    Board(#[from] BoardError),
}

impl BattleError for SpawnError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::DuplicateId(_) => ErrorSeverity::Validation,
            Self::Board(err) => err.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::DuplicateId(_) => "SPAWN_DUPLICATE_ID",
            Self::Board(err) => err.error_code(),
        }
    }
}

/// Board, roster and replay log of one match.
#[derive(Clone, Debug, PartialEq)]
pub struct Battlefield {
    board: Board,
    /// Roster in spawn order. Dead combatants stay here, off the board.
    combatants: Vec<Combatant>,
    events: Vec<BattleEvent>,
}

impl Battlefield {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            board: Board::new(width, height),
            combatants: Vec::new(),
            events: Vec::new(),
        }
    }

    pub fn from_config(config: &BattleConfig) -> Self {
        Self::new(config.board_width, config.board_height)
    }

    /// Places a new combatant on the board.
    pub fn spawn(&mut self, combatant: Combatant) -> Result<(), SpawnError> {
        if self.combatant(combatant.id).is_some() {
            return Err(SpawnError::DuplicateId(combatant.id));
        }
        self.board.place(combatant.id, combatant.position)?;
        self.combatants.push(combatant);
        Ok(())
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn combatant(&self, id: EntityId) -> Option<&Combatant> {
        self.combatants.iter().find(|c| c.id == id)
    }

    pub fn combatant_mut(&mut self, id: EntityId) -> Option<&mut Combatant> {
        self.combatants.iter_mut().find(|c| c.id == id)
    }

    /// Every combatant in spawn order, dead ones included.
    pub fn combatants(&self) -> impl Iterator<Item = &Combatant> {
        self.combatants.iter()
    }

    /// Living combatant standing on `position`.
    pub fn occupant(&self, position: Position) -> Option<&Combatant> {
        self.board
            .get(position)
            .and_then(|id| self.combatant(id))
            .filter(|c| c.is_alive())
    }

    pub fn living(&self, team: Team) -> impl Iterator<Item = &Combatant> {
        self.combatants
            .iter()
            .filter(move |c| c.team == team && c.is_alive())
    }

    /// Living combatants in board scan order: the per-tick processing order.
    pub fn turn_order(&self) -> Vec<EntityId> {
        self.board
            .occupants()
            .filter(|(position, _)| self.occupant(*position).is_some())
            .map(|(_, id)| id)
            .collect()
    }

    /// Living combatants not on `team` next to `position`, in adjacency order.
    pub fn adjacent_enemies(&self, position: Position, team: Team) -> Neighbours {
        self.adjacent_matching(position, |c| c.team != team)
    }

    /// Living combatants on `team` next to `position`, in adjacency order.
    pub fn adjacent_allies(&self, position: Position, team: Team) -> Neighbours {
        self.adjacent_matching(position, |c| c.team == team)
    }

    fn adjacent_matching(&self, position: Position, keep: impl Fn(&Combatant) -> bool) -> Neighbours {
        self.board
            .adjacent_cells(position)
            .iter()
            .filter_map(|cell| self.occupant(cell.position))
            .filter(|&c| keep(c))
            .map(|c| c.id)
            .collect()
    }

    /// Living combatants not on `team`, in board scan order.
    pub fn enemies_on_board(&self, team: Team) -> Vec<EntityId> {
        self.board
            .occupants()
            .filter_map(|(position, _)| self.occupant(position))
            .filter(|c| c.team != team)
            .map(|c| c.id)
            .collect()
    }

    // ===== replay log & change marks =====

    pub fn record(&mut self, event: BattleEvent) {
        tracing::trace!(?event, "battle event");
        self.events.push(event);
    }

    pub fn events(&self) -> &[BattleEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<BattleEvent> {
        std::mem::take(&mut self.events)
    }

    /// Returns and clears the change marks of every combatant.
    pub fn drain_changes(&mut self) -> Vec<CombatantChange> {
        self.combatants
            .iter_mut()
            .filter(|c| !c.changes.is_empty())
            .map(|c| CombatantChange {
                id: c.id,
                fields: std::mem::take(&mut c.changes),
            })
            .collect()
    }

    // ===== mutation helpers =====

    /// Hands a hit to the target's damage contract.
    ///
    /// Returns `None` when the target is gone or already dead. A lethal hit
    /// removes the target from the board and moves it to [`BehaviorState::Dead`].
    pub fn apply_damage(
        &mut self,
        target: EntityId,
        amount: u32,
        category: DamageCategory,
        source: Option<EntityId>,
        rules: &DefenseRules,
    ) -> Option<DamageReport> {
        let combatant = self.combatant_mut(target).filter(|c| c.is_alive())?;
        let report = combatant.handle_damage(amount, category, source, rules);
        let life = combatant.life;

        self.record(BattleEvent::Damaged {
            target,
            source,
            category,
            amount,
            life_lost: report.life_lost,
            absorbed: report.absorbed,
            blocked: report.blocked,
            life,
        });
        if report.lethal {
            self.kill(target, source);
        }
        Some(report)
    }

    /// Hands a heal to the target's heal contract; returns life restored.
    pub fn apply_heal(&mut self, target: EntityId, amount: u32, source: Option<EntityId>) -> u32 {
        let Some(combatant) = self.combatant_mut(target) else {
            return 0;
        };
        let healed = combatant.handle_heal(amount, source);
        let life = combatant.life;
        if healed > 0 {
            self.record(BattleEvent::Healed {
                target,
                source,
                amount: healed,
                life,
            });
        }
        healed
    }

    /// Adds mana, clamped to the combatant's maximum.
    pub fn grant_mana(&mut self, id: EntityId, amount: u32) {
        let Some(combatant) = self.combatant_mut(id) else {
            return;
        };
        combatant.set_mana(combatant.mana.saturating_add(amount));
        let mana = combatant.mana;
        self.record(BattleEvent::ManaChanged { id, mana });
    }

    /// Applies a status condition to a living combatant.
    pub fn trigger_status(
        &mut self,
        target: EntityId,
        kind: StatusKind,
        duration_ms: u32,
        source: Option<EntityId>,
    ) -> bool {
        let Some(combatant) = self.combatant_mut(target).filter(|c| c.is_alive()) else {
            return false;
        };
        if !combatant.status.trigger(kind, duration_ms, source) {
            return false;
        }
        combatant.mark(CombatantFields::STATUS);
        self.record(BattleEvent::StatusApplied {
            target,
            kind,
            duration_ms,
            source,
        });
        true
    }

    /// Decays the status conditions of a combatant by `dt_ms`.
    pub fn tick_status(&mut self, id: EntityId, dt_ms: u32) {
        let Some(combatant) = self.combatant_mut(id) else {
            return;
        };
        let expired = combatant.status.tick(dt_ms);
        if expired.is_empty() {
            return;
        }
        combatant.mark(CombatantFields::STATUS);
        for kind in expired {
            self.record(BattleEvent::StatusExpired { id, kind });
        }
    }

    /// Moves a combatant to another behavioral state.
    pub fn transition(&mut self, id: EntityId, next: BehaviorState) -> bool {
        let Some(combatant) = self.combatant_mut(id) else {
            return false;
        };
        let from = combatant.behavior;
        if !combatant.set_behavior(next) {
            return false;
        }
        tracing::debug!(%id, %from, to = %next, "behavior transition");
        self.record(BattleEvent::StateChanged { id, from, to: next });
        true
    }

    /// Steps a combatant onto a free cell.
    pub fn move_combatant(&mut self, id: EntityId, to: Position) -> Result<(), BoardError> {
        let Some(from) = self.combatant(id).map(|c| c.position) else {
            return Ok(());
        };
        self.board.move_occupant(from, to)?;
        if let Some(combatant) = self.combatant_mut(id) {
            combatant.position = to;
            combatant.mark(CombatantFields::POSITION);
        }
        self.record(BattleEvent::Moved { id, from, to });
        Ok(())
    }

    fn kill(&mut self, id: EntityId, killer: Option<EntityId>) {
        let Some(position) = self.combatant(id).map(|c| c.position) else {
            return;
        };
        if self.board.get(position) == Some(id) {
            self.board.remove(position);
        }
        self.transition(id, BehaviorState::Dead);
        self.record(BattleEvent::Died { id, killer });
        tracing::debug!(%id, ?killer, "combatant died");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(id: u32, team: Team, x: i32, y: i32) -> Combatant {
        Combatant::new(EntityId(id), team, Position::new(x, y), CombatStats::default())
    }

    #[test]
    fn spawn_rejects_duplicates_and_collisions() {
        let mut field = Battlefield::new(4, 4);
        field.spawn(unit(1, Team::Blue, 0, 0)).unwrap();

        assert_eq!(
            field.spawn(unit(1, Team::Red, 1, 1)),
            Err(SpawnError::DuplicateId(EntityId(1)))
        );
        assert!(matches!(
            field.spawn(unit(2, Team::Red, 0, 0)),
            Err(SpawnError::Board(BoardError::Occupied { .. }))
        ));
    }

    #[test]
    fn lethal_damage_removes_from_board() {
        let mut field = Battlefield::new(4, 4);
        field.spawn(unit(1, Team::Blue, 0, 0)).unwrap();
        field.spawn(unit(2, Team::Red, 1, 0)).unwrap();

        let report = field
            .apply_damage(EntityId(2), 500, DamageCategory::True, Some(EntityId(1)), &DefenseRules::default())
            .unwrap();
        assert!(report.lethal);

        let dead = field.combatant(EntityId(2)).unwrap();
        assert_eq!(dead.behavior, BehaviorState::Dead);
        assert_eq!(field.board().get(Position::new(1, 0)), None);
        assert!(field.occupant(Position::new(1, 0)).is_none());
        assert!(matches!(
            field.events().last(),
            Some(BattleEvent::Died { id: EntityId(2), killer: Some(EntityId(1)) })
        ));

        // Further hits on the corpse are ignored.
        assert!(
            field
                .apply_damage(EntityId(2), 5, DamageCategory::True, None, &DefenseRules::default())
                .is_none()
        );
    }

    #[test]
    fn adjacency_splits_by_team() {
        let mut field = Battlefield::new(4, 4);
        field.spawn(unit(1, Team::Blue, 1, 1)).unwrap();
        field.spawn(unit(2, Team::Blue, 0, 0)).unwrap();
        field.spawn(unit(3, Team::Red, 2, 2)).unwrap();
        field.spawn(unit(4, Team::Red, 3, 3)).unwrap();

        let center = Position::new(1, 1);
        assert_eq!(field.adjacent_allies(center, Team::Blue).as_slice(), &[EntityId(2)]);
        assert_eq!(field.adjacent_enemies(center, Team::Blue).as_slice(), &[EntityId(3)]);
        assert_eq!(field.enemies_on_board(Team::Blue), vec![EntityId(3), EntityId(4)]);
    }

    #[test]
    fn turn_order_follows_scan_order() {
        let mut field = Battlefield::new(3, 3);
        field.spawn(unit(1, Team::Blue, 2, 2)).unwrap();
        field.spawn(unit(2, Team::Red, 0, 1)).unwrap();
        field.spawn(unit(3, Team::Red, 1, 0)).unwrap();

        assert_eq!(field.turn_order(), vec![EntityId(3), EntityId(2), EntityId(1)]);
    }

    #[test]
    fn changes_drain_once() {
        let mut field = Battlefield::new(3, 3);
        field.spawn(unit(1, Team::Blue, 0, 0)).unwrap();
        field.grant_mana(EntityId(1), 10);

        let changes = field.drain_changes();
        assert_eq!(changes.len(), 1);
        assert!(changes[0].fields.contains(CombatantFields::MANA));
        assert!(field.drain_changes().is_empty());
    }

    #[test]
    fn status_expiry_is_logged() {
        let mut field = Battlefield::new(3, 3);
        field.spawn(unit(1, Team::Blue, 0, 0)).unwrap();
        assert!(field.trigger_status(EntityId(1), StatusKind::Silence, 100, None));

        field.tick_status(EntityId(1), 100);
        assert!(matches!(
            field.events().last(),
            Some(BattleEvent::StatusExpired { kind: StatusKind::Silence, .. })
        ));
    }
}
