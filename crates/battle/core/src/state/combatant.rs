//! Combatant entity: stats, held items, effect tags, status conditions,
//! counters and behavioral state.

use super::{
    ActionState, CombatantFields, DamageCategory, Effects, EntityId, HeldItems, Item,
    Orientation, Position, StatusEffects, StatusKind, Team,
};
use crate::env::{DefenseRules, SpeedTable};

/// Starting statistics of a combatant.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CombatStats {
    pub attack: u32,
    pub defense: u32,
    pub special_defense: u32,
    pub max_life: u32,
    pub max_mana: u32,
    /// Attacks per second.
    pub attack_speed: f64,
    /// Attack range in cells (Chebyshev).
    pub range: u32,
    /// Critical chance on a 0-100 scale.
    pub crit_chance: f64,
    /// Damage multiplier of critical hits, at least 1.0.
    pub crit_damage: f64,
    pub category: DamageCategory,
}

impl Default for CombatStats {
    fn default() -> Self {
        Self {
            attack: 10,
            defense: 0,
            special_defense: 0,
            max_life: 100,
            max_mana: 100,
            attack_speed: 1.0,
            range: 1,
            crit_chance: 0.0,
            crit_damage: 1.5,
            category: DamageCategory::Physical,
        }
    }
}

/// Per-match counters.
///
/// Values only grow or reset. Most exist so the presentation layer can play
/// the matching animation when they change.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Counters {
    /// Resolutions started by this combatant, including no-op ones.
    pub attack_count: u32,
    /// Critical hits received.
    pub crit_count: u32,
    /// Successful bonus-attack procs.
    pub double_attack_count: u32,
    /// Critical-burst splashes received.
    pub fairy_crit_count: u32,
    /// Static discharges received.
    pub static_count: u32,
    /// Static charge accumulated by a coil holder.
    pub static_holder_count: u32,
    /// Hits fully blocked by protection.
    pub blocked_count: u32,
}

/// Behavioral state of a combatant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum BehaviorState {
    #[default]
    Idle,
    Moving,
    Attacking,
    /// Terminal: removed from the board, never acts again.
    Dead,
}

/// Outcome of [`Combatant::handle_damage`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DamageReport {
    /// Damage left after mitigation.
    pub mitigated: u32,
    /// Part of `mitigated` soaked by the shield.
    pub absorbed: u32,
    /// Life actually lost.
    pub life_lost: u32,
    /// Protection blocked the whole hit.
    pub blocked: bool,
    /// This hit brought life to zero.
    pub lethal: bool,
}

/// A unit fighting on the board.
#[derive(Clone, Debug, PartialEq)]
pub struct Combatant {
    pub id: EntityId,
    pub team: Team,

    // === Spatial ===
    pub position: Position,
    pub orientation: Orientation,
    /// Cell currently attacked; `None` when not attacking.
    pub target: Option<Position>,

    // === Stats ===
    pub stats: CombatStats,
    pub life: u32,
    pub mana: u32,
    pub shield: u32,

    // === Collections ===
    pub items: HeldItems,
    pub effects: Effects,
    pub status: StatusEffects,
    pub counters: Counters,

    // === Behavior ===
    pub behavior: BehaviorState,
    pub action: ActionState,
    /// Milliseconds until the current state may act again.
    pub cooldown_ms: u32,

    /// Fields mutated since the last drain.
    pub changes: CombatantFields,
}

impl Combatant {
    /// Creates a combatant at full life with no mana.
    pub fn new(id: EntityId, team: Team, position: Position, stats: CombatStats) -> Self {
        Self {
            id,
            team,
            position,
            orientation: Orientation::default(),
            target: None,
            life: stats.max_life,
            mana: 0,
            shield: 0,
            stats,
            items: HeldItems::new(),
            effects: Effects::empty(),
            status: StatusEffects::empty(),
            counters: Counters::default(),
            behavior: BehaviorState::Idle,
            action: ActionState::Idle,
            cooldown_ms: 0,
            changes: CombatantFields::empty(),
        }
    }

    pub fn with_items(mut self, items: HeldItems) -> Self {
        self.items = items;
        self
    }

    pub fn with_effects(mut self, effects: Effects) -> Self {
        self.effects = effects;
        self
    }

    pub fn with_life(mut self, life: u32) -> Self {
        self.life = life.min(self.stats.max_life);
        self
    }

    pub fn with_mana(mut self, mana: u32) -> Self {
        self.mana = mana.min(self.stats.max_mana);
        self
    }

    pub fn with_shield(mut self, shield: u32) -> Self {
        self.shield = shield;
        self
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.life > 0 && self.behavior != BehaviorState::Dead
    }

    #[inline]
    pub fn holds(&self, item: Item) -> bool {
        self.items.has(item)
    }

    /// Frozen or asleep combatants cannot act.
    #[inline]
    pub fn can_act(&self) -> bool {
        self.status.can_act()
    }

    pub fn is_confused(&self) -> bool {
        self.status.has(StatusKind::Confusion)
    }

    pub fn mark(&mut self, fields: CombatantFields) {
        self.changes |= fields;
    }

    /// Delay between two attacks, derived from the current attack speed.
    ///
    /// Recomputed on every call since attack speed changes mid-fight.
    pub fn attack_delay_ms(&self) -> u32 {
        if self.stats.attack_speed <= 0.0 {
            return u32::MAX;
        }
        (1000.0 / self.stats.attack_speed).round() as u32
    }

    /// Scales attack speed by `percent`, kept within the table bounds.
    pub fn handle_attack_speed(&mut self, percent: f64, bounds: &SpeedTable) {
        let boosted = self.stats.attack_speed * (1.0 + percent / 100.0);
        self.stats.attack_speed = boosted.clamp(bounds.min_attack_speed, bounds.max_attack_speed);
        self.mark(CombatantFields::STATS);
    }

    /// Sets mana, clamped to `[0, max_mana]`.
    pub fn set_mana(&mut self, mana: u32) {
        self.mana = mana.min(self.stats.max_mana);
        self.mark(CombatantFields::MANA);
    }

    /// Takes a hit of `amount` before mitigation.
    ///
    /// Protection blocks everything. Physical hits are mitigated by defense
    /// (halved under armor reduction), special hits by special defense, true
    /// hits not at all. The shield soaks damage before life does.
    pub fn handle_damage(
        &mut self,
        amount: u32,
        category: DamageCategory,
        _source: Option<EntityId>,
        rules: &DefenseRules,
    ) -> DamageReport {
        let mut report = DamageReport::default();
        if amount == 0 || !self.is_alive() {
            return report;
        }

        if self.status.has(StatusKind::Protect) {
            self.counters.blocked_count += 1;
            self.mark(CombatantFields::COUNTERS);
            report.blocked = true;
            return report;
        }

        let defense = match category {
            DamageCategory::Physical if self.status.has(StatusKind::ArmorReduction) => {
                self.stats.defense / 2
            }
            DamageCategory::Physical => self.stats.defense,
            DamageCategory::Special => self.stats.special_defense,
            DamageCategory::True => 0,
        };
        report.mitigated = if defense == 0 {
            amount
        } else {
            (f64::from(amount) / (1.0 + rules.armor_factor * f64::from(defense))).round() as u32
        };

        report.absorbed = report.mitigated.min(self.shield);
        if report.absorbed > 0 {
            self.shield -= report.absorbed;
            self.mark(CombatantFields::STATS);
        }

        let remaining = report.mitigated - report.absorbed;
        report.life_lost = remaining.min(self.life);
        if report.life_lost > 0 {
            self.life -= report.life_lost;
            self.mark(CombatantFields::LIFE);
        }
        report.lethal = self.life == 0;
        report
    }

    /// Heals up to `amount`; returns life actually restored.
    ///
    /// Dead and wounded combatants cannot be healed.
    pub fn handle_heal(&mut self, amount: u32, _source: Option<EntityId>) -> u32 {
        if !self.is_alive() || self.status.has(StatusKind::Wound) {
            return 0;
        }
        let healed = amount.min(self.stats.max_life - self.life);
        if healed > 0 {
            self.life += healed;
            self.mark(CombatantFields::LIFE);
        }
        healed
    }

    /// Switches behavioral state, running the exit hook of the old state and
    /// the entry hook of the new one. Returns false if nothing changed.
    pub fn set_behavior(&mut self, next: BehaviorState) -> bool {
        if self.behavior == next || self.behavior == BehaviorState::Dead {
            return false;
        }

        if self.behavior == BehaviorState::Attacking {
            self.target = None;
            self.mark(CombatantFields::TARGET);
        }

        match next {
            BehaviorState::Idle => {
                self.action = ActionState::Idle;
            }
            BehaviorState::Moving => {
                self.action = ActionState::Walk;
                self.cooldown_ms = 0;
            }
            BehaviorState::Attacking => {
                self.action = ActionState::Attack;
                self.cooldown_ms = 0;
            }
            BehaviorState::Dead => {
                self.action = ActionState::Hurt;
                self.cooldown_ms = 0;
            }
        }

        self.behavior = next;
        self.mark(CombatantFields::ACTION);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn combatant(stats: CombatStats) -> Combatant {
        Combatant::new(EntityId(1), Team::Blue, Position::ORIGIN, stats)
    }

    #[test]
    fn defense_mitigates_matching_category() {
        let stats = CombatStats {
            defense: 10,
            special_defense: 5,
            ..CombatStats::default()
        };
        let rules = DefenseRules::default();

        let mut unit = combatant(stats);
        assert_eq!(unit.handle_damage(20, DamageCategory::Physical, None, &rules).life_lost, 10);

        let mut unit = combatant(stats);
        // 20 / 1.5 = 13.33
        assert_eq!(unit.handle_damage(20, DamageCategory::Special, None, &rules).life_lost, 13);

        let mut unit = combatant(stats);
        assert_eq!(unit.handle_damage(20, DamageCategory::True, None, &rules).life_lost, 20);
    }

    #[test]
    fn armor_reduction_halves_defense() {
        let stats = CombatStats {
            defense: 20,
            ..CombatStats::default()
        };
        let mut unit = combatant(stats);
        unit.status.trigger(StatusKind::ArmorReduction, 5000, None);

        let report = unit.handle_damage(20, DamageCategory::Physical, None, &DefenseRules::default());
        assert_eq!(report.life_lost, 10);
    }

    #[test]
    fn shield_absorbs_before_life_and_lethal_is_reported() {
        let mut unit = combatant(CombatStats {
            max_life: 30,
            ..CombatStats::default()
        })
        .with_shield(10);

        let report = unit.handle_damage(25, DamageCategory::True, None, &DefenseRules::default());
        assert_eq!(report.absorbed, 10);
        assert_eq!(report.life_lost, 15);
        assert_eq!(unit.life, 15);
        assert!(!report.lethal);

        let report = unit.handle_damage(99, DamageCategory::True, None, &DefenseRules::default());
        assert_eq!(report.life_lost, 15);
        assert!(report.lethal);
        assert_eq!(unit.life, 0);
    }

    #[test]
    fn protect_blocks_and_counts() {
        let mut unit = combatant(CombatStats::default());
        unit.status.trigger(StatusKind::Protect, 1000, None);

        let report = unit.handle_damage(50, DamageCategory::True, None, &DefenseRules::default());
        assert!(report.blocked);
        assert_eq!(unit.life, 100);
        assert_eq!(unit.counters.blocked_count, 1);
    }

    #[test]
    fn heal_caps_and_respects_wound() {
        let mut unit = combatant(CombatStats::default()).with_life(98);
        assert_eq!(unit.handle_heal(5, None), 2);
        assert_eq!(unit.life, 100);

        unit.life = 50;
        unit.status.trigger(StatusKind::Wound, 1000, None);
        assert_eq!(unit.handle_heal(5, None), 0);
        assert_eq!(unit.life, 50);
    }

    #[test]
    fn attack_delay_tracks_speed() {
        let mut unit = combatant(CombatStats {
            attack_speed: 0.75,
            ..CombatStats::default()
        });
        assert_eq!(unit.attack_delay_ms(), 1333);

        let bounds = SpeedTable::default();
        unit.handle_attack_speed(100.0, &bounds);
        assert_eq!(unit.attack_delay_ms(), 667);
        unit.handle_attack_speed(1000.0, &bounds);
        assert_eq!(unit.stats.attack_speed, bounds.max_attack_speed);
        assert_eq!(unit.attack_delay_ms(), 400);
    }

    #[test]
    fn mana_is_clamped() {
        let mut unit = combatant(CombatStats::default());
        unit.set_mana(250);
        assert_eq!(unit.mana, 100);
    }

    #[test]
    fn leaving_attacking_clears_target() {
        let mut unit = combatant(CombatStats::default());
        assert!(unit.set_behavior(BehaviorState::Attacking));
        assert_eq!(unit.action, ActionState::Attack);
        unit.target = Some(Position::new(1, 0));
        unit.cooldown_ms = 300;

        assert!(unit.set_behavior(BehaviorState::Moving));
        assert_eq!(unit.target, None);
        assert_eq!(unit.cooldown_ms, 0);

        assert!(unit.set_behavior(BehaviorState::Dead));
        assert!(!unit.set_behavior(BehaviorState::Idle));
        assert!(!unit.is_alive());
    }
}
