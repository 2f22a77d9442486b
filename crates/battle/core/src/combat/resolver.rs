//! Attack resolution pipeline.
//!
//! One call to [`AttackResolver::resolve`] is one attack event. After a short
//! prelude (attack counter, target coordinates) and the gate (a living enemy
//! on the target cell, a living attacker that is neither frozen nor asleep),
//! the named [`AttackStage`]s run in [`AttackStage::PIPELINE`] order. Every stage
//! is gated only by the items and effects it cares about; none of them
//! excludes another, so a single attack may trigger many.
//!
//! ## RNG draw order
//! 1. freeze (snow only)
//! 2. poison (non-zero chance only)
//! 3. critical (always)

use tracing::{debug, trace};

use super::damage::{cleave_damage, critical_damage, freeze_procs, is_critical, poison_procs};
use crate::env::{BattleEnv, Diagnostic, RandomSource};
use crate::state::{
    BattleEvent, Battlefield, Board, Climate, CombatantFields, DamageCategory, EffectFamily,
    Effects, EntityId, Item, Orientation, Position, SplashKind, StatusKind, Team,
};

/// Named stages of an attack, in execution order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum AttackStage {
    /// Face the target.
    Orient,
    /// Accelerator: attack speed boost.
    AttackSpeed,
    /// Freeze proc under snow.
    ClimateFreeze,
    /// Poison proc.
    Poison,
    /// Silence from hex-like effects.
    Silence,
    /// Flat mana from on-hit effects.
    ManaOnHit,
    /// Critical roll, critical-burst splash and damage amount.
    Damage,
    /// Hand the damage to the target.
    ApplyDamage,
    /// Static coil charge and discharge.
    StaticBuildup,
    /// Smoke bomb on the target smokes the attacker.
    Retaliation,
    /// Armor piercer reduces the target's armor.
    ArmorBreak,
    /// Cleaving blade hits one enemy next to the target.
    Cleave,
    /// Leftovers heal the attacker and adjacent allies.
    Leftovers,
    /// Mana charm restores mana.
    ManaCharm,
}

impl AttackStage {
    pub const PIPELINE: [AttackStage; 14] = [
        Self::Orient,
        Self::AttackSpeed,
        Self::ClimateFreeze,
        Self::Poison,
        Self::Silence,
        Self::ManaOnHit,
        Self::Damage,
        Self::ApplyDamage,
        Self::StaticBuildup,
        Self::Retaliation,
        Self::ArmorBreak,
        Self::Cleave,
        Self::Leftovers,
        Self::ManaCharm,
    ];
}

/// Data shared by the stages of one attack.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AttackContext {
    pub attacker: EntityId,
    pub team: Team,
    pub attacker_position: Position,
    pub target: EntityId,
    pub target_position: Position,
    /// Damage computed by [`AttackStage::Damage`]; zero before it runs.
    pub damage: u32,
    pub critical: bool,
}

/// What a call to [`AttackResolver::resolve`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StrikeOutcome {
    /// The full pipeline ran.
    Resolved { damage: u32, critical: bool },
    /// No living enemy on the target cell; only counters were updated.
    NoTarget,
    /// The attacker is dead, frozen or asleep; only counters were updated.
    Incapacitated,
    /// The attacker is not on the battlefield.
    UnknownAttacker,
}

/// Executes attacks against a [`Battlefield`].
#[derive(Clone, Copy, Debug)]
pub struct AttackResolver<'a> {
    env: BattleEnv<'a>,
}

impl<'a> AttackResolver<'a> {
    pub fn new(env: BattleEnv<'a>) -> Self {
        Self { env }
    }

    /// Resolves one attack of `attacker` on the cell `target_position`.
    ///
    /// An attacker killed earlier in the same attempt (by a critical-burst
    /// splash, say) resolves as [`StrikeOutcome::Incapacitated`].
    pub fn resolve(
        &self,
        field: &mut Battlefield,
        rng: &mut dyn RandomSource,
        attacker: EntityId,
        target_position: Position,
    ) -> StrikeOutcome {
        let Some(mut ctx) = self.begin(field, attacker, target_position) else {
            return StrikeOutcome::UnknownAttacker;
        };

        let Some(unit) = field.combatant(attacker) else {
            return StrikeOutcome::UnknownAttacker;
        };
        if !unit.is_alive() || !unit.can_act() {
            trace!(%attacker, "attacker incapacitated, strike skipped");
            return StrikeOutcome::Incapacitated;
        }
        let Some(target) = field
            .occupant(target_position)
            .filter(|t| t.team != ctx.team)
            .map(|t| t.id)
        else {
            trace!(%attacker, %target_position, "no target on cell, strike skipped");
            return StrikeOutcome::NoTarget;
        };
        ctx.target = target;

        for stage in AttackStage::PIPELINE {
            self.run_stage(stage, &mut ctx, field, rng);
        }

        debug!(
            %attacker,
            %target,
            damage = ctx.damage,
            critical = ctx.critical,
            "attack resolved"
        );
        StrikeOutcome::Resolved {
            damage: ctx.damage,
            critical: ctx.critical,
        }
    }

    /// Prelude run by every resolution, even one that ends up a no-op: the
    /// attack counter grows and the target coordinates are set for animation.
    fn begin(
        &self,
        field: &mut Battlefield,
        attacker: EntityId,
        target_position: Position,
    ) -> Option<AttackContext> {
        let unit = field.combatant_mut(attacker)?;
        unit.counters.attack_count += 1;
        unit.target = Some(target_position);
        unit.mark(CombatantFields::COUNTERS | CombatantFields::TARGET);

        Some(AttackContext {
            attacker,
            team: unit.team,
            attacker_position: unit.position,
            target: attacker,
            target_position,
            damage: 0,
            critical: false,
        })
    }

    /// Runs a single stage against an already-gated context.
    pub fn run_stage(
        &self,
        stage: AttackStage,
        ctx: &mut AttackContext,
        field: &mut Battlefield,
        rng: &mut dyn RandomSource,
    ) {
        trace!(%stage, attacker = %ctx.attacker, "attack stage");
        match stage {
            AttackStage::Orient => self.orient(ctx, field),
            AttackStage::AttackSpeed => self.attack_speed(ctx, field),
            AttackStage::ClimateFreeze => self.climate_freeze(ctx, field, rng),
            AttackStage::Poison => self.poison(ctx, field, rng),
            AttackStage::Silence => self.silence(ctx, field),
            AttackStage::ManaOnHit => self.mana_on_hit(ctx, field),
            AttackStage::Damage => self.damage(ctx, field, rng),
            AttackStage::ApplyDamage => self.apply_damage(ctx, field),
            AttackStage::StaticBuildup => self.static_buildup(ctx, field),
            AttackStage::Retaliation => self.retaliation(ctx, field),
            AttackStage::ArmorBreak => self.armor_break(ctx, field),
            AttackStage::Cleave => self.cleave(ctx, field),
            AttackStage::Leftovers => self.leftovers(ctx, field),
            AttackStage::ManaCharm => self.mana_charm(ctx, field),
        }
    }

    fn attacker_effects(ctx: &AttackContext, field: &Battlefield) -> Effects {
        field
            .combatant(ctx.attacker)
            .map(|c| c.effects)
            .unwrap_or_default()
    }

    fn attacker_holds(ctx: &AttackContext, field: &Battlefield, item: Item) -> bool {
        field.combatant(ctx.attacker).is_some_and(|c| c.holds(item))
    }

    fn orient(&self, ctx: &AttackContext, field: &mut Battlefield) {
        let orientation = Board::orientation(ctx.attacker_position, ctx.target_position)
            .unwrap_or_else(|| {
                self.env.diagnostics().report(Diagnostic::UnclearOrientation {
                    attacker: ctx.attacker,
                    position: ctx.attacker_position,
                });
                Orientation::FALLBACK
            });

        if let Some(unit) = field.combatant_mut(ctx.attacker) {
            unit.orientation = orientation;
            unit.mark(CombatantFields::ORIENTATION);
        }
        field.record(BattleEvent::AttackStarted {
            attacker: ctx.attacker,
            target: ctx.target_position,
            orientation,
        });
    }

    fn attack_speed(&self, ctx: &AttackContext, field: &mut Battlefield) {
        if !Self::attacker_holds(ctx, field, Item::Accelerator) {
            return;
        }
        let tables = self.env.tables();
        let Some(unit) = field.combatant_mut(ctx.attacker) else {
            return;
        };
        unit.handle_attack_speed(tables.items.accelerator_speed_percent, &tables.speed);
        let attack_speed = unit.stats.attack_speed;
        field.record(BattleEvent::AttackSpeedChanged {
            id: ctx.attacker,
            attack_speed,
        });
    }

    fn climate_freeze(&self, ctx: &AttackContext, field: &mut Battlefield, rng: &mut dyn RandomSource) {
        if self.env.climate() != Climate::Snow {
            return;
        }
        let table = self.env.tables().freeze;
        let effects = Self::attacker_effects(ctx, field);

        let mut chance = 0.0;
        if effects.contains(Effects::CHILL) {
            chance += table.chill_chance;
        }
        if effects.contains(Effects::DEEP_FREEZE) {
            chance += table.deep_freeze_chance;
        }

        if freeze_procs(rng.next_f64(), chance) {
            field.trigger_status(ctx.target, StatusKind::Freeze, table.duration_ms, Some(ctx.attacker));
        }
    }

    fn poison(&self, ctx: &AttackContext, field: &mut Battlefield, rng: &mut dyn RandomSource) {
        let table = self.env.tables().poison;
        let effects = Self::attacker_effects(ctx, field);

        let mut chance = 0.0;
        if effects.contains(Effects::VENOM) {
            chance += table.venom_chance;
        }
        if effects.contains(Effects::TOXIN) {
            chance += table.toxin_chance;
        }
        if chance == 0.0 {
            return;
        }

        if poison_procs(rng.next_f64(), chance) {
            field.trigger_status(ctx.target, StatusKind::Poison, table.duration_ms, Some(ctx.attacker));
        }
    }

    fn silence(&self, ctx: &AttackContext, field: &mut Battlefield) {
        if Self::attacker_effects(ctx, field).silences() {
            let duration = self.env.tables().silence.duration_ms;
            field.trigger_status(ctx.target, StatusKind::Silence, duration, Some(ctx.attacker));
        }
    }

    fn mana_on_hit(&self, ctx: &AttackContext, field: &mut Battlefield) {
        let table = self.env.tables().mana_on_hit;
        let effects = Self::attacker_effects(ctx, field);

        if effects.contains(Effects::VENGEANCE) {
            field.grant_mana(ctx.attacker, table.vengeance);
        }
        if effects.contains(Effects::RETRIBUTION) {
            field.grant_mana(ctx.attacker, table.retribution);
        }
    }

    fn damage(&self, ctx: &mut AttackContext, field: &mut Battlefield, rng: &mut dyn RandomSource) {
        let Some(attacker) = field.combatant(ctx.attacker) else {
            return;
        };
        let stats = attacker.stats;
        let attacker_effects = attacker.effects;
        let (target_team, target_effects, target_immune) = match field.combatant(ctx.target) {
            Some(t) => (t.team, t.effects, t.holds(Item::CritShield)),
            None => return,
        };

        ctx.critical = is_critical(rng.next_f64(), stats.crit_chance, target_immune);
        if !ctx.critical {
            ctx.damage = stats.attack;
            return;
        }

        self.crit_burst(ctx, field, attacker_effects, ctx.attacker_position, ctx.team);
        self.crit_burst(ctx, field, target_effects, ctx.target_position, target_team);

        ctx.damage = critical_damage(stats.attack, stats.crit_damage);
        if let Some(target) = field.combatant_mut(ctx.target) {
            target.counters.crit_count += 1;
            target.mark(CombatantFields::COUNTERS);
        }
        field.record(BattleEvent::CriticalHit {
            attacker: ctx.attacker,
            target: ctx.target,
        });
    }

    /// Critical-burst splash around a holder: the holder's enemies next to
    /// `center` take the highest held tier's damage.
    fn crit_burst(
        &self,
        ctx: &AttackContext,
        field: &mut Battlefield,
        holder_effects: Effects,
        center: Position,
        holder_team: Team,
    ) {
        let Some(tier) = holder_effects.highest_tier(EffectFamily::CritBurst) else {
            return;
        };
        let tables = self.env.tables();
        let amount = tables.crit_burst.get(tier);

        for victim in field.adjacent_enemies(center, holder_team) {
            if let Some(unit) = field.combatant_mut(victim) {
                unit.counters.fairy_crit_count += 1;
                unit.mark(CombatantFields::COUNTERS);
            }
            field.record(BattleEvent::Splash {
                source: ctx.attacker,
                target: victim,
                kind: SplashKind::CritBurst,
            });
            field.apply_damage(
                victim,
                amount,
                DamageCategory::Special,
                Some(ctx.attacker),
                &tables.defense,
            );
        }
    }

    fn apply_damage(&self, ctx: &AttackContext, field: &mut Battlefield) {
        let Some(category) = field.combatant(ctx.attacker).map(|c| c.stats.category) else {
            return;
        };
        field.apply_damage(
            ctx.target,
            ctx.damage,
            category,
            Some(ctx.attacker),
            &self.env.tables().defense,
        );
    }

    fn static_buildup(&self, ctx: &AttackContext, field: &mut Battlefield) {
        if !Self::attacker_holds(ctx, field, Item::StaticCoil) {
            return;
        }
        let tables = self.env.tables();
        let Some(unit) = field.combatant_mut(ctx.attacker) else {
            return;
        };
        unit.counters.static_holder_count += 1;
        unit.mark(CombatantFields::COUNTERS);
        if unit.counters.static_holder_count <= tables.items.static_threshold {
            return;
        }
        unit.counters.static_holder_count = 0;

        for enemy in field.enemies_on_board(ctx.team) {
            if let Some(victim) = field.combatant_mut(enemy) {
                victim.counters.static_count += 1;
                victim.mark(CombatantFields::COUNTERS);
            }
            field.record(BattleEvent::Splash {
                source: ctx.attacker,
                target: enemy,
                kind: SplashKind::Static,
            });
            field.apply_damage(
                enemy,
                tables.items.static_damage,
                DamageCategory::Special,
                Some(ctx.attacker),
                &tables.defense,
            );
        }
    }

    fn retaliation(&self, ctx: &AttackContext, field: &mut Battlefield) {
        let target_holds = field
            .combatant(ctx.target)
            .is_some_and(|t| t.holds(Item::SmokeBomb));
        if target_holds {
            let duration = self.env.tables().items.smoke_duration_ms;
            field.trigger_status(ctx.attacker, StatusKind::Smoke, duration, Some(ctx.target));
        }
    }

    fn armor_break(&self, ctx: &AttackContext, field: &mut Battlefield) {
        if Self::attacker_holds(ctx, field, Item::ArmorPiercer) {
            let duration = self.env.tables().items.armor_reduction_duration_ms;
            field.trigger_status(ctx.target, StatusKind::ArmorReduction, duration, Some(ctx.attacker));
        }
    }

    fn cleave(&self, ctx: &AttackContext, field: &mut Battlefield) {
        let Some(category) = field
            .combatant(ctx.attacker)
            .filter(|c| c.holds(Item::CleavingBlade))
            .map(|c| c.stats.category)
        else {
            return;
        };
        let Some(&victim) = field.adjacent_enemies(ctx.target_position, ctx.team).first() else {
            return;
        };

        let tables = self.env.tables();
        field.record(BattleEvent::Splash {
            source: ctx.attacker,
            target: victim,
            kind: SplashKind::Cleave,
        });
        field.apply_damage(
            victim,
            cleave_damage(ctx.damage, tables.items.cleave_ratio),
            category,
            Some(ctx.attacker),
            &tables.defense,
        );
    }

    fn leftovers(&self, ctx: &AttackContext, field: &mut Battlefield) {
        if !Self::attacker_holds(ctx, field, Item::Leftovers) {
            return;
        }
        let heal = self.env.tables().items.leftovers_heal;
        field.apply_heal(ctx.attacker, heal, Some(ctx.attacker));
        for ally in field.adjacent_allies(ctx.attacker_position, ctx.team) {
            field.apply_heal(ally, heal, Some(ctx.attacker));
        }
    }

    fn mana_charm(&self, ctx: &AttackContext, field: &mut Battlefield) {
        if Self::attacker_holds(ctx, field, Item::ManaCharm) {
            field.grant_mana(ctx.attacker, self.env.tables().items.mana_charm_mana);
        }
    }
}
