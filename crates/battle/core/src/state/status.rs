//! Timed status conditions on a combatant.
//!
//! Conditions count down in milliseconds of simulated time. Applying a kind
//! that is already active refreshes its remaining time (to the later of the
//! two) instead of stacking a second instance.

use arrayvec::ArrayVec;

use super::EntityId;
use crate::config::BattleConfig;

/// Active status conditions on a combatant.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffects {
    conditions: ArrayVec<StatusCondition, { BattleConfig::MAX_STATUS_CONDITIONS }>,
}

/// A single condition with its remaining time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusCondition {
    pub kind: StatusKind,
    /// Milliseconds until the condition expires.
    pub remaining_ms: u32,
    /// Combatant whose action applied the condition.
    pub source: Option<EntityId>,
}

/// Types of status conditions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum StatusKind {
    // ========================================================================
    // Crowd Control
    // ========================================================================
    /// Cannot attack or move.
    Freeze,

    /// Cannot attack or move.
    Sleep,

    /// Wanders instead of attacking.
    Confusion,

    /// Cannot cast abilities.
    Silence,

    // ========================================================================
    // Debuffs
    // ========================================================================
    Poison,

    Burn,

    /// Defense is halved against physical damage.
    ArmorReduction,

    /// Healing is blocked.
    Wound,

    /// Blinded by a retaliation smoke cloud.
    Smoke,

    // ========================================================================
    // Buffs
    // ========================================================================
    /// All incoming damage is blocked.
    Protect,

    /// Harmful conditions cannot be applied.
    RuneProtect,

    SpikeArmor,

    ElectricField,

    PsychicField,
}

impl StatusKind {
    /// Conditions that rune protection refuses.
    pub const fn is_harmful(self) -> bool {
        matches!(
            self,
            Self::Freeze
                | Self::Sleep
                | Self::Confusion
                | Self::Silence
                | Self::Poison
                | Self::Burn
                | Self::ArmorReduction
                | Self::Wound
        )
    }
}

impl StatusEffects {
    pub fn empty() -> Self {
        Self {
            conditions: ArrayVec::new(),
        }
    }

    /// Checks if a condition is active.
    pub fn has(&self, kind: StatusKind) -> bool {
        self.conditions.iter().any(|c| c.kind == kind)
    }

    /// Remaining time of a condition, `None` if inactive.
    pub fn remaining(&self, kind: StatusKind) -> Option<u32> {
        self.conditions
            .iter()
            .find(|c| c.kind == kind)
            .map(|c| c.remaining_ms)
    }

    /// Source of an active condition.
    pub fn source(&self, kind: StatusKind) -> Option<EntityId> {
        self.conditions
            .iter()
            .find(|c| c.kind == kind)
            .and_then(|c| c.source)
    }

    /// Frozen and sleeping combatants cannot act.
    pub fn can_act(&self) -> bool {
        !self.has(StatusKind::Freeze) && !self.has(StatusKind::Sleep)
    }

    /// Applies a condition for `duration_ms`.
    ///
    /// Returns false when the condition was refused: zero duration, rune
    /// protection against a harmful kind, or no free slot.
    pub fn trigger(&mut self, kind: StatusKind, duration_ms: u32, source: Option<EntityId>) -> bool {
        if duration_ms == 0 {
            return false;
        }
        if kind.is_harmful() && self.has(StatusKind::RuneProtect) {
            return false;
        }

        if let Some(existing) = self.conditions.iter_mut().find(|c| c.kind == kind) {
            existing.remaining_ms = existing.remaining_ms.max(duration_ms);
            existing.source = source.or(existing.source);
            return true;
        }

        self.conditions
            .try_push(StatusCondition {
                kind,
                remaining_ms: duration_ms,
                source,
            })
            .is_ok()
    }

    /// Decays every condition by `dt_ms` and drops the expired ones.
    ///
    /// Returns the kinds that expired during this tick.
    pub fn tick(&mut self, dt_ms: u32) -> ArrayVec<StatusKind, { BattleConfig::MAX_STATUS_CONDITIONS }> {
        let mut expired = ArrayVec::new();
        for condition in self.conditions.iter_mut() {
            condition.remaining_ms = condition.remaining_ms.saturating_sub(dt_ms);
            if condition.remaining_ms == 0 {
                expired.push(condition.kind);
            }
        }
        self.conditions.retain(|c| c.remaining_ms > 0);
        expired
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatusCondition> {
        self.conditions.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }
}
