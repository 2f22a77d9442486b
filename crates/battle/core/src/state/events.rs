//! Replay log handed to the presentation layer.
//!
//! Events are appended in the exact order the mutations happen, so replaying
//! them reproduces the fight animation by animation.

use super::{BehaviorState, DamageCategory, EntityId, Orientation, Position, StatusKind};

/// Why splash damage was dealt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum SplashKind {
    /// Critical-burst effect around the holder.
    CritBurst,
    /// Static coil discharge.
    Static,
    /// Cleaving blade hit next to the target.
    Cleave,
}

/// One observable mutation.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "snake_case"))]
pub enum BattleEvent {
    StateChanged {
        id: EntityId,
        from: BehaviorState,
        to: BehaviorState,
    },
    Moved {
        id: EntityId,
        from: Position,
        to: Position,
    },
    AttackStarted {
        attacker: EntityId,
        target: Position,
        orientation: Orientation,
    },
    Damaged {
        target: EntityId,
        source: Option<EntityId>,
        category: DamageCategory,
        amount: u32,
        life_lost: u32,
        absorbed: u32,
        blocked: bool,
        life: u32,
    },
    Splash {
        source: EntityId,
        target: EntityId,
        kind: SplashKind,
    },
    Healed {
        target: EntityId,
        source: Option<EntityId>,
        amount: u32,
        life: u32,
    },
    ManaChanged {
        id: EntityId,
        mana: u32,
    },
    AttackSpeedChanged {
        id: EntityId,
        attack_speed: f64,
    },
    StatusApplied {
        target: EntityId,
        kind: StatusKind,
        duration_ms: u32,
        source: Option<EntityId>,
    },
    StatusExpired {
        id: EntityId,
        kind: StatusKind,
    },
    CriticalHit {
        attacker: EntityId,
        target: EntityId,
    },
    DoubleAttack {
        attacker: EntityId,
    },
    Died {
        id: EntityId,
        killer: Option<EntityId>,
    },
}
