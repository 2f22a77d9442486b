//! Deterministic combat resolution for a real-time autobattler.
//!
//! `battle-core` owns the rules: the board, combatants and their status
//! conditions, the behavior state machine and the attack pipeline. Given the
//! same scenario, tables and RNG draws it produces the same sequence of
//! state mutations, which it exposes as change marks and a replay log of
//! [`BattleEvent`]s. All time advances through [`engine::BattleEngine`].
pub mod combat;
pub mod config;
pub mod engine;
pub mod env;
pub mod error;
pub mod scenario;
pub mod state;

pub use combat::{AttackContext, AttackResolver, AttackStage, StrikeOutcome};
pub use config::BattleConfig;
pub use engine::{BattleEngine, BattleOutcome, BattleReport, nearest_target};
pub use env::{
    BattleEnv, BattleTables, Diagnostic, Diagnostics, PcgRng, RandomSource, RecordingDiagnostics,
    SequenceRng, TracingDiagnostics,
};
pub use error::{BattleError, ErrorSeverity};
pub use scenario::{CombatantSpec, Scenario, ScenarioError};
pub use state::{
    ActionState, BattleEvent, Battlefield, BehaviorState, Board, BoardError, Climate, CombatStats,
    Combatant, CombatantChange, CombatantFields, Counters, DamageCategory, DamageReport,
    EffectFamily, Effects, EntityId, HeldItems, Item, ItemError, Orientation, Position,
    SpawnError, SplashKind, StatusCondition, StatusEffects, StatusKind, Team, Tier,
};
