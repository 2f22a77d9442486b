//! Attack resolution.
//!
//! - `damage`: pure formulas and proc rolls
//! - `resolver`: the ordered stage pipeline of a single attack

pub mod damage;
pub mod resolver;

pub use damage::{
    bonus_attack_procs, cleave_damage, critical_damage, freeze_procs, is_critical, poison_procs,
};
pub use resolver::{AttackContext, AttackResolver, AttackStage, StrikeOutcome};
