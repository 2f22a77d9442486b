//! Damage formulas and proc rolls.
//!
//! Each roll takes an already-drawn value in `[0, 1)` so the draw order
//! stays under the caller's control. Note the conventions differ per roll
//! and must be kept as they are: freeze succeeds when `draw > 1 - chance`,
//! poison when `draw > chance`, critical and bonus attack when the draw is
//! below the chance.

/// Critical check on the 0-100 crit chance scale.
///
/// A target immune to critical hits never takes one.
pub fn is_critical(draw: f64, crit_chance: f64, target_immune: bool) -> bool {
    draw * 100.0 < crit_chance && !target_immune
}

/// Critical damage: `attack * multiplier`, rounded half away from zero.
pub fn critical_damage(attack: u32, multiplier: f64) -> u32 {
    (f64::from(attack) * multiplier).round() as u32
}

/// Share of a hit copied onto a cleave victim, rounded up.
pub fn cleave_damage(damage: u32, ratio: f64) -> u32 {
    (f64::from(damage) * ratio).ceil() as u32
}

/// Freeze lands when the draw is above `1 - chance`.
pub fn freeze_procs(draw: f64, chance: f64) -> bool {
    draw > 1.0 - chance
}

/// Poison lands when the draw is *above* the accumulated chance.
pub fn poison_procs(draw: f64, chance: f64) -> bool {
    draw > chance
}

/// Bonus attack lands when the draw is below the tier chance.
pub fn bonus_attack_procs(draw: f64, chance: f64) -> bool {
    draw < chance
}
