//! Balance tables: every duration, chance and flat amount the combat core
//! reads. Treated as immutable input; loaders fill them from TOML.

use crate::state::Tier;

/// Complete set of balance tables.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BattleTables {
    /// Proc chance of the bonus-attack family, per tier.
    pub bonus_attack: TierTable<f64>,
    /// Splash damage of the critical-burst family, per tier.
    pub crit_burst: TierTable<u32>,
    pub freeze: FreezeTable,
    pub poison: PoisonTable,
    pub silence: SilenceTable,
    pub mana_on_hit: ManaOnHitTable,
    pub items: ItemTable,
    pub speed: SpeedTable,
    pub movement: MovementTable,
    pub defense: DefenseRules,
}

/// One value per tier of a graded family.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TierTable<T> {
    pub low: T,
    pub mid: T,
    pub high: T,
}

impl<T: Copy> TierTable<T> {
    pub const fn new(low: T, mid: T, high: T) -> Self {
        Self { low, mid, high }
    }

    pub fn get(&self, tier: Tier) -> T {
        match tier {
            Tier::Low => self.low,
            Tier::Mid => self.mid,
            Tier::High => self.high,
        }
    }
}

impl Default for TierTable<f64> {
    fn default() -> Self {
        Self::new(0.2, 0.4, 0.6)
    }
}

impl Default for TierTable<u32> {
    fn default() -> Self {
        Self::new(15, 30, 60)
    }
}

/// Freeze procs under snow. Chances of both tags add up.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FreezeTable {
    pub chill_chance: f64,
    pub deep_freeze_chance: f64,
    pub duration_ms: u32,
}

impl Default for FreezeTable {
    fn default() -> Self {
        Self {
            chill_chance: 0.1,
            deep_freeze_chance: 0.3,
            duration_ms: 2000,
        }
    }
}

/// Poison procs. Chances of both tags add up.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PoisonTable {
    pub venom_chance: f64,
    pub toxin_chance: f64,
    pub duration_ms: u32,
}

impl Default for PoisonTable {
    fn default() -> Self {
        Self {
            venom_chance: 0.1,
            toxin_chance: 0.3,
            duration_ms: 2000,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SilenceTable {
    pub duration_ms: u32,
}

impl Default for SilenceTable {
    fn default() -> Self {
        Self { duration_ms: 3000 }
    }
}

/// Flat mana the attacker gains per attack. Both tags stack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ManaOnHitTable {
    pub vengeance: u32,
    pub retribution: u32,
}

impl Default for ManaOnHitTable {
    fn default() -> Self {
        Self {
            vengeance: 5,
            retribution: 15,
        }
    }
}

/// Held item magnitudes.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ItemTable {
    /// Attack speed percent gained on every attack.
    pub accelerator_speed_percent: f64,
    /// Static charge that must be exceeded before the coil discharges.
    pub static_threshold: u32,
    pub static_damage: u32,
    pub smoke_duration_ms: u32,
    pub armor_reduction_duration_ms: u32,
    /// Fraction of the hit copied onto the cleave victim (rounded up).
    pub cleave_ratio: f64,
    pub leftovers_heal: u32,
    pub mana_charm_mana: u32,
}

impl Default for ItemTable {
    fn default() -> Self {
        Self {
            accelerator_speed_percent: 6.0,
            static_threshold: 3,
            static_damage: 8,
            smoke_duration_ms: 5000,
            armor_reduction_duration_ms: 5000,
            cleave_ratio: 0.75,
            leftovers_heal: 3,
            mana_charm_mana: 8,
        }
    }
}

/// Attack speed bounds, in attacks per second.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SpeedTable {
    pub min_attack_speed: f64,
    pub max_attack_speed: f64,
}

impl Default for SpeedTable {
    fn default() -> Self {
        Self {
            min_attack_speed: 0.4,
            max_attack_speed: 2.5,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MovementTable {
    /// Time between two steps of a moving combatant.
    pub move_delay_ms: u32,
}

impl Default for MovementTable {
    fn default() -> Self {
        Self { move_delay_ms: 500 }
    }
}

/// Mitigation applied by [`Combatant::handle_damage`](crate::state::Combatant::handle_damage).
///
/// `reduced = round(amount / (1 + armor_factor * defense))`
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DefenseRules {
    pub armor_factor: f64,
}

impl Default for DefenseRules {
    fn default() -> Self {
        Self { armor_factor: 0.1 }
    }
}
