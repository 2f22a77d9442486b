//! Effect tags granted to a combatant (synergy buffs and debuffs).
//!
//! Some tags form *graded families*: escalating tiers of one mechanic. A
//! combatant may carry several tiers of a family at once, but only the
//! strongest one counts. [`Effects::highest_tier`] is the single way to read
//! a graded family, so tiers can never be summed by accident.
//!
//! The remaining tags belong to additive families, where every held member
//! contributes (e.g. [`Effects::CHILL`] and [`Effects::DEEP_FREEZE`] both add
//! freeze chance).

use bitflags::bitflags;

bitflags! {
    /// Effect tags held by a combatant.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    #[cfg_attr(feature = "serde", serde(transparent))]
    pub struct Effects: u32 {
        // Bonus-attack family (graded)
        const FLURRY_I      = 1 << 0;
        const FLURRY_II     = 1 << 1;
        const FLURRY_III    = 1 << 2;

        // Critical splash family (graded)
        const CRIT_BURST_I   = 1 << 3;
        const CRIT_BURST_II  = 1 << 4;
        const CRIT_BURST_III = 1 << 5;

        // Freeze chance under snow (additive)
        const CHILL         = 1 << 6;
        const DEEP_FREEZE   = 1 << 7;

        // Poison chance (additive)
        const VENOM         = 1 << 8;
        const TOXIN         = 1 << 9;

        // Silence on hit (either one)
        const HEX           = 1 << 10;
        const HAUNT         = 1 << 11;

        // Mana on hit (additive)
        const VENGEANCE     = 1 << 12;
        const RETRIBUTION   = 1 << 13;
    }
}

/// A graded family of effects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum EffectFamily {
    /// Chance to strike twice more after an attack.
    BonusAttack,
    /// Splash damage around the holder on critical hits.
    CritBurst,
}

impl EffectFamily {
    /// Tier flags, strongest first.
    const fn tiers(self) -> [(Tier, Effects); 3] {
        match self {
            Self::BonusAttack => [
                (Tier::High, Effects::FLURRY_III),
                (Tier::Mid, Effects::FLURRY_II),
                (Tier::Low, Effects::FLURRY_I),
            ],
            Self::CritBurst => [
                (Tier::High, Effects::CRIT_BURST_III),
                (Tier::Mid, Effects::CRIT_BURST_II),
                (Tier::Low, Effects::CRIT_BURST_I),
            ],
        }
    }
}

/// Strength of a graded effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Tier {
    Low,
    Mid,
    High,
}

impl Effects {
    /// Strongest tier of `family` held, if any.
    pub fn highest_tier(&self, family: EffectFamily) -> Option<Tier> {
        family
            .tiers()
            .into_iter()
            .find(|(_, flag)| self.contains(*flag))
            .map(|(tier, _)| tier)
    }

    /// True when the holder silences on hit.
    pub fn silences(&self) -> bool {
        self.intersects(Self::HEX | Self::HAUNT)
    }
}
