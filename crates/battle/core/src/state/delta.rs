use bitflags::bitflags;

use super::EntityId;

bitflags! {
    /// Tracks which observable fields of a [`Combatant`](super::Combatant)
    /// changed since the presentation layer last looked.
    ///
    /// Each bit represents one group of fields. Marks are set by every
    /// mutation and cleared by [`Battlefield::drain_changes`](super::Battlefield::drain_changes).
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    #[cfg_attr(feature = "serde", serde(transparent))]
    pub struct CombatantFields: u16 {
        const POSITION    = 1 << 0;
        const ORIENTATION = 1 << 1;
        const ACTION      = 1 << 2;
        const LIFE        = 1 << 3;
        const MANA        = 1 << 4;
        /// Attack speed, shield and other stat values.
        const STATS       = 1 << 5;
        const COUNTERS    = 1 << 6;
        const STATUS      = 1 << 7;
        const TARGET      = 1 << 8;
    }
}

/// Changed fields of one combatant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatantChange {
    pub id: EntityId,
    pub fields: CombatantFields,
}
