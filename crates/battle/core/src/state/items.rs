//! Items held by combatants.

use arrayvec::ArrayVec;

use crate::config::BattleConfig;
use crate::error::{BattleError, ErrorSeverity};

/// Kinds of held items the combat core reacts to.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Item {
    /// Raises the holder's attack speed on every attack.
    Accelerator,
    /// Incoming attacks cannot be critical.
    CritShield,
    /// Builds static charge; every fourth attack shocks all enemies.
    StaticCoil,
    /// Attackers of the holder are engulfed in smoke.
    SmokeBomb,
    /// Hits reduce the target's armor.
    ArmorPiercer,
    /// Hits cleave into one enemy next to the target.
    CleavingBlade,
    /// Each attack heals the holder and adjacent allies.
    Leftovers,
    /// Each attack restores mana.
    ManaCharm,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ItemError {
    #[error("item {0} is already held")]
    Duplicate(Item),

    #[error("cannot hold more than {max} items", max = BattleConfig::MAX_HELD_ITEMS)]
    Full,
}

impl BattleError for ItemError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Duplicate(_) => "ITEM_DUPLICATE",
            Self::Full => "ITEM_FULL",
        }
    }
}

/// Set of held items, unique by kind.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HeldItems {
    items: ArrayVec<Item, { BattleConfig::MAX_HELD_ITEMS }>,
}

impl HeldItems {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has(&self, item: Item) -> bool {
        self.items.contains(&item)
    }

    pub fn equip(&mut self, item: Item) -> Result<(), ItemError> {
        if self.has(item) {
            return Err(ItemError::Duplicate(item));
        }
        self.items.try_push(item).map_err(|_| ItemError::Full)
    }

    /// Removes an item; returns whether it was held.
    pub fn unequip(&mut self, item: Item) -> bool {
        let before = self.items.len();
        self.items.retain(|held| *held != item);
        self.items.len() != before
    }

    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl TryFrom<&[Item]> for HeldItems {
    type Error = ItemError;

    fn try_from(items: &[Item]) -> Result<Self, Self::Error> {
        let mut held = Self::new();
        for item in items {
            held.equip(*item)?;
        }
        Ok(held)
    }
}
