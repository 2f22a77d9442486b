//! Match setup: board size, climate, RNG seed and the two squads.
//!
//! A [`Scenario`] is plain data (loaders read it from RON). [`Scenario::build`]
//! validates it and produces the starting [`Battlefield`].

use crate::config::BattleConfig;
use crate::error::{BattleError, ErrorSeverity};
use crate::state::{
    Battlefield, Climate, CombatStats, Combatant, Effects, EntityId, HeldItems, Item, ItemError,
    Position, SpawnError, Team,
};

/// Starting description of one combatant.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatantSpec {
    pub id: EntityId,
    pub team: Team,
    pub position: Position,
    #[cfg_attr(feature = "serde", serde(default))]
    pub stats: CombatStats,
    #[cfg_attr(feature = "serde", serde(default))]
    pub items: Vec<Item>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub effects: Effects,
    #[cfg_attr(feature = "serde", serde(default))]
    pub mana: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub shield: u32,
}

impl CombatantSpec {
    pub fn new(id: u32, team: Team, position: Position) -> Self {
        Self {
            id: EntityId(id),
            team,
            position,
            stats: CombatStats::default(),
            items: Vec::new(),
            effects: Effects::empty(),
            mana: 0,
            shield: 0,
        }
    }

    fn validate(&self) -> Result<(), ScenarioError> {
        let stats = &self.stats;
        let reason = if stats.max_life == 0 {
            Some("max_life must be positive")
        } else if !(stats.attack_speed.is_finite() && stats.attack_speed > 0.0) {
            Some("attack_speed must be positive")
        } else if !(0.0..=100.0).contains(&stats.crit_chance) {
            Some("crit_chance must be within 0..=100")
        } else if stats.crit_damage.is_nan() || stats.crit_damage < 1.0 {
            Some("crit_damage must be at least 1.0")
        } else {
            None
        };
        match reason {
            Some(reason) => Err(ScenarioError::InvalidStats { id: self.id, reason }),
            None => Ok(()),
        }
    }

    fn to_combatant(&self) -> Result<Combatant, ScenarioError> {
        self.validate()?;
        let items = HeldItems::try_from(self.items.as_slice())
            .map_err(|source| ScenarioError::Item { id: self.id, source })?;

        Ok(Combatant::new(self.id, self.team, self.position, self.stats)
            .with_items(items)
            .with_effects(self.effects)
            .with_mana(self.mana)
            .with_shield(self.shield))
    }
}

/// Complete setup of a match.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Scenario {
    pub board: BattleConfig,
    pub climate: Climate,
    /// Seed of the match RNG stream.
    pub seed: u64,
    pub combatants: Vec<CombatantSpec>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ScenarioError {
    #[error(transparent)]
    Spawn(#[from] SpawnError),

    #[error("combatant {id}: {source}")]
    Item { id: EntityId, source: ItemError },

    #[error("combatant {id}: {reason}")]
    InvalidStats { id: EntityId, reason: &'static str },

    #[error(
        "board {width}x{height} must have between 1 and {max} cells",
        max = BattleConfig::MAX_BOARD_CELLS
    )]
    InvalidBoard { width: u32, height: u32 },
}

impl BattleError for ScenarioError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Spawn(err) => err.severity(),
            Self::Item { source, .. } => source.severity(),
            Self::InvalidStats { .. } | Self::InvalidBoard { .. } => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Spawn(err) => err.error_code(),
            Self::Item { source, .. } => source.error_code(),
            Self::InvalidStats { .. } => "SCENARIO_INVALID_STATS",
            Self::InvalidBoard { .. } => "SCENARIO_INVALID_BOARD",
        }
    }
}

impl Scenario {
    pub fn new(board: BattleConfig, climate: Climate) -> Self {
        Self {
            board,
            climate,
            seed: 0,
            combatants: Vec::new(),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_combatant(mut self, spec: CombatantSpec) -> Self {
        self.combatants.push(spec);
        self
    }

    /// Validates the setup and places every combatant on a fresh battlefield.
    pub fn build(&self) -> Result<Battlefield, ScenarioError> {
        if self.board.board_cells().is_none() {
            return Err(ScenarioError::InvalidBoard {
                width: self.board.board_width,
                height: self.board.board_height,
            });
        }
        let mut field = Battlefield::from_config(&self.board);
        for spec in &self.combatants {
            field.spawn(spec.to_combatant()?)?;
        }
        tracing::debug!(
            combatants = self.combatants.len(),
            climate = %self.climate,
            "scenario built"
        );
        Ok(field)
    }
}
