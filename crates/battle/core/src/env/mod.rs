//! Read-only inputs of a battle.
//!
//! Balance tables, the ambient climate and the diagnostics sink never change
//! during resolution. [`BattleEnv`] bundles them so the engine and the
//! resolver can reach everything without owning it. The RNG stream is
//! mutable and travels separately.
mod diagnostics;
mod rng;
mod tables;

pub use diagnostics::{Diagnostic, Diagnostics, RecordingDiagnostics, TracingDiagnostics};
pub use rng::{PcgRng, RandomSource, SequenceRng};
pub use tables::{
    BattleTables, DefenseRules, FreezeTable, ItemTable, ManaOnHitTable, MovementTable,
    PoisonTable, SilenceTable, SpeedTable, TierTable,
};

use crate::state::Climate;

static TRACING_DIAGNOSTICS: TracingDiagnostics = TracingDiagnostics;

/// Aggregates the read-only inputs required by the engine and the resolver.
#[derive(Clone, Copy)]
pub struct BattleEnv<'a> {
    tables: &'a BattleTables,
    diagnostics: &'a dyn Diagnostics,
    climate: Climate,
}

impl<'a> BattleEnv<'a> {
    /// Environment reporting diagnostics through `tracing`.
    pub fn new(tables: &'a BattleTables, climate: Climate) -> Self {
        Self {
            tables,
            diagnostics: &TRACING_DIAGNOSTICS,
            climate,
        }
    }

    pub fn with_diagnostics(mut self, diagnostics: &'a dyn Diagnostics) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    pub fn tables(&self) -> &'a BattleTables {
        self.tables
    }

    pub fn diagnostics(&self) -> &'a dyn Diagnostics {
        self.diagnostics
    }

    pub fn climate(&self) -> Climate {
        self.climate
    }
}

impl core::fmt::Debug for BattleEnv<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BattleEnv")
            .field("tables", self.tables)
            .field("climate", &self.climate)
            .finish_non_exhaustive()
    }
}
