//! Non-fatal anomaly reporting.
//!
//! The simulation never prints. Degenerate situations it can recover from
//! are handed to an injected [`Diagnostics`] collaborator.

use std::cell::RefCell;

use crate::state::{EntityId, Position};

/// A recoverable anomaly observed during resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Diagnostic {
    /// Attacker and target share a cell, so no facing could be derived.
    /// The fallback orientation was used.
    UnclearOrientation {
        attacker: EntityId,
        position: Position,
    },
}

/// Receiver of [`Diagnostic`]s.
pub trait Diagnostics {
    fn report(&self, diagnostic: Diagnostic);
}

/// Forwards diagnostics to `tracing` at WARN level.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn report(&self, diagnostic: Diagnostic) {
        match diagnostic {
            Diagnostic::UnclearOrientation { attacker, position } => {
                tracing::warn!(
                    %attacker,
                    %position,
                    "unclear orientation while attacking, using fallback"
                );
            }
        }
    }
}

/// Keeps every diagnostic in memory.
#[derive(Debug, Default)]
pub struct RecordingDiagnostics {
    reports: RefCell<Vec<Diagnostic>>,
}

impl RecordingDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reports(&self) -> Vec<Diagnostic> {
        self.reports.borrow().clone()
    }
}

impl Diagnostics for RecordingDiagnostics {
    fn report(&self, diagnostic: Diagnostic) {
        self.reports.borrow_mut().push(diagnostic);
    }
}
