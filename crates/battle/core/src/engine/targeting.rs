//! Nearest-enemy selection.

use crate::state::{Battlefield, Board, EntityId, Position};

/// Cell of the living enemy closest to `attacker` (Chebyshev distance).
///
/// The board is scanned in row-major order and only a strictly smaller
/// distance replaces the current pick, so ties go to the first cell scanned.
/// Reads state only.
pub fn nearest_target(field: &Battlefield, attacker: EntityId) -> Option<Position> {
    let unit = field.combatant(attacker)?;
    let mut best: Option<(u32, Position)> = None;

    for (position, _) in field.board().occupants() {
        let Some(candidate) = field.occupant(position) else {
            continue;
        };
        if candidate.team == unit.team {
            continue;
        }
        let distance = Board::distance(unit.position, position);
        if best.is_none_or(|(closest, _)| distance < closest) {
            best = Some((distance, position));
        }
    }

    best.map(|(_, position)| position)
}

/// Whether `target` is within the attack range of `attacker`.
pub fn in_range(field: &Battlefield, attacker: EntityId, target: Position) -> bool {
    field
        .combatant(attacker)
        .is_some_and(|c| Board::distance(c.position, target) <= c.stats.range)
}
