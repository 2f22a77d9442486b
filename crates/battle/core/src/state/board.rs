//! Grid occupancy and geometry queries.
//!
//! The board never owns combatants. Each cell holds at most one
//! [`EntityId`], which the [`Battlefield`](super::Battlefield) resolves
//! against its roster.

use arrayvec::ArrayVec;

use super::{EntityId, Orientation, Position};
use crate::config::BattleConfig;
use crate::error::{BattleError, ErrorSeverity};

/// A neighbouring cell and whoever stands on it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    pub position: Position,
    pub occupant: Option<EntityId>,
}

/// Neighbours of a cell, at most eight.
pub type AdjacentCells = ArrayVec<Cell, { BattleConfig::MAX_ADJACENT_CELLS }>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("position {0} is outside the board")]
    OutOfBounds(Position),

    #[error("position {position} is already occupied by {occupant}")]
    Occupied {
        position: Position,
        occupant: EntityId,
    },
}

impl BattleError for BoardError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::OutOfBounds(_) => ErrorSeverity::Validation,
            Self::Occupied { .. } => ErrorSeverity::Recoverable,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::OutOfBounds(_) => "BOARD_OUT_OF_BOUNDS",
            Self::Occupied { .. } => "BOARD_OCCUPIED",
        }
    }
}

/// Row-major occupancy grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    width: u32,
    height: u32,
    cells: Vec<Option<EntityId>>,
}

impl Board {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            cells: vec![None; (width as usize).saturating_mul(height as usize)],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn contains(&self, position: Position) -> bool {
        position.x >= 0
            && position.y >= 0
            && (position.x as u32) < self.width
            && (position.y as u32) < self.height
    }

    fn index(&self, position: Position) -> Option<usize> {
        self.contains(position)
            .then(|| position.y as usize * self.width as usize + position.x as usize)
    }

    /// Chebyshev distance; the same metric range checks use.
    pub fn distance(a: Position, b: Position) -> u32 {
        a.x.abs_diff(b.x).max(a.y.abs_diff(b.y))
    }

    /// Direction from `from` toward `to`, or `None` when both are the same cell.
    pub fn orientation(from: Position, to: Position) -> Option<Orientation> {
        let dx = to.x - from.x;
        let dy = to.y - from.y;
        let orientation = match (dx.signum(), dy.signum()) {
            (1, 1) => Orientation::UpRight,
            (1, 0) => Orientation::Right,
            (1, _) => Orientation::DownRight,
            (0, 1) => Orientation::Up,
            (0, 0) => return None,
            (0, _) => Orientation::Down,
            (_, 1) => Orientation::UpLeft,
            (_, 0) => Orientation::Left,
            _ => Orientation::DownLeft,
        };
        Some(orientation)
    }

    /// Occupant of a cell; `None` for empty or out-of-bounds cells.
    pub fn get(&self, position: Position) -> Option<EntityId> {
        self.index(position).and_then(|i| self.cells[i])
    }

    /// In-bounds neighbours of `position`, x outer then y inner.
    pub fn adjacent_cells(&self, position: Position) -> AdjacentCells {
        let mut cells = AdjacentCells::new();
        for x in position.x - 1..=position.x + 1 {
            for y in position.y - 1..=position.y + 1 {
                let neighbour = Position::new(x, y);
                if neighbour == position || !self.contains(neighbour) {
                    continue;
                }
                cells.push(Cell {
                    position: neighbour,
                    occupant: self.get(neighbour),
                });
            }
        }
        cells
    }

    /// Every cell in row-major scan order.
    pub fn iter(&self) -> impl Iterator<Item = (Position, Option<EntityId>)> + '_ {
        let width = self.width as usize;
        self.cells.iter().enumerate().map(move |(i, occupant)| {
            (
                Position::new((i % width) as i32, (i / width) as i32),
                *occupant,
            )
        })
    }

    /// Occupied cells in row-major scan order.
    pub fn occupants(&self) -> impl Iterator<Item = (Position, EntityId)> + '_ {
        self.iter()
            .filter_map(|(position, occupant)| occupant.map(|id| (position, id)))
    }

    pub fn place(&mut self, id: EntityId, position: Position) -> Result<(), BoardError> {
        let index = self
            .index(position)
            .ok_or(BoardError::OutOfBounds(position))?;
        if let Some(occupant) = self.cells[index] {
            return Err(BoardError::Occupied { position, occupant });
        }
        self.cells[index] = Some(id);
        Ok(())
    }

    /// Clears a cell, returning its previous occupant.
    pub fn remove(&mut self, position: Position) -> Option<EntityId> {
        self.index(position).and_then(|i| self.cells[i].take())
    }

    /// Moves the occupant of `from` onto the free cell `to`.
    pub fn move_occupant(&mut self, from: Position, to: Position) -> Result<(), BoardError> {
        let to_index = self.index(to).ok_or(BoardError::OutOfBounds(to))?;
        if let Some(occupant) = self.cells[to_index] {
            return Err(BoardError::Occupied {
                position: to,
                occupant,
            });
        }
        let from_index = self.index(from).ok_or(BoardError::OutOfBounds(from))?;
        self.cells[to_index] = self.cells[from_index].take();
        Ok(())
    }
}
