/// Battle capacities and board defaults.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleConfig {
    /// Board width in cells.
    pub board_width: u32,
    /// Board height in cells.
    pub board_height: u32,
}

impl BattleConfig {
    // ===== compile-time constants used as type parameters =====
    pub const MAX_HELD_ITEMS: usize = 3;
    pub const MAX_STATUS_CONDITIONS: usize = 16;
    pub const MAX_ADJACENT_CELLS: usize = 8;
    /// One base strike plus the two bonus strikes of a successful proc.
    pub const MAX_STRIKES_PER_ATTEMPT: usize = 3;
    /// Largest board a scenario may declare.
    pub const MAX_BOARD_CELLS: usize = 4096;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_BOARD_WIDTH: u32 = 8;
    pub const DEFAULT_BOARD_HEIGHT: u32 = 6;

    pub fn new() -> Self {
        Self {
            board_width: Self::DEFAULT_BOARD_WIDTH,
            board_height: Self::DEFAULT_BOARD_HEIGHT,
        }
    }

    pub fn with_board_size(board_width: u32, board_height: u32) -> Self {
        Self {
            board_width,
            board_height,
        }
    }

    /// Number of cells of the configured board, `None` when the board is
    /// empty or larger than [`Self::MAX_BOARD_CELLS`].
    pub fn board_cells(&self) -> Option<usize> {
        let cells = (self.board_width as usize).checked_mul(self.board_height as usize)?;
        (1..=Self::MAX_BOARD_CELLS).contains(&cells).then_some(cells)
    }
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self::new()
    }
}
