//! Placement zones.
//!
//! Each side sets up in the rows along its own edge. Rows inside a zone are
//! addressed by depth: depth 0 is the back row, the deepest depth is the
//! frontier facing the enemy.

use crate::board::{Cell, Side};
use crate::config::GameConfig;

/// The rows one side may place into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Zone {
    pub side: Side,
    pub size: i32,
    pub depth: i32,
}

impl Zone {
    pub const fn new(side: Side, size: i32, depth: i32) -> Self {
        Zone { side, size, depth }
    }

    pub fn for_config(side: Side, config: &GameConfig) -> Self {
        Zone::new(side, config.board_size, config.zone_depth)
    }

    /// Board row of the given depth.
    pub const fn row(&self, depth: i32) -> i32 {
        match self.side {
            Side::Side1 => depth,
            Side::Side2 => self.size - 1 - depth,
        }
    }

    /// Depth of a board row (may fall outside the zone).
    pub const fn depth_of(&self, cell: Cell) -> i32 {
        match self.side {
            Side::Side1 => cell.z,
            Side::Side2 => self.size - 1 - cell.z,
        }
    }

    /// Depth of the row facing the enemy.
    pub const fn frontier(&self) -> i32 {
        self.depth - 1
    }

    pub fn contains(&self, cell: Cell) -> bool {
        (0..self.size).contains(&cell.x) && (0..self.depth).contains(&self.depth_of(cell))
    }

    /// Cells at the given depths restricted to the given columns, in the
    /// order the depths are listed, then by column.
    pub fn cells(&self, depths: impl IntoIterator<Item = i32>, columns: &[i32]) -> Vec<Cell> {
        let mut cells = Vec::new();
        for depth in depths {
            if !(0..self.depth).contains(&depth) {
                continue;
            }
            let z = self.row(depth);
            cells.extend(
                columns
                    .iter()
                    .filter(|x| (0..self.size).contains(*x))
                    .map(|&x| Cell::new(x, z)),
            );
        }
        cells
    }

    /// Every column index.
    pub fn all_columns(&self) -> Vec<i32> {
        (0..self.size).collect()
    }

    /// `width` columns centered on the board.
    pub fn central_columns(&self, width: i32) -> Vec<i32> {
        let start = (self.size - width).max(0) / 2;
        (start..(start + width).min(self.size)).collect()
    }

    /// Every cell of the zone, back row first.
    pub fn all_cells(&self) -> Vec<Cell> {
        self.cells(0..self.depth, &self.all_columns())
    }
}
