//! Manual placement: one unit at a time, validated against zone and reserve.

use crate::board::{BoardState, Cell, PieceType, Side};
use crate::config::GameConfig;

use super::{PlacementCore, PlacementError, PlacementReport, PlacementStrategy, Placed};

/// Places units exactly where the caller asks, if the rules allow it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManualPlacement {
    core: PlacementCore,
}

impl ManualPlacement {
    pub fn new(side: Side, config: &GameConfig) -> Self {
        ManualPlacement {
            core: PlacementCore::new(side, config),
        }
    }

    pub fn zone(&self) -> &super::Zone {
        &self.core.zone
    }
}

impl PlacementStrategy for ManualPlacement {
    fn side(&self) -> Side {
        self.core.side()
    }

    fn initialize(&mut self, board: &mut BoardState, mountain_count: u32) -> PlacementReport {
        self.core.reset(board, mountain_count);
        let mut report = PlacementReport::new(self.side());
        report.unplaced = self.core.unplaced();
        report
    }

    fn can_place(&self, board: &BoardState, kind: PieceType, cell: Cell) -> bool {
        self.core.can_place(board, kind, cell)
    }

    fn place(&mut self, board: &mut BoardState, kind: PieceType, cell: Cell) -> Result<Placed, PlacementError> {
        let placed = self.core.place(board, kind, cell)?;
        tracing::debug!(side = %self.side(), kind = %kind, cell = %cell, "manual placement");
        Ok(placed)
    }

    fn remove(&mut self, board: &mut BoardState, cell: Cell) -> Result<Option<PieceType>, PlacementError> {
        self.core.remove(board, cell)
    }

    fn move_piece(&mut self, board: &mut BoardState, from: Cell, to: Cell) -> Result<(), PlacementError> {
        self.core.move_piece(board, from, to)
    }

    fn remaining_count(&self, kind: PieceType) -> u32 {
        self.core.reserve.remaining(kind)
    }

    fn has_completed_placement(&self) -> bool {
        self.core.reserve.is_empty()
    }

    fn is_king_placed(&self, board: &BoardState) -> bool {
        self.core.is_king_placed(board)
    }
}
