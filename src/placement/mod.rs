//! Pre-game army placement.
//!
//! Two interchangeable strategies seat a side's army inside its zone:
//! `ManualPlacement` validates and applies single placements, while
//! `AutomaticPlacement` runs a constrained greedy layout for the whole army.
//! Both keep the side's reserve in step with the board.

pub mod automatic;
pub mod manual;
pub mod reserve;
pub mod zone;

pub use automatic::AutomaticPlacement;
pub use manual::ManualPlacement;
pub use reserve::Reserve;
pub use zone::Zone;

use std::collections::BTreeMap;

use serde::Serialize;

use crate::board::{BoardError, BoardState, Cell, PieceId, PieceType, Side};
use crate::config::GameConfig;

/// Errors raised by placement operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlacementError {
    #[error("{side} may not place at {cell}: outside its zone")]
    Zone { side: Side, cell: Cell },

    #[error("no {0} left in reserve")]
    Exhausted(PieceType),

    #[error("cell {0} does not hold one of this side's units")]
    NotOwned(Cell),

    #[error("placement is closed once play has started")]
    WrongPhase,

    #[error(transparent)]
    Board(#[from] BoardError),
}

/// What a successful placement put on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placed {
    Piece(PieceId),
    Mountain(Cell),
}

/// Summary of a placement run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlacementReport {
    pub side: Side,
    /// Units on the board, in placement order.
    pub placed: Vec<(PieceType, Cell)>,
    pub mountains: Vec<Cell>,
    /// Requested mountains that found no eligible cell.
    pub mountains_skipped: u32,
    /// Occupants cleared by forced placements.
    pub evictions: u32,
    /// Units still in the reserve.
    pub unplaced: BTreeMap<PieceType, u32>,
}

impl PlacementReport {
    pub fn new(side: Side) -> Self {
        PlacementReport {
            side,
            placed: Vec::new(),
            mountains: Vec::new(),
            mountains_skipped: 0,
            evictions: 0,
            unplaced: BTreeMap::new(),
        }
    }

    /// Number of units that could not be seated.
    pub fn unplaced_count(&self) -> u32 {
        self.unplaced.values().sum()
    }

    pub fn is_complete(&self) -> bool {
        self.unplaced.is_empty()
    }
}

/// Operations shared by every placement strategy.
pub trait PlacementStrategy {
    fn side(&self) -> Side;

    /// Clears this side's setup and refills its reserve with `mountain_count`
    /// mountains (capped). Automatic strategies then lay out the whole army.
    fn initialize(&mut self, board: &mut BoardState, mountain_count: u32) -> PlacementReport;

    /// Returns true if `kind` could be placed on `cell` right now.
    fn can_place(&self, board: &BoardState, kind: PieceType, cell: Cell) -> bool;

    /// Places one unit from the reserve.
    fn place(&mut self, board: &mut BoardState, kind: PieceType, cell: Cell) -> Result<Placed, PlacementError>;

    /// Returns the unit on `cell` to the reserve. Empty cells are a no-op.
    fn remove(&mut self, board: &mut BoardState, cell: Cell) -> Result<Option<PieceType>, PlacementError>;

    /// Moves an already placed unit within the zone.
    fn move_piece(&mut self, board: &mut BoardState, from: Cell, to: Cell) -> Result<(), PlacementError>;

    fn remaining_count(&self, kind: PieceType) -> u32;

    fn has_completed_placement(&self) -> bool;

    fn is_king_placed(&self, board: &BoardState) -> bool;
}

/// Zone and reserve bookkeeping common to both strategies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacementCore {
    pub zone: Zone,
    pub reserve: Reserve,
    army: BTreeMap<PieceType, u32>,
    max_mountains: u32,
}

impl PlacementCore {
    pub fn new(side: Side, config: &GameConfig) -> Self {
        PlacementCore {
            zone: Zone::for_config(side, config),
            reserve: Reserve::new(&config.army, 0),
            army: config.army.clone(),
            max_mountains: config.max_mountains,
        }
    }

    pub fn side(&self) -> Side {
        self.zone.side
    }

    /// Clears this side's units and mountains from its zone and refills the
    /// reserve.
    pub fn reset(&mut self, board: &mut BoardState, mountain_count: u32) {
        for cell in self.zone.all_cells() {
            if board.piece_at(cell).is_some_and(|p| p.owner == self.side()) {
                board.remove(cell);
            }
            board.remove_mountain(cell);
        }
        let mountains = mountain_count.min(self.max_mountains);
        self.reserve = Reserve::new(&self.army, mountains);
    }

    fn check_zone(&self, cell: Cell) -> Result<(), PlacementError> {
        if self.zone.contains(cell) {
            Ok(())
        } else {
            Err(PlacementError::Zone {
                side: self.side(),
                cell,
            })
        }
    }

    pub fn can_place(&self, board: &BoardState, kind: PieceType, cell: Cell) -> bool {
        self.zone.contains(cell)
            && board.is_within_bounds(cell)
            && !board.is_blocked(cell)
            && self.reserve.remaining(kind) > 0
    }

    /// Places a unit and takes it from the reserve; both happen or neither.
    pub fn place(&mut self, board: &mut BoardState, kind: PieceType, cell: Cell) -> Result<Placed, PlacementError> {
        self.check_zone(cell)?;
        if self.reserve.remaining(kind) == 0 {
            return Err(PlacementError::Exhausted(kind));
        }
        let placed = if kind.is_terrain() {
            board.place_mountain(cell)?;
            Placed::Mountain(cell)
        } else {
            Placed::Piece(board.spawn(self.side(), kind, cell)?)
        };
        self.reserve.take(kind)?;
        Ok(placed)
    }

    pub fn remove(&mut self, board: &mut BoardState, cell: Cell) -> Result<Option<PieceType>, PlacementError> {
        self.check_zone(cell)?;
        if board.is_mountain(cell) {
            board.remove_mountain(cell);
            self.reserve.give_back(PieceType::Mountain);
            return Ok(Some(PieceType::Mountain));
        }
        match board.piece_at(cell).map(|p| p.owner) {
            None => Ok(None),
            Some(owner) if owner != self.side() => Err(PlacementError::NotOwned(cell)),
            Some(_) => {
                let piece = board.remove(cell).ok_or(PlacementError::NotOwned(cell))?;
                self.reserve.give_back(piece.kind);
                Ok(Some(piece.kind))
            }
        }
    }

    pub fn move_piece(&mut self, board: &mut BoardState, from: Cell, to: Cell) -> Result<(), PlacementError> {
        self.check_zone(from)?;
        self.check_zone(to)?;
        if from == to {
            return Ok(());
        }
        if board.is_blocked(to) {
            return Err(BoardError::Occupied(to).into());
        }
        if board.is_mountain(from) {
            board.remove_mountain(from);
            board.place_mountain(to)?;
            return Ok(());
        }
        let id = board
            .piece_at(from)
            .filter(|p| p.owner == self.side())
            .map(|p| p.id)
            .ok_or(PlacementError::NotOwned(from))?;
        board.place(id, to)?;
        Ok(())
    }

    pub fn is_king_placed(&self, board: &BoardState) -> bool {
        board
            .pieces_of(self.side())
            .iter()
            .any(|p| p.kind == PieceType::King)
    }

    /// Snapshot of what is left in the reserve.
    pub fn unplaced(&self) -> BTreeMap<PieceType, u32> {
        self.reserve.counts().clone()
    }
}
