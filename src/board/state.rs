//! Board state representation.
//!
//! Owns the grid: which piece stands on which cell, which cells are
//! mountains, and the registry of live pieces. A piece's position is only
//! ever changed through the operations here, so the registry and the
//! occupancy map never disagree.

use std::collections::{HashMap, HashSet};

use super::cell::Cell;
use super::piece::{Piece, PieceId, PieceType, Side};
use crate::config::ConfigError;

/// Errors raised by board mutations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("cell {0} is outside the board")]
    OutOfBounds(Cell),

    #[error("cell {0} is already occupied")]
    Occupied(Cell),

    #[error("cell {0} is a mountain")]
    Blocked(Cell),

    #[error("piece {piece} is not at {cell}")]
    NotFound { piece: PieceId, cell: Cell },

    #[error("no live piece with id {0}")]
    UnknownPiece(PieceId),

    #[error("mountains are terrain, not pieces")]
    Terrain,
}

/// Whatever a forced placement cleared off a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Evicted {
    Piece(Piece),
    Mountain(Cell),
}

/// The board: a square grid with piece and mountain layers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardState {
    size: i32,
    occupants: HashMap<Cell, PieceId>,
    mountains: HashSet<Cell>,
    pieces: HashMap<PieceId, Piece>,
    next_id: u32,
}

impl BoardState {
    /// Creates an empty size×size board.
    pub fn new(size: i32) -> Result<Self, ConfigError> {
        let mut board = BoardState {
            size: 0,
            occupants: HashMap::new(),
            mountains: HashSet::new(),
            pieces: HashMap::new(),
            next_id: 1,
        };
        board.initialize(size)?;
        Ok(board)
    }

    /// Resets to an empty size×size board. Piece ids keep counting up.
    pub fn initialize(&mut self, size: i32) -> Result<(), ConfigError> {
        if size <= 0 {
            return Err(ConfigError::InvalidBoardSize(size));
        }
        self.size = size;
        self.occupants.clear();
        self.mountains.clear();
        self.pieces.clear();
        Ok(())
    }

    pub fn size(&self) -> i32 {
        self.size
    }

    pub fn is_within_bounds(&self, cell: Cell) -> bool {
        (0..self.size).contains(&cell.x) && (0..self.size).contains(&cell.z)
    }

    pub fn is_occupied(&self, cell: Cell) -> bool {
        self.occupants.contains_key(&cell)
    }

    pub fn is_mountain(&self, cell: Cell) -> bool {
        self.mountains.contains(&cell)
    }

    /// A cell is blocked iff it holds a piece or a mountain.
    pub fn is_blocked(&self, cell: Cell) -> bool {
        self.is_occupied(cell) || self.is_mountain(cell)
    }

    /// Returns the piece standing on `cell`, if any.
    pub fn piece_at(&self, cell: Cell) -> Option<&Piece> {
        self.occupants.get(&cell).and_then(|id| self.pieces.get(id))
    }

    /// Looks up a live piece by id.
    pub fn piece(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.get(&id)
    }

    /// Returns all live pieces ordered by id.
    pub fn pieces(&self) -> Vec<Piece> {
        let mut all: Vec<Piece> = self.pieces.values().copied().collect();
        all.sort_by_key(|p| p.id);
        all
    }

    /// Returns the live pieces of one side ordered by id.
    pub fn pieces_of(&self, side: Side) -> Vec<Piece> {
        let mut own: Vec<Piece> = self
            .pieces
            .values()
            .filter(|p| p.owner == side)
            .copied()
            .collect();
        own.sort_by_key(|p| p.id);
        own
    }

    /// Returns every mountain cell in (z, x) scan order.
    pub fn mountain_cells(&self) -> Vec<Cell> {
        let mut cells: Vec<Cell> = self.mountains.iter().copied().collect();
        cells.sort_by_key(|c| (c.z, c.x));
        cells
    }

    fn check_bounds(&self, cell: Cell) -> Result<(), BoardError> {
        if self.is_within_bounds(cell) {
            Ok(())
        } else {
            Err(BoardError::OutOfBounds(cell))
        }
    }

    /// Creates a new piece on an unblocked cell.
    pub fn spawn(&mut self, owner: Side, kind: PieceType, cell: Cell) -> Result<PieceId, BoardError> {
        if kind.is_terrain() {
            return Err(BoardError::Terrain);
        }
        self.check_bounds(cell)?;
        if self.is_blocked(cell) {
            return Err(BoardError::Occupied(cell));
        }
        let id = PieceId(self.next_id);
        self.next_id += 1;
        self.pieces.insert(
            id,
            Piece {
                id,
                owner,
                kind,
                position: cell,
            },
        );
        self.occupants.insert(cell, id);
        Ok(id)
    }

    /// Puts an existing piece on `cell`, vacating its previous cell.
    ///
    /// Placing a piece on the cell it already holds is a no-op.
    pub fn place(&mut self, id: PieceId, cell: Cell) -> Result<(), BoardError> {
        self.check_bounds(cell)?;
        let current = self.pieces.get(&id).ok_or(BoardError::UnknownPiece(id))?.position;
        if current == cell {
            return Ok(());
        }
        if self.is_blocked(cell) {
            return Err(BoardError::Occupied(cell));
        }
        self.relocate(id, current, cell);
        Ok(())
    }

    /// Moves a piece from `from` to `to`, capturing any other piece on `to`.
    ///
    /// Fails without mutating if `from` does not hold the piece, `to` is off
    /// the board, or `to` is a mountain.
    pub fn move_piece(&mut self, id: PieceId, from: Cell, to: Cell) -> Result<Option<Piece>, BoardError> {
        if self.occupants.get(&from) != Some(&id) {
            return Err(BoardError::NotFound { piece: id, cell: from });
        }
        self.check_bounds(to)?;
        if self.is_mountain(to) {
            return Err(BoardError::Blocked(to));
        }
        if from == to {
            return Ok(None);
        }
        let captured = self.remove(to);
        self.relocate(id, from, to);
        Ok(captured)
    }

    /// Removes and returns the piece on `cell`. Empty cells are a no-op.
    pub fn remove(&mut self, cell: Cell) -> Option<Piece> {
        let id = self.occupants.remove(&cell)?;
        self.pieces.remove(&id)
    }

    /// Raises a mountain on an unblocked cell.
    pub fn place_mountain(&mut self, cell: Cell) -> Result<(), BoardError> {
        self.check_bounds(cell)?;
        if self.is_blocked(cell) {
            return Err(BoardError::Occupied(cell));
        }
        self.mountains.insert(cell);
        Ok(())
    }

    /// Clears a mountain. Returns false if there was none.
    pub fn remove_mountain(&mut self, cell: Cell) -> bool {
        self.mountains.remove(&cell)
    }

    /// Empties a cell of whatever occupies it.
    pub fn clear_cell(&mut self, cell: Cell) -> Option<Evicted> {
        if let Some(piece) = self.remove(cell) {
            return Some(Evicted::Piece(piece));
        }
        if self.remove_mountain(cell) {
            return Some(Evicted::Mountain(cell));
        }
        None
    }

    fn relocate(&mut self, id: PieceId, from: Cell, to: Cell) {
        if self.occupants.get(&from) == Some(&id) {
            self.occupants.remove(&from);
        }
        self.occupants.insert(to, id);
        if let Some(piece) = self.pieces.get_mut(&id) {
            piece.position = to;
        }
    }
}
