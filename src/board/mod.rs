//! Board representation and piece catalog.
//!
//! Contains the grid coordinates, the piece types and sides, and the board
//! state that owns occupancy and terrain.

pub mod cell;
pub mod piece;
pub mod state;

pub use cell::{
    knight_corner, Cell, Direction, EAST, EIGHT_WAY, L_JUMPS, NORTH, ORTHOGONAL, SOUTH, WEST,
};
pub use piece::{Piece, PieceId, PieceType, Side, ALL_PIECE_TYPES, ALL_SIDES};
pub use state::{BoardError, BoardState, Evicted};
