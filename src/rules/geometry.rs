//! Shared ray-casting primitives for movement and attack rules.

use crate::board::{BoardState, Cell, Direction, Piece, EIGHT_WAY, ORTHOGONAL};

/// Which step set a rule walks along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Directions {
    Orthogonal,
    EightWay,
}

impl Directions {
    pub fn vectors(self) -> &'static [Direction] {
        match self {
            Directions::Orthogonal => &ORTHOGONAL,
            Directions::EightWay => &EIGHT_WAY,
        }
    }
}

/// Returns the in-bounds cells along `dir`, nearest first, up to `max` steps.
pub fn ray(board: &BoardState, from: Cell, dir: Direction, max: i32) -> impl Iterator<Item = Cell> + '_ {
    (1..=max)
        .map(move |d| from.step(dir, d))
        .take_while(move |c| board.is_within_bounds(*c))
}

/// Collects empty cells along each direction, stopping each ray at the
/// first blocked cell.
pub fn slide(board: &BoardState, from: Cell, dirs: Directions, max: i32) -> Vec<Cell> {
    let mut cells = Vec::new();
    for &dir in dirs.vectors() {
        cells.extend(ray(board, from, dir, max).take_while(|c| !board.is_blocked(*c)));
    }
    cells
}

/// Returns true if `cell` holds a piece hostile to `piece`.
pub fn holds_enemy(board: &BoardState, piece: &Piece, cell: Cell) -> bool {
    board.piece_at(cell).is_some_and(|other| other.is_enemy_of(piece))
}
