//! Attack rules.
//!
//! An attack rule has two halves: its reach (which cells it can strike and
//! how obstructions interfere) and what the attacker does after a capture.
//! Targets are grouped into strikes; only a trample produces a strike with a
//! second target.

use crate::board::{knight_corner, BoardState, Cell, Direction, Piece, L_JUMPS};

use super::geometry::{holds_enemy, ray, Directions};

/// What the attacker does once a defender is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AfterCapture {
    /// Stays on its own cell (ranged pieces, King, Swordsman).
    Hold,
    /// Moves onto the captured cell.
    Advance,
}

/// Which cells an attack can reach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reach {
    /// Up to `range` cells along each direction. With `clear_path` the ray
    /// ends at the first blocked cell; without it every enemy in range is a
    /// target no matter what stands in between.
    Ray { dirs: Directions, range: i32, clear_path: bool },
    /// The cell directly toward the enemy edge.
    Forward,
    /// Knight offsets; the half-step corner must be empty.
    Jump,
    /// Orthogonal ray that can take the first enemy and a second enemy
    /// standing directly behind it.
    Trample { range: i32 },
}

/// One attack action: a primary target and, for a trample, a follow-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Strike {
    pub primary: Cell,
    pub follow_up: Option<Cell>,
}

impl Strike {
    pub const fn single(cell: Cell) -> Self {
        Strike {
            primary: cell,
            follow_up: None,
        }
    }

    /// Targets in resolution order, nearest first.
    pub fn targets(&self) -> impl Iterator<Item = Cell> {
        std::iter::once(self.primary).chain(self.follow_up)
    }

    /// Returns true if `cell` is one of this strike's targets.
    pub fn hits(&self, cell: Cell) -> bool {
        self.primary == cell || self.follow_up == Some(cell)
    }
}

/// How a piece type attacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AttackRule {
    pub reach: Reach,
    pub after: AfterCapture,
}

impl AttackRule {
    /// Returns every strike currently available to `piece`.
    pub fn strikes(&self, board: &BoardState, piece: &Piece) -> Vec<Strike> {
        let from = piece.position;
        let mut strikes = Vec::new();
        match self.reach {
            Reach::Ray { dirs, range, clear_path: true } => {
                for &dir in dirs.vectors() {
                    if let Some(hit) = first_obstruction(board, from, dir, range) {
                        if holds_enemy(board, piece, hit) {
                            strikes.push(Strike::single(hit));
                        }
                    }
                }
            }
            Reach::Ray { dirs, range, clear_path: false } => {
                for &dir in dirs.vectors() {
                    strikes.extend(
                        ray(board, from, dir, range)
                            .filter(|c| holds_enemy(board, piece, *c))
                            .map(Strike::single),
                    );
                }
            }
            Reach::Forward => {
                let target = forward_cell(piece);
                if holds_enemy(board, piece, target) {
                    strikes.push(Strike::single(target));
                }
            }
            Reach::Jump => {
                for &(dx, dz) in &L_JUMPS {
                    let target = from.offset(dx, dz);
                    if jump_open(board, from, dx, dz) && holds_enemy(board, piece, target) {
                        strikes.push(Strike::single(target));
                    }
                }
            }
            Reach::Trample { range } => {
                for &dir in Directions::Orthogonal.vectors() {
                    let Some(hit) = first_obstruction(board, from, dir, range) else {
                        continue;
                    };
                    if !holds_enemy(board, piece, hit) {
                        continue;
                    }
                    let behind = hit.step(dir, 1);
                    let within = distance(from, behind) <= range;
                    let follow_up = (within && holds_enemy(board, piece, behind)).then_some(behind);
                    strikes.push(Strike { primary: hit, follow_up });
                }
            }
        }
        strikes
    }

    /// Returns every cell currently holding an enemy this piece can strike.
    pub fn targets(&self, board: &BoardState, piece: &Piece) -> Vec<Cell> {
        self.strikes(board, piece).iter().flat_map(|s| s.targets()).collect()
    }

    /// Returns every cell this piece threatens: the cells it would strike if
    /// an enemy stood there. Includes empty and friendly cells; never
    /// includes mountains or off-board cells.
    pub fn threatened(&self, board: &BoardState, piece: &Piece) -> Vec<Cell> {
        let from = piece.position;
        let mut cells = Vec::new();
        match self.reach {
            Reach::Ray { dirs, range, clear_path: true } => {
                for &dir in dirs.vectors() {
                    threatened_ray(board, from, dir, range, &mut cells);
                }
            }
            Reach::Ray { dirs, range, clear_path: false } => {
                for &dir in dirs.vectors() {
                    cells.extend(ray(board, from, dir, range).filter(|c| !board.is_mountain(*c)));
                }
            }
            Reach::Forward => {
                let target = forward_cell(piece);
                if board.is_within_bounds(target) && !board.is_mountain(target) {
                    cells.push(target);
                }
            }
            Reach::Jump => {
                for &(dx, dz) in &L_JUMPS {
                    let target = from.offset(dx, dz);
                    if jump_open(board, from, dx, dz) && !board.is_mountain(target) {
                        cells.push(target);
                    }
                }
            }
            Reach::Trample { range } => {
                for &dir in Directions::Orthogonal.vectors() {
                    let before = cells.len();
                    threatened_ray(board, from, dir, range, &mut cells);
                    let Some(&last) = cells[before..].last() else {
                        continue;
                    };
                    // Only an enemy lets the trample carry on to the next cell.
                    if holds_enemy(board, piece, last) {
                        let behind = last.step(dir, 1);
                        if distance(from, behind) <= range
                            && board.is_within_bounds(behind)
                            && !board.is_mountain(behind)
                        {
                            cells.push(behind);
                        }
                    }
                }
            }
        }
        cells
    }

    /// Returns the strike that `target` belongs to, if any.
    pub fn strike_at(&self, board: &BoardState, piece: &Piece, target: Cell) -> Option<Strike> {
        self.strikes(board, piece).into_iter().find(|s| s.hits(target))
    }
}

/// Returns the first blocked cell along a ray, if one lies within range.
fn first_obstruction(board: &BoardState, from: Cell, dir: Direction, range: i32) -> Option<Cell> {
    ray(board, from, dir, range)
        .find(|c| board.is_blocked(*c))
        .filter(|c| !board.is_mountain(*c))
}

/// Pushes cells along a clear-path ray up to and including the first piece.
fn threatened_ray(board: &BoardState, from: Cell, dir: Direction, range: i32, out: &mut Vec<Cell>) {
    for cell in ray(board, from, dir, range) {
        if board.is_mountain(cell) {
            break;
        }
        out.push(cell);
        if board.is_occupied(cell) {
            break;
        }
    }
}

fn forward_cell(piece: &Piece) -> Cell {
    piece.position.step(Direction::new(0, piece.owner.forward()), 1)
}

/// An L-jump attack lands on the board and its corner cell is empty.
fn jump_open(board: &BoardState, from: Cell, dx: i32, dz: i32) -> bool {
    board.is_within_bounds(from.offset(dx, dz)) && !board.is_blocked(knight_corner(from, dx, dz))
}

/// Chebyshev distance between two cells.
fn distance(a: Cell, b: Cell) -> i32 {
    (a.x - b.x).abs().max((a.z - b.z).abs())
}
