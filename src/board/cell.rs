//! Grid coordinates and direction tables.
//!
//! A `Cell` is an (x, z) pair on the square board. Coordinates are signed so
//! ray casts can step past an edge and be rejected by a bounds check instead
//! of wrapping.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A square on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub z: i32,
}

impl Cell {
    pub const fn new(x: i32, z: i32) -> Self {
        Cell { x, z }
    }

    /// Returns the cell displaced by the given vector.
    pub const fn offset(self, dx: i32, dz: i32) -> Cell {
        Cell {
            x: self.x + dx,
            z: self.z + dz,
        }
    }

    /// Returns the cell `distance` steps along `dir`.
    pub const fn step(self, dir: Direction, distance: i32) -> Cell {
        self.offset(dir.dx * distance, dir.dz * distance)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.z)
    }
}

/// A unit step vector on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Direction {
    pub dx: i32,
    pub dz: i32,
}

impl Direction {
    pub const fn new(dx: i32, dz: i32) -> Self {
        Direction { dx, dz }
    }
}

pub const NORTH: Direction = Direction::new(0, 1);
pub const SOUTH: Direction = Direction::new(0, -1);
pub const EAST: Direction = Direction::new(1, 0);
pub const WEST: Direction = Direction::new(-1, 0);

/// The four orthogonal directions.
pub const ORTHOGONAL: [Direction; 4] = [NORTH, EAST, SOUTH, WEST];

/// All eight directions: orthogonal first, then diagonal.
pub const EIGHT_WAY: [Direction; 8] = [
    NORTH,
    EAST,
    SOUTH,
    WEST,
    Direction::new(1, 1),
    Direction::new(1, -1),
    Direction::new(-1, -1),
    Direction::new(-1, 1),
];

/// Knight-style jump offsets (±2,±1) and (±1,±2).
pub const L_JUMPS: [(i32, i32); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

/// Returns the half-step cell an L-jump passes over.
///
/// The corner lies one step along the long axis of the jump: (1,0) for a
/// (2,1) jump, (0,-1) for a (1,-2) jump.
pub const fn knight_corner(from: Cell, dx: i32, dz: i32) -> Cell {
    if dx.abs() == 2 {
        from.offset(dx / 2, 0)
    } else {
        from.offset(0, dz / 2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_walks_along_direction() {
        let c = Cell::new(2, 5);
        assert_eq!(c.step(EAST, 3), Cell::new(5, 5));
        assert_eq!(c.step(SOUTH, 2), Cell::new(2, 3));
        assert_eq!(c.step(Direction::new(-1, 1), 2), Cell::new(0, 7));
    }

    #[test]
    fn eight_way_has_no_duplicates() {
        for (i, a) in EIGHT_WAY.iter().enumerate() {
            for b in &EIGHT_WAY[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn knight_corner_lies_on_long_axis() {
        let c = Cell::new(4, 4);
        assert_eq!(knight_corner(c, 2, 1), Cell::new(5, 4));
        assert_eq!(knight_corner(c, -2, -1), Cell::new(3, 4));
        assert_eq!(knight_corner(c, 1, 2), Cell::new(4, 5));
        assert_eq!(knight_corner(c, -1, -2), Cell::new(4, 3));
    }

    #[test]
    fn display_format() {
        assert_eq!(Cell::new(3, 7).to_string(), "(3,7)");
    }
}
