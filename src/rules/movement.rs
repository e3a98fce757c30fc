//! Movement rules.
//!
//! Each rule turns a piece and the board into the ordered list of empty
//! cells the piece may move to. Order follows the direction table, then
//! distance.

use crate::board::{BoardState, Cell, Direction, Piece, L_JUMPS};

use super::geometry::{ray, slide, Directions};

/// How a piece type moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MovementRule {
    /// Walks up to `range` cells, stopping at the first obstruction.
    Slide { dirs: Directions, range: i32 },
    /// One cell toward the enemy edge.
    Forward,
    /// Up to `range` cells in eight directions, passing over anything in
    /// between; only the landing cell must be empty.
    Flight { range: i32 },
    /// Knight-style L jump to an empty cell.
    Jump,
}

impl MovementRule {
    /// Returns the cells `piece` may move to.
    pub fn targets(&self, board: &BoardState, piece: &Piece) -> Vec<Cell> {
        let from = piece.position;
        match *self {
            MovementRule::Slide { dirs, range } => slide(board, from, dirs, range),
            MovementRule::Forward => {
                let to = from.step(Direction::new(0, piece.owner.forward()), 1);
                open(board, to).into_iter().collect()
            }
            MovementRule::Flight { range } => {
                let mut cells = Vec::new();
                for &dir in Directions::EightWay.vectors() {
                    cells.extend(ray(board, from, dir, range).filter(|c| !board.is_blocked(*c)));
                }
                cells
            }
            MovementRule::Jump => L_JUMPS
                .iter()
                .filter_map(|&(dx, dz)| open(board, from.offset(dx, dz)))
                .collect(),
        }
    }
}

/// Returns `cell` if it is on the board and empty.
fn open(board: &BoardState, cell: Cell) -> Option<Cell> {
    (board.is_within_bounds(cell) && !board.is_blocked(cell)).then_some(cell)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{PieceType, Side};

    fn setup(kind: PieceType, side: Side, at: Cell) -> (BoardState, Piece) {
        let mut board = BoardState::new(10).unwrap();
        let id = board.spawn(side, kind, at).unwrap();
        let piece = *board.piece(id).unwrap();
        (board, piece)
    }

    #[test]
    fn single_step_in_corner() {
        let (board, piece) = setup(PieceType::King, Side::Side1, Cell::new(0, 0));
        let rule = MovementRule::Slide { dirs: Directions::EightWay, range: 1 };
        let mut cells = rule.targets(&board, &piece);
        cells.sort();
        assert_eq!(cells, vec![Cell::new(0, 1), Cell::new(1, 0), Cell::new(1, 1)]);
    }

    #[test]
    fn forward_depends_on_side() {
        let (board, piece) = setup(PieceType::Rabble, Side::Side1, Cell::new(3, 3));
        assert_eq!(MovementRule::Forward.targets(&board, &piece), vec![Cell::new(3, 4)]);
        let (board, piece) = setup(PieceType::Rabble, Side::Side2, Cell::new(3, 3));
        assert_eq!(MovementRule::Forward.targets(&board, &piece), vec![Cell::new(3, 2)]);
    }

    #[test]
    fn forward_off_board_is_empty() {
        let (board, piece) = setup(PieceType::Rabble, Side::Side1, Cell::new(3, 9));
        assert!(MovementRule::Forward.targets(&board, &piece).is_empty());
    }

    #[test]
    fn flight_passes_over_obstructions() {
        let (mut board, piece) = setup(PieceType::Dragon, Side::Side1, Cell::new(4, 4));
        board.place_mountain(Cell::new(5, 4)).unwrap();
        board.spawn(Side::Side2, PieceType::Rabble, Cell::new(6, 4)).unwrap();
        let cells = MovementRule::Flight { range: 3 }.targets(&board, &piece);
        assert!(!cells.contains(&Cell::new(5, 4)));
        assert!(!cells.contains(&Cell::new(6, 4)));
        assert!(cells.contains(&Cell::new(7, 4)));
        assert_eq!(cells.len(), 22);
    }

    #[test]
    fn jump_ignores_corner_when_moving() {
        let (mut board, piece) = setup(PieceType::HeavyCavalry, Side::Side1, Cell::new(4, 4));
        board.place_mountain(Cell::new(5, 4)).unwrap();
        let cells = MovementRule::Jump.targets(&board, &piece);
        assert!(cells.contains(&Cell::new(6, 5)));
        assert_eq!(cells.len(), 8);
    }
}
