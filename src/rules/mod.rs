//! Piece rules.
//!
//! Maps every `PieceType` to its movement and attack rule and exposes the
//! queries the turn controller and any front end need: legal moves, attack
//! targets, and threatened cells.

pub mod attack;
pub mod geometry;
pub mod movement;
pub mod strike;

pub use attack::{AfterCapture, AttackRule, Reach, Strike};
pub use geometry::Directions;
pub use movement::MovementRule;
pub use strike::{CaptureEvent, StrikeSequence};

use crate::board::{BoardState, Cell, Piece, PieceType};
use crate::config::RulesConfig;

/// The movement and attack rule bound to one piece type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RuleSet {
    pub movement: MovementRule,
    pub attack: AttackRule,
}

const fn ray(dirs: Directions, range: i32, clear_path: bool, after: AfterCapture) -> AttackRule {
    AttackRule {
        reach: Reach::Ray { dirs, range, clear_path },
        after,
    }
}

const fn slide(dirs: Directions, range: i32) -> MovementRule {
    MovementRule::Slide { dirs, range }
}

/// Returns the rules for a piece type. Mountains bind none.
pub fn rules_for(kind: PieceType, config: &RulesConfig) -> Option<RuleSet> {
    use AfterCapture::{Advance, Hold};
    use Directions::{EightWay, Orthogonal};

    let (movement, attack) = match kind {
        PieceType::Mountain => return None,
        PieceType::King | PieceType::Swordsman => (slide(EightWay, 1), ray(EightWay, 1, true, Hold)),
        PieceType::Archer => (
            slide(EightWay, 1),
            ray(EightWay, 3, config.archer_requires_clear_path, Hold),
        ),
        PieceType::Crossbowman => (slide(EightWay, 1), ray(EightWay, 2, true, Hold)),
        PieceType::Spearman => (slide(Orthogonal, 2), ray(Orthogonal, 2, true, Advance)),
        PieceType::Rabble => (
            MovementRule::Forward,
            AttackRule { reach: Reach::Forward, after: Advance },
        ),
        PieceType::Elephant => (
            slide(Orthogonal, 3),
            AttackRule { reach: Reach::Trample { range: 3 }, after: Advance },
        ),
        PieceType::Dragon => (MovementRule::Flight { range: 3 }, ray(EightWay, 3, true, Advance)),
        PieceType::HeavyCavalry => (
            MovementRule::Jump,
            AttackRule { reach: Reach::Jump, after: Advance },
        ),
        PieceType::LightHorse => (slide(Orthogonal, 4), ray(Orthogonal, 4, true, Advance)),
        PieceType::Catapult => (slide(Orthogonal, 1), ray(Orthogonal, 4, true, Hold)),
        PieceType::Trebuchet => (slide(Orthogonal, 1), ray(Orthogonal, 5, true, Hold)),
    };
    Some(RuleSet { movement, attack })
}

/// Returns the empty cells `piece` may move to.
pub fn valid_moves(board: &BoardState, piece: &Piece, config: &RulesConfig) -> Vec<Cell> {
    rules_for(piece.kind, config)
        .map(|r| r.movement.targets(board, piece))
        .unwrap_or_default()
}

/// Returns the enemy-held cells `piece` may attack right now.
pub fn attack_moves(board: &BoardState, piece: &Piece, config: &RulesConfig) -> Vec<Cell> {
    rules_for(piece.kind, config)
        .map(|r| r.attack.targets(board, piece))
        .unwrap_or_default()
}

/// Returns every cell `piece` threatens, whatever currently stands there.
pub fn potential_attack_cells(board: &BoardState, piece: &Piece, config: &RulesConfig) -> Vec<Cell> {
    rules_for(piece.kind, config)
        .map(|r| r.attack.threatened(board, piece))
        .unwrap_or_default()
}

/// Returns the attack groupings available to `piece`.
pub fn strikes(board: &BoardState, piece: &Piece, config: &RulesConfig) -> Vec<Strike> {
    rules_for(piece.kind, config)
        .map(|r| r.attack.strikes(board, piece))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Side, ALL_PIECE_TYPES};

    fn lone(kind: PieceType, side: Side, at: Cell) -> (BoardState, Piece) {
        let mut board = BoardState::new(10).unwrap();
        let id = board.spawn(side, kind, at).unwrap();
        let piece = *board.piece(id).unwrap();
        (board, piece)
    }

    fn sorted(mut cells: Vec<Cell>) -> Vec<Cell> {
        cells.sort();
        cells
    }

    #[test]
    fn every_unit_has_rules_and_mountain_has_none() {
        let config = RulesConfig::default();
        for kind in ALL_PIECE_TYPES {
            assert_eq!(rules_for(kind, &config).is_none(), kind == PieceType::Mountain);
        }
    }

    #[test]
    fn king_and_swordsman_share_rules() {
        let config = RulesConfig::default();
        assert_eq!(
            rules_for(PieceType::King, &config),
            rules_for(PieceType::Swordsman, &config)
        );
    }

    #[test]
    fn king_on_back_edge_has_five_moves() {
        let (board, king) = lone(PieceType::King, Side::Side1, Cell::new(4, 0));
        let moves = sorted(valid_moves(&board, &king, &RulesConfig::default()));
        let expected = sorted(vec![
            Cell::new(3, 0),
            Cell::new(5, 0),
            Cell::new(3, 1),
            Cell::new(4, 1),
            Cell::new(5, 1),
        ]);
        assert_eq!(moves, expected);
    }

    #[test]
    fn corner_pieces_stay_in_bounds() {
        let config = RulesConfig::default();
        for kind in ALL_PIECE_TYPES {
            if kind.is_terrain() {
                continue;
            }
            for side in [Side::Side1, Side::Side2] {
                for corner in [Cell::new(0, 0), Cell::new(9, 9), Cell::new(0, 9), Cell::new(9, 0)] {
                    let (board, piece) = lone(kind, side, corner);
                    let all = valid_moves(&board, &piece, &config)
                        .into_iter()
                        .chain(potential_attack_cells(&board, &piece, &config));
                    for cell in all {
                        assert!(board.is_within_bounds(cell), "{kind} at {corner} produced {cell}");
                    }
                }
            }
        }
    }

    #[test]
    fn crossbowman_long_shot_needs_clear_first_cell() {
        let config = RulesConfig::default();
        let mut board = BoardState::new(10).unwrap();
        let id = board.spawn(Side::Side1, PieceType::Crossbowman, Cell::new(2, 2)).unwrap();
        board.spawn(Side::Side2, PieceType::Rabble, Cell::new(4, 4)).unwrap();
        board.spawn(Side::Side2, PieceType::Rabble, Cell::new(2, 4)).unwrap();
        board.place_mountain(Cell::new(2, 3)).unwrap();
        let piece = *board.piece(id).unwrap();
        assert_eq!(attack_moves(&board, &piece, &config), vec![Cell::new(4, 4)]);
    }

    #[test]
    fn spearman_moves_two_orthogonally() {
        let (board, piece) = lone(PieceType::Spearman, Side::Side1, Cell::new(5, 5));
        assert_eq!(valid_moves(&board, &piece, &RulesConfig::default()).len(), 8);
    }

    #[test]
    fn catapult_reaches_four_trebuchet_five() {
        let config = RulesConfig::default();
        let mut board = BoardState::new(10).unwrap();
        let c = board.spawn(Side::Side1, PieceType::Catapult, Cell::new(0, 0)).unwrap();
        let t = board.spawn(Side::Side1, PieceType::Trebuchet, Cell::new(9, 0)).unwrap();
        board.spawn(Side::Side2, PieceType::King, Cell::new(0, 5)).unwrap();
        board.spawn(Side::Side2, PieceType::Rabble, Cell::new(9, 5)).unwrap();
        let catapult = *board.piece(c).unwrap();
        let trebuchet = *board.piece(t).unwrap();
        assert!(attack_moves(&board, &catapult, &config).is_empty());
        assert_eq!(attack_moves(&board, &trebuchet, &config), vec![Cell::new(9, 5)]);
        assert_eq!(valid_moves(&board, &catapult, &config).len(), 2);
    }

    #[test]
    fn rabble_attacks_only_forward() {
        let config = RulesConfig::default();
        let mut board = BoardState::new(10).unwrap();
        let id = board.spawn(Side::Side2, PieceType::Rabble, Cell::new(3, 6)).unwrap();
        board.spawn(Side::Side1, PieceType::Rabble, Cell::new(3, 5)).unwrap();
        board.spawn(Side::Side1, PieceType::Rabble, Cell::new(4, 5)).unwrap();
        board.spawn(Side::Side1, PieceType::Rabble, Cell::new(3, 7)).unwrap();
        let piece = *board.piece(id).unwrap();
        assert_eq!(attack_moves(&board, &piece, &config), vec![Cell::new(3, 5)]);
        assert!(valid_moves(&board, &piece, &config).is_empty());
    }

    #[test]
    fn dragon_attack_does_not_pierce() {
        let config = RulesConfig::default();
        let mut board = BoardState::new(10).unwrap();
        let id = board.spawn(Side::Side1, PieceType::Dragon, Cell::new(0, 0)).unwrap();
        board.spawn(Side::Side2, PieceType::Rabble, Cell::new(1, 1)).unwrap();
        board.spawn(Side::Side2, PieceType::King, Cell::new(2, 2)).unwrap();
        let piece = *board.piece(id).unwrap();
        assert_eq!(attack_moves(&board, &piece, &config), vec![Cell::new(1, 1)]);
        assert!(valid_moves(&board, &piece, &config).contains(&Cell::new(3, 3)));
    }

    #[test]
    fn threat_map_includes_friendly_and_empty_cells() {
        let config = RulesConfig::default();
        let mut board = BoardState::new(10).unwrap();
        let id = board.spawn(Side::Side1, PieceType::LightHorse, Cell::new(0, 0)).unwrap();
        board.spawn(Side::Side1, PieceType::Rabble, Cell::new(0, 2)).unwrap();
        board.place_mountain(Cell::new(2, 0)).unwrap();
        let piece = *board.piece(id).unwrap();
        let threatened = sorted(potential_attack_cells(&board, &piece, &config));
        assert_eq!(threatened, vec![Cell::new(0, 1), Cell::new(0, 2), Cell::new(1, 0)]);
    }

    #[test]
    fn archer_mode_follows_config() {
        let mut board = BoardState::new(10).unwrap();
        let id = board.spawn(Side::Side1, PieceType::Archer, Cell::new(0, 0)).unwrap();
        board.spawn(Side::Side1, PieceType::Rabble, Cell::new(1, 0)).unwrap();
        board.spawn(Side::Side2, PieceType::Rabble, Cell::new(2, 0)).unwrap();
        let piece = *board.piece(id).unwrap();
        let strict = RulesConfig { archer_requires_clear_path: true };
        let lenient = RulesConfig { archer_requires_clear_path: false };
        assert!(attack_moves(&board, &piece, &strict).is_empty());
        assert_eq!(attack_moves(&board, &piece, &lenient), vec![Cell::new(2, 0)]);
    }
}
