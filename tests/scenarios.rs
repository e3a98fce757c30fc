//! End-to-end rule scenarios driven through the public API.

use cyvasse::board::{BoardState, Cell, PieceType, Side};
use cyvasse::config::{GameConfig, RulesConfig};
use cyvasse::placement::{AutomaticPlacement, PlacementStrategy};
use cyvasse::rules::{self, AfterCapture, StrikeSequence};
use cyvasse::turn::{ActionKind, TurnController};

fn empty_board() -> BoardState {
    BoardState::new(10).unwrap()
}

fn sorted(mut cells: Vec<Cell>) -> Vec<Cell> {
    cells.sort();
    cells
}

#[test]
fn king_on_back_edge_has_five_moves() {
    let mut board = empty_board();
    let id = board.spawn(Side::Side1, PieceType::King, Cell::new(4, 0)).unwrap();
    let king = *board.piece(id).unwrap();
    let moves = rules::valid_moves(&board, &king, &RulesConfig::default());
    assert_eq!(
        sorted(moves),
        sorted(vec![
            Cell::new(3, 0),
            Cell::new(5, 0),
            Cell::new(3, 1),
            Cell::new(4, 1),
            Cell::new(5, 1),
        ])
    );
}

#[test]
fn light_horse_captures_and_relocates() {
    let mut board = empty_board();
    let horse = board.spawn(Side::Side1, PieceType::LightHorse, Cell::new(2, 5)).unwrap();
    let enemy = board.spawn(Side::Side2, PieceType::Rabble, Cell::new(5, 5)).unwrap();
    board.spawn(Side::Side2, PieceType::Rabble, Cell::new(6, 5)).unwrap();

    let (mut turns, _) = TurnController::start(&board, Side::Side1, &RulesConfig::default());
    let attacks = turns.attack_moves(&board, horse);
    assert!(attacks.contains(&Cell::new(5, 5)));
    assert!(!attacks.contains(&Cell::new(6, 5)));

    let outcome = turns.attempt_action(&mut board, horse, Cell::new(5, 5)).unwrap();
    assert_eq!(outcome.kind, ActionKind::CapturedAndRelocated);
    assert_eq!(board.piece(horse).unwrap().position, Cell::new(5, 5));
    assert!(board.piece(enemy).is_none());
    assert_eq!(turns.current(), Side::Side2);
}

#[test]
fn archer_clear_path_modes() {
    let mut board = empty_board();
    let archer = board.spawn(Side::Side1, PieceType::Archer, Cell::new(0, 0)).unwrap();
    board.spawn(Side::Side1, PieceType::Rabble, Cell::new(1, 0)).unwrap();
    board.spawn(Side::Side2, PieceType::Rabble, Cell::new(2, 0)).unwrap();
    let piece = *board.piece(archer).unwrap();

    let strict = RulesConfig { archer_requires_clear_path: true };
    assert!(!rules::attack_moves(&board, &piece, &strict).contains(&Cell::new(2, 0)));

    let lenient = RulesConfig { archer_requires_clear_path: false };
    assert_eq!(rules::attack_moves(&board, &piece, &lenient), vec![Cell::new(2, 0)]);
}

#[test]
fn automatic_placement_without_mountains() {
    let config = GameConfig { seed: 2024, ..GameConfig::default() };
    let mut board = BoardState::new(config.board_size).unwrap();
    let mut auto = AutomaticPlacement::new(Side::Side1, &config);
    let report = auto.initialize(&mut board, 0);

    assert!(board.mountain_cells().is_empty());
    assert!(report.is_complete());
    assert!(auto.has_completed_placement());
    let cavalry: Vec<_> = board
        .pieces_of(Side::Side1)
        .into_iter()
        .filter(|p| p.kind == PieceType::HeavyCavalry)
        .collect();
    assert_eq!(cavalry.len(), 2);
}

#[test]
fn elephant_double_capture_is_sequenced() {
    let mut board = empty_board();
    let elephant = board.spawn(Side::Side1, PieceType::Elephant, Cell::new(4, 4)).unwrap();
    board.spawn(Side::Side2, PieceType::Rabble, Cell::new(5, 4)).unwrap();
    let second = board.spawn(Side::Side2, PieceType::Spearman, Cell::new(6, 4)).unwrap();
    let piece = *board.piece(elephant).unwrap();
    let config = RulesConfig::default();

    let attacks = rules::attack_moves(&board, &piece, &config);
    assert!(attacks.contains(&Cell::new(5, 4)));
    assert!(attacks.contains(&Cell::new(6, 4)));

    let strike = rules::strikes(&board, &piece, &config)
        .into_iter()
        .find(|s| s.hits(Cell::new(6, 4)))
        .unwrap();
    let mut sequence = StrikeSequence::new(elephant, strike, AfterCapture::Advance);

    let first = sequence.apply_next(&mut board).unwrap().unwrap();
    assert_eq!(first.target, Cell::new(5, 4));
    assert!(!board.is_occupied(Cell::new(5, 4)));
    assert_eq!(board.piece(elephant).unwrap().position, Cell::new(4, 4));
    assert_eq!(board.piece_at(Cell::new(6, 4)).map(|p| p.id), Some(second));

    let last = sequence.apply_next(&mut board).unwrap().unwrap();
    assert_eq!(last.target, Cell::new(6, 4));
    assert_eq!(last.captured.id, second);
    assert!(sequence.is_complete());
    assert_eq!(board.piece(elephant).unwrap().position, Cell::new(6, 4));
}

#[test]
fn edge_pieces_stay_in_bounds() {
    let config = RulesConfig::default();
    for kind in cyvasse::board::ALL_PIECE_TYPES.into_iter().filter(|k| !k.is_terrain()) {
        for corner in [Cell::new(0, 0), Cell::new(9, 9), Cell::new(0, 9), Cell::new(9, 0)] {
            for side in [Side::Side1, Side::Side2] {
                let mut board = empty_board();
                let id = board.spawn(side, kind, corner).unwrap();
                let piece = *board.piece(id).unwrap();
                let cells = rules::valid_moves(&board, &piece, &config)
                    .into_iter()
                    .chain(rules::potential_attack_cells(&board, &piece, &config));
                for cell in cells {
                    assert!(board.is_within_bounds(cell), "{kind} at {corner} reached {cell}");
                }
            }
        }
    }
}
