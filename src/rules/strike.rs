//! Sequenced strike resolution.
//!
//! A strike with two targets resolves as two separate captures, nearest
//! first. `StrikeSequence` applies them one step at a time so the board can
//! be inspected between captures; the state after the first capture is a
//! valid position in its own right.

use crate::board::{BoardError, BoardState, Cell, Piece, PieceId};

use super::attack::{AfterCapture, Strike};

/// One applied capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureEvent {
    pub target: Cell,
    pub captured: Piece,
    /// Where the attacker stands once this capture is done.
    pub attacker_at: Cell,
}

/// An in-progress strike.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrikeSequence {
    attacker: PieceId,
    after: AfterCapture,
    targets: Vec<Cell>,
    next: usize,
}

impl StrikeSequence {
    pub fn new(attacker: PieceId, strike: Strike, after: AfterCapture) -> Self {
        StrikeSequence {
            attacker,
            after,
            targets: strike.targets().collect(),
            next: 0,
        }
    }

    /// Targets not yet resolved, in order.
    pub fn pending(&self) -> &[Cell] {
        &self.targets[self.next..]
    }

    pub fn is_complete(&self) -> bool {
        self.next >= self.targets.len()
    }

    /// Resolves the next target. Returns `None` once every target is done.
    ///
    /// A target whose defender has already left the board is skipped.
    pub fn apply_next(&mut self, board: &mut BoardState) -> Result<Option<CaptureEvent>, BoardError> {
        while let Some(&target) = self.targets.get(self.next) {
            let attacker = *board
                .piece(self.attacker)
                .ok_or(BoardError::UnknownPiece(self.attacker))?;
            self.next += 1;

            let event = match self.after {
                AfterCapture::Hold => board.remove(target).map(|captured| CaptureEvent {
                    target,
                    captured,
                    attacker_at: attacker.position,
                }),
                // An advancing attacker holds its cell until the last target falls.
                AfterCapture::Advance if !self.is_complete() => board.remove(target).map(|captured| CaptureEvent {
                    target,
                    captured,
                    attacker_at: attacker.position,
                }),
                AfterCapture::Advance => {
                    if !board.is_occupied(target) {
                        None
                    } else {
                        board
                            .move_piece(self.attacker, attacker.position, target)?
                            .map(|captured| CaptureEvent {
                                target,
                                captured,
                                attacker_at: target,
                            })
                    }
                }
            };
            if let Some(event) = event {
                tracing::debug!(
                    attacker = %self.attacker,
                    target = %target,
                    captured = %event.captured.kind,
                    "capture resolved"
                );
                return Ok(Some(event));
            }
        }
        Ok(None)
    }

    /// Resolves every remaining target, calling `on_capture` after each.
    pub fn run(
        &mut self,
        board: &mut BoardState,
        mut on_capture: impl FnMut(&BoardState, &CaptureEvent),
    ) -> Result<Vec<CaptureEvent>, BoardError> {
        let mut events = Vec::with_capacity(self.targets.len());
        while let Some(event) = self.apply_next(board)? {
            on_capture(board, &event);
            events.push(event);
        }
        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{PieceType, Side};

    #[test]
    fn hold_leaves_attacker_in_place() {
        let mut board = BoardState::new(10).unwrap();
        let catapult = board.spawn(Side::Side1, PieceType::Catapult, Cell::new(0, 0)).unwrap();
        board.spawn(Side::Side2, PieceType::King, Cell::new(0, 4)).unwrap();
        let mut seq = StrikeSequence::new(catapult, Strike::single(Cell::new(0, 4)), AfterCapture::Hold);
        let event = seq.apply_next(&mut board).unwrap().unwrap();
        assert_eq!(event.attacker_at, Cell::new(0, 0));
        assert_eq!(event.captured.kind, PieceType::King);
        assert!(!board.is_occupied(Cell::new(0, 4)));
        assert!(seq.is_complete());
        assert_eq!(seq.apply_next(&mut board).unwrap(), None);
    }

    #[test]
    fn advance_relocates_with_the_last_capture() {
        let mut board = BoardState::new(10).unwrap();
        let elephant = board.spawn(Side::Side1, PieceType::Elephant, Cell::new(4, 4)).unwrap();
        let first = board.spawn(Side::Side2, PieceType::Rabble, Cell::new(5, 4)).unwrap();
        let second = board.spawn(Side::Side2, PieceType::Spearman, Cell::new(6, 4)).unwrap();
        let strike = Strike {
            primary: Cell::new(5, 4),
            follow_up: Some(Cell::new(6, 4)),
        };
        let mut seq = StrikeSequence::new(elephant, strike, AfterCapture::Advance);
        assert_eq!(seq.pending(), &[Cell::new(5, 4), Cell::new(6, 4)]);

        let e1 = seq.apply_next(&mut board).unwrap().unwrap();
        assert_eq!(e1.captured.id, first);
        assert_eq!(e1.attacker_at, Cell::new(4, 4));
        assert!(board.piece(second).is_some());
        assert!(!board.is_occupied(Cell::new(5, 4)));
        assert_eq!(board.piece(elephant).unwrap().position, Cell::new(4, 4));
        assert_eq!(seq.pending(), &[Cell::new(6, 4)]);

        let e2 = seq.apply_next(&mut board).unwrap().unwrap();
        assert_eq!(e2.captured.id, second);
        assert_eq!(board.piece(elephant).unwrap().position, Cell::new(6, 4));
        assert!(seq.is_complete());
    }

    #[test]
    fn run_reports_each_capture() {
        let mut board = BoardState::new(10).unwrap();
        let elephant = board.spawn(Side::Side1, PieceType::Elephant, Cell::new(4, 4)).unwrap();
        board.spawn(Side::Side2, PieceType::Rabble, Cell::new(4, 5)).unwrap();
        board.spawn(Side::Side2, PieceType::Rabble, Cell::new(4, 6)).unwrap();
        let strike = Strike {
            primary: Cell::new(4, 5),
            follow_up: Some(Cell::new(4, 6)),
        };
        let mut seen = Vec::new();
        let events = StrikeSequence::new(elephant, strike, AfterCapture::Advance)
            .run(&mut board, |b, e| seen.push((e.target, b.is_occupied(Cell::new(4, 6)))))
            .unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(seen, vec![(Cell::new(4, 5), true), (Cell::new(4, 6), true)]);
    }

    #[test]
    fn vanished_defender_is_skipped() {
        let mut board = BoardState::new(10).unwrap();
        let archer = board.spawn(Side::Side1, PieceType::Archer, Cell::new(0, 0)).unwrap();
        let mut seq = StrikeSequence::new(archer, Strike::single(Cell::new(0, 2)), AfterCapture::Hold);
        assert_eq!(seq.apply_next(&mut board).unwrap(), None);
        assert!(seq.is_complete());
    }
}
