//! Turn control.
//!
//! Tracks whose turn it is, validates actions against the piece rules, and
//! applies them to the board. Every completed action flips the turn exactly
//! once and produces one `TurnEvent`; failed actions change nothing.

use std::fmt;

use serde::Serialize;

use crate::board::{BoardError, BoardState, Cell, PieceId, Side};
use crate::config::RulesConfig;
use crate::rules::{self, AfterCapture, CaptureEvent, Strike, StrikeSequence};

/// Errors raised by `TurnController::attempt_action`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    #[error("target {0} is off the board or a mountain")]
    InvalidTarget(Cell),

    #[error("it is {expected}'s turn, not {actual}'s")]
    WrongTurn { expected: Side, actual: Side },

    #[error("piece {piece} cannot act on {target}")]
    IllegalAction { piece: PieceId, target: Cell },

    #[error("no live piece with id {0}")]
    UnknownPiece(PieceId),

    #[error(transparent)]
    Board(#[from] BoardError),
}

/// Announces the side to act next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TurnEvent {
    pub current: Side,
    /// Turn number, starting at 1.
    pub turn: u32,
}

/// What kind of action was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Moved,
    /// Ranged capture; the attacker kept its cell.
    Captured,
    /// Melee capture; the attacker ended on a captured cell.
    CapturedAndRelocated,
}

/// Result of a successful action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionOutcome {
    pub kind: ActionKind,
    pub piece: PieceId,
    pub from: Cell,
    /// Where the acting piece stands afterwards.
    pub to: Cell,
    /// Captures in the order they were applied.
    pub captures: Vec<CaptureEvent>,
    /// Second target of a trample, if the strike had one.
    pub follow_up: Option<Cell>,
    pub next_turn: Side,
}

pub type TurnObserver = Box<dyn FnMut(&TurnEvent) + Send>;
pub type CaptureObserver = Box<dyn FnMut(&BoardState, &CaptureEvent) + Send>;

/// Alternates turns between the two sides.
pub struct TurnController {
    current: Side,
    turn: u32,
    rules: RulesConfig,
    on_turn: Option<TurnObserver>,
    on_capture: Option<CaptureObserver>,
}

impl fmt::Debug for TurnController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TurnController")
            .field("current", &self.current)
            .field("turn", &self.turn)
            .field("rules", &self.rules)
            .finish_non_exhaustive()
    }
}

impl TurnController {
    /// Starts play with `first` to act. Returns the opening turn event.
    pub fn start(board: &BoardState, first: Side, rules: &RulesConfig) -> (Self, TurnEvent) {
        let controller = TurnController {
            current: first,
            turn: 1,
            rules: *rules,
            on_turn: None,
            on_capture: None,
        };
        tracing::debug!(
            first = %first,
            side1 = board.pieces_of(Side::Side1).len(),
            side2 = board.pieces_of(Side::Side2).len(),
            "play started"
        );
        let event = controller.event();
        (controller, event)
    }

    /// Registers a callback fired after every turn change.
    pub fn subscribe(&mut self, observer: TurnObserver) {
        self.on_turn = Some(observer);
    }

    /// Registers a callback fired after each individual capture.
    pub fn on_capture(&mut self, observer: CaptureObserver) {
        self.on_capture = Some(observer);
    }

    pub fn current(&self) -> Side {
        self.current
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn rules(&self) -> &RulesConfig {
        &self.rules
    }

    fn event(&self) -> TurnEvent {
        TurnEvent {
            current: self.current,
            turn: self.turn,
        }
    }

    pub fn valid_moves(&self, board: &BoardState, piece: PieceId) -> Vec<Cell> {
        board
            .piece(piece)
            .map(|p| rules::valid_moves(board, p, &self.rules))
            .unwrap_or_default()
    }

    pub fn attack_moves(&self, board: &BoardState, piece: PieceId) -> Vec<Cell> {
        board
            .piece(piece)
            .map(|p| rules::attack_moves(board, p, &self.rules))
            .unwrap_or_default()
    }

    pub fn potential_attack_cells(&self, board: &BoardState, piece: PieceId) -> Vec<Cell> {
        board
            .piece(piece)
            .map(|p| rules::potential_attack_cells(board, p, &self.rules))
            .unwrap_or_default()
    }

    /// Moves `piece` to `target` or attacks it, then passes the turn.
    pub fn attempt_action(
        &mut self,
        board: &mut BoardState,
        piece: PieceId,
        target: Cell,
    ) -> Result<ActionOutcome, ActionError> {
        let actor = *board.piece(piece).ok_or(ActionError::UnknownPiece(piece))?;
        if actor.owner != self.current {
            return Err(ActionError::WrongTurn {
                expected: self.current,
                actual: actor.owner,
            });
        }
        if !board.is_within_bounds(target) || board.is_mountain(target) {
            return Err(ActionError::InvalidTarget(target));
        }
        let illegal = ActionError::IllegalAction { piece, target };
        let rule_set = rules::rules_for(actor.kind, &self.rules).ok_or(illegal.clone())?;

        let hostile = board.piece_at(target).is_some_and(|p| p.is_enemy_of(&actor));
        let outcome = if hostile {
            let strike = rule_set
                .attack
                .strike_at(board, &actor, target)
                .ok_or(illegal)?;
            self.resolve_strike(board, piece, actor.position, strike, rule_set.attack.after)?
        } else if rules::valid_moves(board, &actor, &self.rules).contains(&target) {
            board.move_piece(piece, actor.position, target)?;
            tracing::debug!(piece = %piece, from = %actor.position, to = %target, "piece moved");
            ActionOutcome {
                kind: ActionKind::Moved,
                piece,
                from: actor.position,
                to: target,
                captures: Vec::new(),
                follow_up: None,
                next_turn: actor.owner,
            }
        } else {
            return Err(illegal);
        };

        let event = self.advance();
        Ok(ActionOutcome {
            next_turn: event.current,
            ..outcome
        })
    }

    fn resolve_strike(
        &mut self,
        board: &mut BoardState,
        piece: PieceId,
        from: Cell,
        strike: Strike,
        after: AfterCapture,
    ) -> Result<ActionOutcome, ActionError> {
        let mut sequence = StrikeSequence::new(piece, strike, after);
        let observer = &mut self.on_capture;
        let captures = sequence.run(board, |board, event| {
            if let Some(callback) = observer.as_mut() {
                callback(board, event);
            }
        })?;
        let to = captures.last().map_or(from, |c| c.attacker_at);
        let kind = match after {
            AfterCapture::Hold => ActionKind::Captured,
            AfterCapture::Advance => ActionKind::CapturedAndRelocated,
        };
        Ok(ActionOutcome {
            kind,
            piece,
            from,
            to,
            captures,
            follow_up: strike.follow_up,
            next_turn: self.current,
        })
    }

    /// Hands the turn to the other side and notifies the observer.
    fn advance(&mut self) -> TurnEvent {
        self.current = self.current.opponent();
        self.turn += 1;
        let event = self.event();
        tracing::debug!(current = %event.current, turn = event.turn, "turn changed");
        if let Some(observer) = self.on_turn.as_mut() {
            observer(&event);
        }
        event
    }
}
