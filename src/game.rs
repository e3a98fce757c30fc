//! Game session.
//!
//! A `Game` owns the board, one placement strategy per side, and, once play
//! has started, the turn controller. Setup operations are only accepted in
//! the setup phase and actions only in the play phase.

use serde::Serialize;

use crate::board::{BoardState, Cell, Piece, PieceType, Side, ALL_SIDES};
use crate::config::{ConfigError, GameConfig};
use crate::placement::{
    AutomaticPlacement, ManualPlacement, PlacementError, PlacementReport, PlacementStrategy, Placed,
};
use crate::protocol::notation::{parse_position, NotationError};
use crate::rules;
use crate::turn::{ActionError, ActionOutcome, TurnController, TurnEvent};

/// Session phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Setup,
    Play,
}

/// Errors raised by session operations.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error("{0} has not placed its King")]
    KingMissing(Side),

    #[error("play has not started")]
    NotStarted,

    #[error("no piece on {0}")]
    EmptyCell(Cell),

    #[error("position is {size}x{size}, config expects {expected}")]
    SizeMismatch { size: i32, expected: i32 },

    #[error(transparent)]
    Placement(#[from] PlacementError),

    #[error(transparent)]
    Action(#[from] ActionError),

    #[error(transparent)]
    Notation(#[from] NotationError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

type Strategy = Box<dyn PlacementStrategy + Send>;

const fn slot(side: Side) -> usize {
    match side {
        Side::Side1 => 0,
        Side::Side2 => 1,
    }
}

fn manual_pair(config: &GameConfig) -> [Strategy; 2] {
    [
        Box::new(ManualPlacement::new(Side::Side1, config)),
        Box::new(ManualPlacement::new(Side::Side2, config)),
    ]
}

/// One game from setup through play.
pub struct Game {
    config: GameConfig,
    board: BoardState,
    strategies: [Strategy; 2],
    phase: Phase,
    turn: Option<TurnController>,
}

impl Game {
    /// Creates a game in the setup phase with manual placement for both
    /// sides and the configured default mountain allotment.
    pub fn new(config: GameConfig) -> Result<Self, GameError> {
        config.validate()?;
        let mut board = BoardState::new(config.board_size)?;
        let mut strategies = manual_pair(&config);
        for strategy in &mut strategies {
            strategy.initialize(&mut board, config.mountains_per_side);
        }
        Ok(Game {
            config,
            board,
            strategies,
            phase: Phase::Setup,
            turn: None,
        })
    }

    /// Builds a game already in play from a position string.
    pub fn from_position(config: GameConfig, position: &str, first: Side) -> Result<Self, GameError> {
        // Play never consults the setup zones, so any board size goes.
        config.validate_board_size()?;
        let board = parse_position(position)?;
        if board.size() != config.board_size {
            return Err(GameError::SizeMismatch {
                size: board.size(),
                expected: config.board_size,
            });
        }
        let strategies = manual_pair(&config);
        let (turn, _) = TurnController::start(&board, first, &config.rules);
        Ok(Game {
            config,
            board,
            strategies,
            phase: Phase::Play,
            turn: Some(turn),
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn board(&self) -> &BoardState {
        &self.board
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Side to act, once play has started.
    pub fn current_side(&self) -> Option<Side> {
        self.turn.as_ref().map(|t| t.current())
    }

    /// The turn controller, for registering observers.
    pub fn turn_controller_mut(&mut self) -> Option<&mut TurnController> {
        self.turn.as_mut()
    }

    fn ensure_setup(&self) -> Result<(), PlacementError> {
        match self.phase {
            Phase::Setup => Ok(()),
            Phase::Play => Err(PlacementError::WrongPhase),
        }
    }

    /// Switches `side` to manual placement and clears its setup.
    pub fn manual_setup(&mut self, side: Side, mountains: u32) -> Result<PlacementReport, GameError> {
        let strategy = Box::new(ManualPlacement::new(side, &self.config));
        self.install(side, strategy, mountains)
    }

    /// Lays out `side`'s army automatically.
    pub fn auto_place(&mut self, side: Side, mountains: u32) -> Result<PlacementReport, GameError> {
        let strategy = Box::new(AutomaticPlacement::new(side, &self.config));
        self.install(side, strategy, mountains)
    }

    fn install(&mut self, side: Side, strategy: Strategy, mountains: u32) -> Result<PlacementReport, GameError> {
        self.ensure_setup()?;
        let entry = &mut self.strategies[slot(side)];
        *entry = strategy;
        Ok(entry.initialize(&mut self.board, mountains))
    }

    pub fn can_place(&self, side: Side, kind: PieceType, cell: Cell) -> bool {
        self.phase == Phase::Setup && self.strategies[slot(side)].can_place(&self.board, kind, cell)
    }

    pub fn place(&mut self, side: Side, kind: PieceType, cell: Cell) -> Result<Placed, GameError> {
        self.ensure_setup()?;
        Ok(self.strategies[slot(side)].place(&mut self.board, kind, cell)?)
    }

    pub fn remove(&mut self, side: Side, cell: Cell) -> Result<Option<PieceType>, GameError> {
        self.ensure_setup()?;
        Ok(self.strategies[slot(side)].remove(&mut self.board, cell)?)
    }

    pub fn move_unit(&mut self, side: Side, from: Cell, to: Cell) -> Result<(), GameError> {
        self.ensure_setup()?;
        Ok(self.strategies[slot(side)].move_piece(&mut self.board, from, to)?)
    }

    pub fn remaining(&self, side: Side, kind: PieceType) -> u32 {
        self.strategies[slot(side)].remaining_count(kind)
    }

    pub fn has_completed_placement(&self, side: Side) -> bool {
        self.strategies[slot(side)].has_completed_placement()
    }

    /// Ends setup and hands the first turn to `first`. Both Kings must be on
    /// the board; anything left in a reserve stays off it.
    pub fn start_play(&mut self, first: Side) -> Result<TurnEvent, GameError> {
        self.ensure_setup()?;
        for side in ALL_SIDES {
            if !self.strategies[slot(side)].is_king_placed(&self.board) {
                return Err(GameError::KingMissing(side));
            }
        }
        let (turn, event) = TurnController::start(&self.board, first, &self.config.rules);
        self.turn = Some(turn);
        self.phase = Phase::Play;
        tracing::info!(first = %first, "setup finished");
        Ok(event)
    }

    fn piece_on(&self, cell: Cell) -> Result<&Piece, GameError> {
        self.board.piece_at(cell).ok_or(GameError::EmptyCell(cell))
    }

    /// Empty cells the piece on `cell` may move to.
    pub fn valid_moves(&self, cell: Cell) -> Result<Vec<Cell>, GameError> {
        let piece = self.piece_on(cell)?;
        Ok(rules::valid_moves(&self.board, piece, &self.config.rules))
    }

    /// Enemy-held cells the piece on `cell` may attack.
    pub fn attack_moves(&self, cell: Cell) -> Result<Vec<Cell>, GameError> {
        let piece = self.piece_on(cell)?;
        Ok(rules::attack_moves(&self.board, piece, &self.config.rules))
    }

    /// Cells the piece on `cell` threatens.
    pub fn potential_attack_cells(&self, cell: Cell) -> Result<Vec<Cell>, GameError> {
        let piece = self.piece_on(cell)?;
        Ok(rules::potential_attack_cells(&self.board, piece, &self.config.rules))
    }

    /// Moves or attacks with the piece on `from`.
    pub fn act(&mut self, from: Cell, target: Cell) -> Result<ActionOutcome, GameError> {
        let id = self.piece_on(from)?.id;
        let turn = self.turn.as_mut().ok_or(GameError::NotStarted)?;
        Ok(turn.attempt_action(&mut self.board, id, target)?)
    }
}
