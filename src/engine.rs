//! Engine state management.
//!
//! Holds the active game session and the configuration used to start new
//! ones, and turns each parsed command into one or more response lines.
//! Options set with `setoption` take effect at the next `newgame`.

use std::collections::HashMap;
use std::io::{self, Write};

use crate::board::{Cell, PieceType, Side, ALL_PIECE_TYPES};
use crate::config::GameConfig;
use crate::game::{Game, GameError};
use crate::protocol::encode_position;
use crate::turn::ActionKind;

/// Holds the mutable state of the engine between commands.
pub struct Engine {
    pub config: GameConfig,
    pub game: Option<Game>,
    pub options: HashMap<String, String>,
}

impl Default for Engine {
    fn default() -> Self {
        Engine::new(GameConfig::default())
    }
}

fn cells_line(cells: &[Cell]) -> String {
    let mut line = String::from("cells");
    for cell in cells {
        line.push(' ');
        line.push_str(&cell.to_string());
    }
    line
}

impl Engine {
    /// Creates an engine with no game in progress.
    pub fn new(config: GameConfig) -> Self {
        Engine {
            config,
            game: None,
            options: HashMap::new(),
        }
    }

    fn game(&mut self) -> Result<&mut Game, String> {
        self.game
            .as_mut()
            .ok_or_else(|| "no game in progress; send newgame first".to_string())
    }

    /// Writes `ok ...` or `error ...` for a fallible command.
    fn reply<W: Write>(out: &mut W, result: Result<String, String>) -> io::Result<()> {
        match result {
            Ok(line) => writeln!(out, "ok {}", line)?,
            Err(e) => writeln!(out, "error {}", e)?,
        }
        out.flush()
    }

    /// Handles the `isready` command.
    pub fn handle_isready<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "readyok")?;
        out.flush()
    }

    /// Records and applies an option to the configuration.
    pub fn handle_setoption<W: Write>(&mut self, out: &mut W, name: String, value: Option<String>) -> io::Result<()> {
        let value = value.unwrap_or_default();
        let result = match self.config.set_option(&name, &value) {
            Ok(()) => {
                let line = format!("setoption {} {}", name, value);
                self.options.insert(name, value);
                Ok(line)
            }
            Err(e) => Err(e.to_string()),
        };
        Engine::reply(out, result)
    }

    /// Starts a new game in the setup phase.
    pub fn handle_newgame<W: Write>(&mut self, out: &mut W, size: Option<i32>) -> io::Result<()> {
        let mut config = self.config.clone();
        if let Some(size) = size {
            config.board_size = size;
        }
        let result = match Game::new(config) {
            Ok(game) => {
                let line = format!("newgame {}", game.config().board_size);
                self.game = Some(game);
                Ok(line)
            }
            Err(e) => Err(e.to_string()),
        };
        Engine::reply(out, result)
    }

    /// Lays out a side automatically.
    pub fn handle_auto<W: Write>(&mut self, out: &mut W, side: Side, mountains: Option<u32>) -> io::Result<()> {
        let result = self.game().and_then(|game| {
            let mountains = mountains.unwrap_or(game.config().mountains_per_side);
            let report = game.auto_place(side, mountains).map_err(|e| e.to_string())?;
            Ok(format!(
                "auto {} placed {} mountains {} unplaced {}",
                side,
                report.placed.len(),
                report.mountains.len(),
                report.unplaced_count()
            ))
        });
        Engine::reply(out, result)
    }

    /// Resets a side to manual placement.
    pub fn handle_manual<W: Write>(&mut self, out: &mut W, side: Side, mountains: Option<u32>) -> io::Result<()> {
        let result = self.game().and_then(|game| {
            let mountains = mountains.unwrap_or(game.config().mountains_per_side);
            game.manual_setup(side, mountains).map_err(|e| e.to_string())?;
            Ok(format!("manual {}", side))
        });
        Engine::reply(out, result)
    }

    pub fn handle_place<W: Write>(&mut self, out: &mut W, side: Side, kind: PieceType, cell: Cell) -> io::Result<()> {
        let result = self.game().and_then(|game| {
            game.place(side, kind, cell).map_err(|e| e.to_string())?;
            Ok(format!("place {} {} {}", side, kind, cell))
        });
        Engine::reply(out, result)
    }

    pub fn handle_remove<W: Write>(&mut self, out: &mut W, side: Side, cell: Cell) -> io::Result<()> {
        let result = self.game().and_then(|game| {
            let removed = game.remove(side, cell).map_err(|e| e.to_string())?;
            Ok(match removed {
                Some(kind) => format!("remove {} {} {}", side, kind, cell),
                None => format!("remove {} none {}", side, cell),
            })
        });
        Engine::reply(out, result)
    }

    /// Prints what is left in a side's reserve as `reserve <side> kind:n ...`.
    pub fn handle_reserve<W: Write>(&mut self, out: &mut W, side: Side) -> io::Result<()> {
        let game = match self.game() {
            Ok(game) => game,
            Err(e) => return Engine::reply(out, Err(e)),
        };
        let mut line = format!("reserve {}", side);
        for kind in ALL_PIECE_TYPES {
            let n = game.remaining(side, kind);
            if n > 0 {
                line.push_str(&format!(" {}:{}", kind, n));
            }
        }
        writeln!(out, "{}", line)?;
        out.flush()
    }

    /// Ends setup; replies with the side to act.
    pub fn handle_start<W: Write>(&mut self, out: &mut W, first: Option<Side>) -> io::Result<()> {
        let first = first.unwrap_or(Side::Side1);
        match self.game().and_then(|game| game.start_play(first).map_err(|e| e.to_string())) {
            Ok(event) => writeln!(out, "turn {}", event.current)?,
            Err(e) => writeln!(out, "error {}", e)?,
        }
        out.flush()
    }

    /// Loads a position and starts play from it.
    pub fn handle_position<W: Write>(&mut self, out: &mut W, notation: &str, first: Option<Side>) -> io::Result<()> {
        let first = first.unwrap_or(Side::Side1);
        let mut config = self.config.clone();
        // The notation fixes the board size.
        config.board_size = notation.split('/').count() as i32;
        config.zone_depth = config.zone_depth.min(config.board_size / 2).max(1);
        match Game::from_position(config, notation, first) {
            Ok(game) => {
                self.game = Some(game);
                writeln!(out, "turn {}", first)?;
            }
            Err(e) => writeln!(out, "error {}", e)?,
        }
        out.flush()
    }

    /// Handles `moves`, `attacks`, and `threats`.
    pub fn handle_query<W: Write>(
        &mut self,
        out: &mut W,
        cell: Cell,
        query: fn(&Game, Cell) -> Result<Vec<Cell>, GameError>,
    ) -> io::Result<()> {
        let result = self
            .game()
            .and_then(|game| query(game, cell).map_err(|e| e.to_string()));
        match result {
            Ok(cells) => writeln!(out, "{}", cells_line(&cells))?,
            Err(e) => writeln!(out, "error {}", e)?,
        }
        out.flush()
    }

    /// Applies an action; replies with the outcome and the next turn.
    pub fn handle_act<W: Write>(&mut self, out: &mut W, from: Cell, to: Cell) -> io::Result<()> {
        match self.game().and_then(|game| game.act(from, to).map_err(|e| e.to_string())) {
            Ok(outcome) => {
                let kind = match outcome.kind {
                    ActionKind::Moved => "moved",
                    ActionKind::Captured => "captured",
                    ActionKind::CapturedAndRelocated => "captured_and_relocated",
                };
                let mut line = format!("ok {} {} {}", kind, outcome.from, outcome.to);
                for capture in &outcome.captures {
                    line.push_str(&format!(" x{}", capture.target));
                }
                writeln!(out, "{}", line)?;
                writeln!(out, "turn {}", outcome.next_turn)?;
            }
            Err(e) => writeln!(out, "error {}", e)?,
        }
        out.flush()
    }

    /// Prints the board in position notation.
    pub fn handle_board<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        match self.game() {
            Ok(game) => writeln!(out, "board {}", encode_position(game.board()))?,
            Err(e) => writeln!(out, "error {}", e)?,
        }
        out.flush()
    }
}
