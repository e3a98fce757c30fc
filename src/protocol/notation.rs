//! Position notation.
//!
//! A compact, FEN-like encoding of a board position, used for scripted setups
//! and for printing the board from the command loop.
//!
//! Rows are listed from the top of the board (z = size-1) down to z = 0 and
//! separated by `/`. Within a row, cells run from x = 0 upward. Uppercase
//! letters are Side1 pieces, lowercase letters Side2 pieces, `M` (either
//! case) is a mountain, and a decimal number is a run of empty cells. The
//! board is square: the number of rows is its size.
//!
//! Example (4x4): `1k2/4/1M2/K2R`

use crate::board::{BoardError, BoardState, Cell, PieceType, Side};
use crate::config::ConfigError;

/// Errors that can occur while parsing a position.
#[derive(Debug, thiserror::Error)]
pub enum NotationError {
    #[error("empty position")]
    Empty,

    #[error("row {row} covers {width} cells, expected {expected}")]
    RowWidth { row: i32, width: i32, expected: i32 },

    #[error("invalid piece character: '{0}'")]
    InvalidPiece(char),

    #[error("invalid empty-run length: '{0}'")]
    InvalidRun(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Board(#[from] BoardError),
}

/// Parses a position into a fresh board. Piece ids follow reading order.
pub fn parse_position(s: &str) -> Result<BoardState, NotationError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(NotationError::Empty);
    }
    let rows: Vec<&str> = s.split('/').collect();
    let size = rows.len() as i32;
    let mut board = BoardState::new(size)?;

    for (i, row) in rows.iter().enumerate() {
        let z = size - 1 - i as i32;
        let width = parse_row(row, z, size, &mut board)?;
        if width != size {
            return Err(NotationError::RowWidth {
                row: z,
                width,
                expected: size,
            });
        }
    }
    Ok(board)
}

/// Fills one row. Returns how many cells the row described.
fn parse_row(row: &str, z: i32, size: i32, board: &mut BoardState) -> Result<i32, NotationError> {
    let mut x = 0;
    let mut run = String::new();

    for c in row.chars() {
        if c.is_ascii_digit() {
            run.push(c);
            continue;
        }
        x += take_run(&mut run, size)?;
        if x >= size {
            return Err(NotationError::RowWidth {
                row: z,
                width: x + 1,
                expected: size,
            });
        }
        let cell = Cell::new(x, z);
        let kind = PieceType::from_notation_char(c).ok_or(NotationError::InvalidPiece(c))?;
        if kind.is_terrain() {
            board.place_mountain(cell)?;
        } else {
            let owner = if c.is_ascii_uppercase() { Side::Side1 } else { Side::Side2 };
            board.spawn(owner, kind, cell)?;
        }
        x += 1;
    }
    x += take_run(&mut run, size)?;
    Ok(x)
}

/// Consumes a pending empty run. A run longer than the board is rejected here
/// so the width arithmetic stays small.
fn take_run(run: &mut String, size: i32) -> Result<i32, NotationError> {
    if run.is_empty() {
        return Ok(0);
    }
    let n: i32 = run
        .parse()
        .ok()
        .filter(|n| (1..=size).contains(n))
        .ok_or_else(|| NotationError::InvalidRun(run.clone()))?;
    run.clear();
    Ok(n)
}

/// Encodes a board as a position string.
pub fn encode_position(board: &BoardState) -> String {
    let size = board.size();
    let mut rows = Vec::with_capacity(size as usize);

    for z in (0..size).rev() {
        let mut row = String::new();
        let mut empty = 0;
        for x in 0..size {
            let cell = Cell::new(x, z);
            let c = if board.is_mountain(cell) {
                Some(PieceType::Mountain.notation_char())
            } else {
                board.piece_at(cell).map(|p| p.notation_char())
            };
            match c {
                Some(c) => {
                    if empty > 0 {
                        row.push_str(&empty.to_string());
                        empty = 0;
                    }
                    row.push(c);
                }
                None => empty += 1,
            }
        }
        if empty > 0 {
            row.push_str(&empty.to_string());
        }
        rows.push(row);
    }
    rows.join("/")
}
