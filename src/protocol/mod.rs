//! Text protocol.
//!
//! Position notation for compact board snapshots, and the command parser
//! for the line-based command loop.

pub mod notation;
pub mod parser;

pub use notation::{encode_position, parse_position, NotationError};
pub use parser::{parse_command, Command};
