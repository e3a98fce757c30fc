//! Cyvasse rules engine library.
//!
//! Exposes the board model, piece rules, placement strategies, turn control,
//! the game session, and the text protocol for use by integration tests and
//! the binary entry points.

pub mod audit;
pub mod board;
pub mod config;
pub mod engine;
pub mod game;
pub mod placement;
pub mod protocol;
pub mod rules;
pub mod turn;
