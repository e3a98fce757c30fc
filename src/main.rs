//! Cyvasse command loop.
//!
//! Reads commands from stdin and writes one or more response lines per
//! command to stdout. Diagnostics go to stderr through `tracing`; set
//! `RUST_LOG=debug` to follow placement and turn steps.
//!
//! Usage: `cyvasse [CONFIG.json]`

use std::env;
use std::io::{self, BufRead};
use std::process;

use tracing_subscriber::EnvFilter;

use cyvasse::config::GameConfig;
use cyvasse::engine::Engine;
use cyvasse::game::Game;
use cyvasse::protocol::parser::{parse_command, Command};

fn main() -> io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let config = match env::args().nth(1) {
        Some(path) => match GameConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("failed to load {}: {}", path, e);
                process::exit(1);
            }
        },
        None => GameConfig::default(),
    };

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    let mut engine = Engine::new(config);

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => break,
        };

        let cmd = match parse_command(&line) {
            Some(c) => c,
            None => continue,
        };

        match cmd {
            Command::IsReady => engine.handle_isready(&mut out)?,
            Command::SetOption { name, value } => engine.handle_setoption(&mut out, name, value)?,
            Command::NewGame { size } => engine.handle_newgame(&mut out, size)?,
            Command::Auto { side, mountains } => engine.handle_auto(&mut out, side, mountains)?,
            Command::Manual { side, mountains } => engine.handle_manual(&mut out, side, mountains)?,
            Command::Place { side, kind, cell } => engine.handle_place(&mut out, side, kind, cell)?,
            Command::Remove { side, cell } => engine.handle_remove(&mut out, side, cell)?,
            Command::Reserve { side } => engine.handle_reserve(&mut out, side)?,
            Command::Start { first } => engine.handle_start(&mut out, first)?,
            Command::Position { notation, first } => engine.handle_position(&mut out, &notation, first)?,
            Command::Moves(cell) => engine.handle_query(&mut out, cell, Game::valid_moves)?,
            Command::Attacks(cell) => engine.handle_query(&mut out, cell, Game::attack_moves)?,
            Command::Threats(cell) => engine.handle_query(&mut out, cell, Game::potential_attack_cells)?,
            Command::Act { from, to } => engine.handle_act(&mut out, from, to)?,
            Command::Board => engine.handle_board(&mut out)?,
            Command::Quit => break,
        }
    }
    Ok(())
}
