//! Command parser.
//!
//! Parses lines read by the command loop into structured `Command` variants
//! that the main loop can dispatch on.

use crate::board::{Cell, PieceType, Side};

/// A parsed command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Synchronization ping; the engine replies `readyok`.
    IsReady,

    /// Set an option: `setoption name <id> value <x>`.
    SetOption { name: String, value: Option<String> },

    /// Start a fresh game in the setup phase: `newgame [size]`.
    NewGame { size: Option<i32> },

    /// Lay out a side automatically: `auto <side> [mountains]`.
    Auto { side: Side, mountains: Option<u32> },

    /// Reset a side to manual placement: `manual <side> [mountains]`.
    Manual { side: Side, mountains: Option<u32> },

    /// Place one unit from the reserve: `place <side> <piece> <x> <z>`.
    Place { side: Side, kind: PieceType, cell: Cell },

    /// Return a placed unit to the reserve: `remove <side> <x> <z>`.
    Remove { side: Side, cell: Cell },

    /// Print a side's remaining reserve: `reserve <side>`.
    Reserve { side: Side },

    /// End setup: `start [side]`.
    Start { first: Option<Side> },

    /// Load a position and start play: `position <notation> [side]`.
    Position { notation: String, first: Option<Side> },

    /// Legal destinations of the piece on a cell: `moves <x> <z>`.
    Moves(Cell),

    /// Attackable cells of the piece on a cell: `attacks <x> <z>`.
    Attacks(Cell),

    /// Threatened cells of the piece on a cell: `threats <x> <z>`.
    Threats(Cell),

    /// Move or attack: `act <x> <z> <tx> <tz>`.
    Act { from: Cell, to: Cell },

    /// Print the current position.
    Board,

    /// Terminate the process.
    Quit,
}

/// Parses a single line of input into a `Command`.
///
/// Returns `None` for empty lines or unrecognized commands. Malformed
/// arguments for known commands also return `None` after logging to stderr.
pub fn parse_command(line: &str) -> Option<Command> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let (&head, args) = tokens.split_first()?;

    match head {
        "isready" => Some(Command::IsReady),
        "quit" => Some(Command::Quit),
        "board" => Some(Command::Board),

        "setoption" => parse_setoption(args),
        "newgame" => parse_newgame(args),
        "auto" => parse_layout(args, "auto").map(|(side, mountains)| Command::Auto { side, mountains }),
        "manual" => parse_layout(args, "manual").map(|(side, mountains)| Command::Manual { side, mountains }),
        "place" => parse_place(args),
        "remove" => parse_remove(args),
        "reserve" => parse_reserve(args),
        "start" => parse_start(args),
        "position" => parse_position(args),
        "moves" => parse_cell(args, "moves").map(Command::Moves),
        "attacks" => parse_cell(args, "attacks").map(Command::Attacks),
        "threats" => parse_cell(args, "threats").map(Command::Threats),
        "act" => parse_act(args),

        other => {
            eprintln!("unknown command: {}", other);
            None
        }
    }
}

/// Parses `setoption name <id> [value <v>]`. The value may contain spaces.
fn parse_setoption(args: &[&str]) -> Option<Command> {
    let ["name", rest @ ..] = args else {
        eprintln!("malformed setoption: expected 'setoption name <id> [value <v>]'");
        return None;
    };
    let (name, value) = match rest.iter().position(|&t| t == "value") {
        Some(at) => (&rest[..at], Some(rest[at + 1..].join(" "))),
        None => (rest, None),
    };
    if name.is_empty() {
        eprintln!("malformed setoption: missing option id");
        return None;
    }
    Some(Command::SetOption {
        name: name.join(" "),
        value: value.filter(|v| !v.is_empty()),
    })
}

fn parse_side(token: &str) -> Option<Side> {
    let side = Side::from_name(token);
    if side.is_none() {
        eprintln!("unknown side: '{}'", token);
    }
    side
}

fn parse_number<T: std::str::FromStr>(token: &str, what: &str) -> Option<T> {
    match token.parse() {
        Ok(v) => Some(v),
        Err(_) => {
            eprintln!("invalid {} value: '{}'", what, token);
            None
        }
    }
}

fn parse_coords(x: &str, z: &str) -> Option<Cell> {
    Some(Cell::new(parse_number(x, "x")?, parse_number(z, "z")?))
}

/// Parses `newgame [size]`.
fn parse_newgame(args: &[&str]) -> Option<Command> {
    let size = match args.first() {
        Some(token) => Some(parse_number(token, "size")?),
        None => None,
    };
    Some(Command::NewGame { size })
}

/// Parses `<side> [mountains]` for `auto` and `manual`.
fn parse_layout(args: &[&str], name: &str) -> Option<(Side, Option<u32>)> {
    let Some(side) = args.first() else {
        eprintln!("malformed {}: expected '{} <side> [mountains]'", name, name);
        return None;
    };
    let side = parse_side(side)?;
    let mountains = match args.get(1) {
        Some(token) => Some(parse_number(token, "mountains")?),
        None => None,
    };
    Some((side, mountains))
}

/// Parses `place <side> <piece> <x> <z>`.
fn parse_place(args: &[&str]) -> Option<Command> {
    let [side, piece, x, z] = args else {
        eprintln!("malformed place: expected 'place <side> <piece> <x> <z>'");
        return None;
    };
    let side = parse_side(side)?;
    let Some(kind) = PieceType::from_name(piece) else {
        eprintln!("unknown piece: '{}'", piece);
        return None;
    };
    let cell = parse_coords(x, z)?;
    Some(Command::Place { side, kind, cell })
}

/// Parses `remove <side> <x> <z>`.
fn parse_remove(args: &[&str]) -> Option<Command> {
    let [side, x, z] = args else {
        eprintln!("malformed remove: expected 'remove <side> <x> <z>'");
        return None;
    };
    Some(Command::Remove {
        side: parse_side(side)?,
        cell: parse_coords(x, z)?,
    })
}

/// Parses `reserve <side>`.
fn parse_reserve(args: &[&str]) -> Option<Command> {
    let [side] = args else {
        eprintln!("malformed reserve: expected 'reserve <side>'");
        return None;
    };
    Some(Command::Reserve { side: parse_side(side)? })
}

/// Parses `start [side]`.
fn parse_start(args: &[&str]) -> Option<Command> {
    let first = match args.first() {
        Some(token) => Some(parse_side(token)?),
        None => None,
    };
    Some(Command::Start { first })
}

/// Parses `position <notation> [side]`.
fn parse_position(args: &[&str]) -> Option<Command> {
    let Some(notation) = args.first() else {
        eprintln!("malformed position: expected 'position <notation> [side]'");
        return None;
    };
    let first = match args.get(1) {
        Some(token) => Some(parse_side(token)?),
        None => None,
    };
    Some(Command::Position {
        notation: notation.to_string(),
        first,
    })
}

/// Parses `<x> <z>` for the cell queries.
fn parse_cell(args: &[&str], name: &str) -> Option<Cell> {
    let [x, z] = args else {
        eprintln!("malformed {}: expected '{} <x> <z>'", name, name);
        return None;
    };
    parse_coords(x, z)
}

/// Parses `act <x> <z> <tx> <tz>`.
fn parse_act(args: &[&str]) -> Option<Command> {
    let [x, z, tx, tz] = args else {
        eprintln!("malformed act: expected 'act <x> <z> <tx> <tz>'");
        return None;
    };
    Some(Command::Act {
        from: parse_coords(x, z)?,
        to: parse_coords(tx, tz)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_simple_commands() {
        assert_eq!(parse_command("isready"), Some(Command::IsReady));
        assert_eq!(parse_command("quit"), Some(Command::Quit));
        assert_eq!(parse_command("board"), Some(Command::Board));
    }

    #[test]
    fn blank_and_unknown_lines_yield_nothing() {
        for line in ["", "   ", "\t", "foobar 1 2"] {
            assert_eq!(parse_command(line), None, "{:?}", line);
        }
    }

    #[test]
    fn parse_newgame_with_and_without_size() {
        assert_eq!(parse_command("newgame"), Some(Command::NewGame { size: None }));
        assert_eq!(parse_command("newgame 8"), Some(Command::NewGame { size: Some(8) }));
        assert_eq!(parse_command("newgame big"), None);
    }

    #[test]
    fn setoption_with_value() {
        assert_eq!(
            parse_command("setoption name Army.rabble value 4"),
            Some(Command::SetOption {
                name: "Army.rabble".to_string(),
                value: Some("4".to_string()),
            })
        );
    }

    #[test]
    fn setoption_without_value() {
        assert_eq!(
            parse_command("setoption name Seed"),
            Some(Command::SetOption {
                name: "Seed".to_string(),
                value: None,
            })
        );
    }

    #[test]
    fn malformed_setoption_is_rejected() {
        for line in ["setoption", "setoption Seed 3", "setoption name value 3"] {
            assert_eq!(parse_command(line), None, "{}", line);
        }
    }

    #[test]
    fn parse_auto_and_manual() {
        assert_eq!(
            parse_command("auto side1 4"),
            Some(Command::Auto { side: Side::Side1, mountains: Some(4) })
        );
        assert_eq!(
            parse_command("auto 2"),
            Some(Command::Auto { side: Side::Side2, mountains: None })
        );
        assert_eq!(
            parse_command("manual side2 0"),
            Some(Command::Manual { side: Side::Side2, mountains: Some(0) })
        );
        assert_eq!(parse_command("auto"), None);
        assert_eq!(parse_command("auto side3"), None);
    }

    #[test]
    fn parse_place_and_remove() {
        assert_eq!(
            parse_command("place side1 heavy_cavalry 3 2"),
            Some(Command::Place {
                side: Side::Side1,
                kind: PieceType::HeavyCavalry,
                cell: Cell::new(3, 2),
            })
        );
        assert_eq!(
            parse_command("place side2 M 0 7"),
            Some(Command::Place {
                side: Side::Side2,
                kind: PieceType::Mountain,
                cell: Cell::new(0, 7),
            })
        );
        assert_eq!(parse_command("place side1 wizard 3 2"), None);
        assert_eq!(parse_command("place side1 king 3"), None);
        assert_eq!(
            parse_command("remove side1 3 2"),
            Some(Command::Remove { side: Side::Side1, cell: Cell::new(3, 2) })
        );
        assert_eq!(parse_command("reserve side2"), Some(Command::Reserve { side: Side::Side2 }));
    }

    #[test]
    fn parse_start_and_position() {
        assert_eq!(parse_command("start"), Some(Command::Start { first: None }));
        assert_eq!(
            parse_command("start side2"),
            Some(Command::Start { first: Some(Side::Side2) })
        );
        assert_eq!(
            parse_command("position 1k2/4/4/K3 side2"),
            Some(Command::Position {
                notation: "1k2/4/4/K3".to_string(),
                first: Some(Side::Side2),
            })
        );
        assert_eq!(parse_command("position"), None);
    }

    #[test]
    fn parse_queries_and_act() {
        assert_eq!(parse_command("moves 4 0"), Some(Command::Moves(Cell::new(4, 0))));
        assert_eq!(parse_command("attacks 4 4"), Some(Command::Attacks(Cell::new(4, 4))));
        assert_eq!(parse_command("threats 0 0"), Some(Command::Threats(Cell::new(0, 0))));
        assert_eq!(parse_command("moves 4"), None);
        assert_eq!(
            parse_command("act 0 0 0 3"),
            Some(Command::Act { from: Cell::new(0, 0), to: Cell::new(0, 3) })
        );
        assert_eq!(parse_command("act 0 0 x 3"), None);
    }

    #[test]
    fn parse_with_leading_trailing_whitespace() {
        assert_eq!(parse_command("  isready  "), Some(Command::IsReady));
        assert_eq!(parse_command("\tmoves  1   2 "), Some(Command::Moves(Cell::new(1, 2))));
    }
}
