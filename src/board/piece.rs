//! Piece catalog: sides, piece types, and live pieces.
//!
//! A `Piece` is identity plus position. All behavior lives in the rules
//! module, keyed by `PieceType`.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::cell::Cell;

/// One of the two players.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Side1,
    Side2,
}

/// Both sides in play order.
pub const ALL_SIDES: [Side; 2] = [Side::Side1, Side::Side2];

impl Side {
    /// Returns the other side.
    pub const fn opponent(self) -> Side {
        match self {
            Side::Side1 => Side::Side2,
            Side::Side2 => Side::Side1,
        }
    }

    /// Returns the z step pointing toward the enemy edge.
    pub const fn forward(self) -> i32 {
        match self {
            Side::Side1 => 1,
            Side::Side2 => -1,
        }
    }

    /// Returns the lowercase name used by the command protocol.
    pub const fn name(self) -> &'static str {
        match self {
            Side::Side1 => "side1",
            Side::Side2 => "side2",
        }
    }

    /// Parses a side from its protocol name (`side1`/`1`, `side2`/`2`).
    pub fn from_name(name: &str) -> Option<Side> {
        match name {
            "side1" | "1" => Some(Side::Side1),
            "side2" | "2" => Some(Side::Side2),
            _ => None,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The 13 piece types. `Mountain` is terrain and binds no rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PieceType {
    King,
    Dragon,
    Elephant,
    #[serde(alias = "heavy_horse")]
    HeavyCavalry,
    LightHorse,
    Spearman,
    Crossbowman,
    Rabble,
    Catapult,
    Trebuchet,
    Mountain,
    Swordsman,
    Archer,
}

/// Every piece type, in catalog order.
pub const ALL_PIECE_TYPES: [PieceType; 13] = [
    PieceType::King,
    PieceType::Dragon,
    PieceType::Elephant,
    PieceType::HeavyCavalry,
    PieceType::LightHorse,
    PieceType::Spearman,
    PieceType::Crossbowman,
    PieceType::Rabble,
    PieceType::Catapult,
    PieceType::Trebuchet,
    PieceType::Mountain,
    PieceType::Swordsman,
    PieceType::Archer,
];

impl PieceType {
    /// Returns true for terrain types that occupy the mountain layer.
    pub const fn is_terrain(self) -> bool {
        matches!(self, PieceType::Mountain)
    }

    /// Returns the uppercase notation letter (Side1 form).
    pub const fn notation_char(self) -> char {
        match self {
            PieceType::King => 'K',
            PieceType::Dragon => 'D',
            PieceType::Elephant => 'E',
            PieceType::HeavyCavalry => 'H',
            PieceType::LightHorse => 'L',
            PieceType::Spearman => 'S',
            PieceType::Crossbowman => 'X',
            PieceType::Rabble => 'R',
            PieceType::Catapult => 'C',
            PieceType::Trebuchet => 'T',
            PieceType::Mountain => 'M',
            PieceType::Swordsman => 'W',
            PieceType::Archer => 'A',
        }
    }

    /// Parses a piece type from its notation letter, ignoring case.
    pub fn from_notation_char(c: char) -> Option<PieceType> {
        match c.to_ascii_uppercase() {
            'K' => Some(PieceType::King),
            'D' => Some(PieceType::Dragon),
            'E' => Some(PieceType::Elephant),
            'H' => Some(PieceType::HeavyCavalry),
            'L' => Some(PieceType::LightHorse),
            'S' => Some(PieceType::Spearman),
            'X' => Some(PieceType::Crossbowman),
            'R' => Some(PieceType::Rabble),
            'C' => Some(PieceType::Catapult),
            'T' => Some(PieceType::Trebuchet),
            'M' => Some(PieceType::Mountain),
            'W' => Some(PieceType::Swordsman),
            'A' => Some(PieceType::Archer),
            _ => None,
        }
    }

    /// Returns the lowercase protocol name.
    pub const fn name(self) -> &'static str {
        match self {
            PieceType::King => "king",
            PieceType::Dragon => "dragon",
            PieceType::Elephant => "elephant",
            PieceType::HeavyCavalry => "heavy_cavalry",
            PieceType::LightHorse => "light_horse",
            PieceType::Spearman => "spearman",
            PieceType::Crossbowman => "crossbowman",
            PieceType::Rabble => "rabble",
            PieceType::Catapult => "catapult",
            PieceType::Trebuchet => "trebuchet",
            PieceType::Mountain => "mountain",
            PieceType::Swordsman => "swordsman",
            PieceType::Archer => "archer",
        }
    }

    /// Parses a piece type from its protocol name or notation letter.
    pub fn from_name(name: &str) -> Option<PieceType> {
        if name == "heavy_horse" {
            return Some(PieceType::HeavyCavalry);
        }
        if let Some(kind) = ALL_PIECE_TYPES.iter().find(|k| k.name() == name) {
            return Some(*kind);
        }
        let mut chars = name.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => PieceType::from_notation_char(c),
            _ => None,
        }
    }
}

impl fmt::Display for PieceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Stable identifier of a live piece. Ids are never reused within a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PieceId(pub u32);

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A piece on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub id: PieceId,
    pub owner: Side,
    pub kind: PieceType,
    pub position: Cell,
}

impl Piece {
    /// Returns true if `other` belongs to the opposing side.
    pub fn is_enemy_of(&self, other: &Piece) -> bool {
        self.owner != other.owner
    }

    /// Returns the notation letter: uppercase for Side1, lowercase for Side2.
    pub fn notation_char(&self) -> char {
        let c = self.kind.notation_char();
        match self.owner {
            Side::Side1 => c,
            Side::Side2 => c.to_ascii_lowercase(),
        }
    }
}
