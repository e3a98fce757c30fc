//! Game configuration.
//!
//! A `GameConfig` fixes the board geometry, the rule switches, the army each
//! side brings, and the RNG seed for automatic placement. Every field has a
//! default so a JSON file only needs to name what it changes.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::board::PieceType;

/// Board side length of the standard game.
pub const DEFAULT_BOARD_SIZE: i32 = 10;

/// Rows each side may place into on the standard board.
pub const DEFAULT_ZONE_DEPTH: i32 = 4;

/// Upper bound on mountains a side may place.
pub const MAX_MOUNTAINS: u32 = 8;

/// Errors raised while building or loading a configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("board size must be positive, got {0}")]
    InvalidBoardSize(i32),

    #[error("zone depth {depth} does not fit two zones on a board of size {size}")]
    InvalidZoneDepth { depth: i32, size: i32 },

    #[error("unknown option '{0}'")]
    UnknownOption(String),

    #[error("invalid value '{value}' for option '{name}'")]
    InvalidOptionValue { name: String, value: String },

    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Switches that change how the rule table behaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// When false, an archer hits any enemy within range regardless of what
    /// stands between them.
    pub archer_requires_clear_path: bool,
}

impl Default for RulesConfig {
    fn default() -> Self {
        RulesConfig {
            archer_requires_clear_path: true,
        }
    }
}

/// Full configuration for a game session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub board_size: i32,
    pub zone_depth: i32,
    /// Cap applied to any requested mountain count.
    pub max_mountains: u32,
    /// Mountain count used when a caller does not ask for one.
    pub mountains_per_side: u32,
    pub rules: RulesConfig,
    /// Units each side starts with in its reserve. Mountains are not listed
    /// here; their count comes from the placement request.
    pub army: BTreeMap<PieceType, u32>,
    /// Seed for automatic placement (0 = entropy).
    pub seed: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            board_size: DEFAULT_BOARD_SIZE,
            zone_depth: DEFAULT_ZONE_DEPTH,
            max_mountains: MAX_MOUNTAINS,
            mountains_per_side: 6,
            rules: RulesConfig::default(),
            army: default_army(),
            seed: 0,
        }
    }
}

/// The standard army: twenty units per side.
pub fn default_army() -> BTreeMap<PieceType, u32> {
    BTreeMap::from([
        (PieceType::King, 1),
        (PieceType::Dragon, 1),
        (PieceType::Elephant, 2),
        (PieceType::HeavyCavalry, 2),
        (PieceType::LightHorse, 2),
        (PieceType::Spearman, 2),
        (PieceType::Crossbowman, 2),
        (PieceType::Rabble, 6),
        (PieceType::Catapult, 1),
        (PieceType::Trebuchet, 1),
    ])
}

impl GameConfig {
    /// Parses a configuration from JSON and validates it.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Checks the geometry: a positive board with room for both zones.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_board_size()?;
        if self.zone_depth <= 0 || self.zone_depth * 2 > self.board_size {
            return Err(ConfigError::InvalidZoneDepth {
                depth: self.zone_depth,
                size: self.board_size,
            });
        }
        Ok(())
    }

    /// Checks only that the board has at least one cell.
    pub fn validate_board_size(&self) -> Result<(), ConfigError> {
        if self.board_size <= 0 {
            return Err(ConfigError::InvalidBoardSize(self.board_size));
        }
        Ok(())
    }

    /// Applies a named runtime option.
    ///
    /// Recognized names: `BoardSize`, `ZoneDepth`, `Mountains`,
    /// `ArcherClearPath`, `Seed`, and `Army.<piece>` for reserve counts.
    pub fn set_option(&mut self, name: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = || ConfigError::InvalidOptionValue {
            name: name.to_string(),
            value: value.to_string(),
        };
        let mut next = self.clone();
        match name {
            "BoardSize" => next.board_size = value.parse().map_err(|_| invalid())?,
            "ZoneDepth" => next.zone_depth = value.parse().map_err(|_| invalid())?,
            "Mountains" => next.mountains_per_side = value.parse().map_err(|_| invalid())?,
            "ArcherClearPath" => {
                next.rules.archer_requires_clear_path = parse_bool(value).ok_or_else(invalid)?
            }
            "Seed" => next.seed = value.parse().map_err(|_| invalid())?,
            other => {
                let kind = other
                    .strip_prefix("Army.")
                    .and_then(PieceType::from_name)
                    .filter(|k| !k.is_terrain())
                    .ok_or_else(|| ConfigError::UnknownOption(other.to_string()))?;
                let count: u32 = value.parse().map_err(|_| invalid())?;
                next.army.insert(kind, count);
            }
        }
        next.validate()?;
        *self = next;
        Ok(())
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s {
        "true" | "1" | "on" => Some(true),
        "false" | "0" | "off" => Some(false),
        _ => None,
    }
}
