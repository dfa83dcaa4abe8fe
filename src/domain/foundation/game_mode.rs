//! GameMode enum representing the three play modes of the audit game.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The three game modes a visitor can play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    /// Website / conversion audit of an existing business.
    Audit,
    /// Co-designing a new business concept from scratch.
    Startup,
    /// Extracting case studies from past projects.
    Portfolio,
}

impl GameMode {
    /// Returns all game modes.
    pub fn all() -> &'static [GameMode] {
        &[GameMode::Audit, GameMode::Startup, GameMode::Portfolio]
    }

    /// Returns the wire name (matches the JSON representation).
    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Audit => "audit",
            GameMode::Startup => "startup",
            GameMode::Portfolio => "portfolio",
        }
    }
}

impl Default for GameMode {
    fn default() -> Self {
        GameMode::Audit
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
