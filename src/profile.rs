//! Player profile
//!
//! Only the selected character is persisted. The core never reads it; the
//! presentation layer uses it to pick sprites.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::persistence::{self, PersistError};

/// Selectable runners
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Character {
    RunnerMale,
    RunnerFemale,
}

impl Character {
    pub fn as_str(&self) -> &'static str {
        match self {
            Character::RunnerMale => "runner_male",
            Character::RunnerFemale => "runner_female",
        }
    }
}

/// A character name that matches no runner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCharacter(pub String);

impl fmt::Display for UnknownCharacter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown character: {}", self.0)
    }
}

impl std::error::Error for UnknownCharacter {}

impl FromStr for Character {
    type Err = UnknownCharacter;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "runner_male" | "male" => Ok(Character::RunnerMale),
            "runner_female" | "female" => Ok(Character::RunnerFemale),
            _ => Err(UnknownCharacter(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerProfile {
    #[serde(default)]
    pub character: Option<Character>,
}

impl PlayerProfile {
    pub fn with_character(character: Character) -> Self {
        Self {
            character: Some(character),
        }
    }

    /// Load the profile; missing or corrupt data means no character selected
    pub fn load(path: &Path) -> Self {
        persistence::load_or_default(path, "profile")
    }

    pub fn save(&self, path: &Path) -> Result<(), PersistError> {
        persistence::save_json(path, self)?;
        log::info!("Profile saved");
        Ok(())
    }
}
