//! Merge Runner - an endless side-scroller with periodic boss fights
//!
//! Core modules:
//! - `sim`: Deterministic simulation (distance, spawning, bosses, collisions)
//! - `tuning`: Data-driven game balance
//! - `highscores`: Top-10 leaderboard
//! - `profile`: Selected character
//! - `persistence`: JSON load/save with atomic writes

pub mod highscores;
pub mod persistence;
pub mod profile;
pub mod sim;
pub mod tuning;

pub use highscores::{HighScoreEntry, HighScores};
pub use profile::{Character, PlayerProfile, UnknownCharacter};
pub use tuning::Tuning;

/// Presentation-facing constants
pub mod consts {
    /// Fixed simulation timestep. Per-tick quantities (projectile velocity,
    /// boss advance) assume this rate.
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Viewport width the camera lead is derived from
    pub const SCREEN_WIDTH: f32 = 1000.0;

    /// Default persistence locations
    pub const DATA_DIR: &str = "data";
    pub const PROFILE_FILE: &str = "player_data.json";
    pub const LEADERBOARD_FILE: &str = "leaderboard.json";
}
