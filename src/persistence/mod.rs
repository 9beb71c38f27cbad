//! JSON persistence for profile, leaderboard and tuning files
//!
//! Features:
//! - Atomic writes (tmp file, then rename over the target)
//! - Missing or corrupt files load as defaults, with a warning

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;

#[derive(Debug)]
pub enum PersistError {
    Io(io::Error),
    Json(serde_json::Error),
}

impl fmt::Display for PersistError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "i/o error: {e}"),
            Self::Json(e) => write!(f, "malformed json: {e}"),
        }
    }
}

impl std::error::Error for PersistError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Json(e) => Some(e),
        }
    }
}

impl From<io::Error> for PersistError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for PersistError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

/// Read and parse a JSON file. A missing file is `Ok(None)`.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, PersistError> {
    let json = match fs::read_to_string(path) {
        Ok(json) => json,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    Ok(Some(serde_json::from_str(&json)?))
}

/// Load a file, treating a missing or corrupt one as "no data"
pub fn load_or_default<T: DeserializeOwned + Default>(path: &Path, what: &str) -> T {
    match load_json(path) {
        Ok(Some(value)) => {
            log::info!("Loaded {} from {}", what, path.display());
            value
        }
        Ok(None) => {
            log::info!("No {} at {}, using defaults", what, path.display());
            T::default()
        }
        Err(e) => {
            log::warn!("Ignoring unreadable {} at {}: {}", what, path.display(), e);
            T::default()
        }
    }
}

/// Pretty-print `value` to `path`, creating parent directories
pub fn save_json<T: Serialize>(path: &Path, value: &T) -> Result<(), PersistError> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    let json = serde_json::to_string_pretty(value)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json)?;
    fs::rename(&tmp, path)?;
    Ok(())
}
