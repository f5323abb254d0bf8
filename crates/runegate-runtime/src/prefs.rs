#![forbid(unsafe_code)]

//! User preference flags with JSON file persistence.
//!
//! The flow itself never reads these; they exist for host toggles like
//! sound on/off that should survive a reload. Storage is a single JSON
//! file written with the write-rename pattern so a crash mid-save cannot
//! corrupt the previous contents.
//!
//! # Failure Modes
//!
//! | Failure | Behavior |
//! |---------|----------|
//! | File missing | Load returns an empty store |
//! | File corrupt | Load returns an empty store, logged at warn |
//! | Save I/O error | Returned to the caller; in-memory flags unaffected |

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Current schema version of the preference file.
const PREFS_VERSION: u32 = 1;

/// Errors from preference persistence.
#[derive(Debug)]
pub enum PrefsError {
    /// I/O error during file operations.
    Io(std::io::Error),
    /// JSON encode error.
    Serialization(String),
}

impl fmt::Display for PrefsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrefsError::Io(e) => write!(f, "I/O error: {e}"),
            PrefsError::Serialization(msg) => write!(f, "serialization error: {msg}"),
        }
    }
}

impl std::error::Error for PrefsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PrefsError::Io(e) => Some(e),
            PrefsError::Serialization(_) => None,
        }
    }
}

impl From<std::io::Error> for PrefsError {
    fn from(e: std::io::Error) -> Self {
        PrefsError::Io(e)
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct PrefFile {
    version: u32,
    flags: HashMap<String, bool>,
}

/// On/off preference flags backed by a JSON file.
#[derive(Debug)]
pub struct PrefStore {
    path: PathBuf,
    flags: HashMap<String, bool>,
}

impl PrefStore {
    /// Load the store, tolerating a missing or corrupt file.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let flags = match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<PrefFile>(&contents) {
                Ok(file) => file.flags,
                Err(err) => {
                    warn!(path = %path.display(), %err, "preference file corrupt; starting empty");
                    HashMap::new()
                }
            },
            Err(_) => HashMap::new(),
        };
        Self { path, flags }
    }

    /// Read one flag; absent flags default to `false`.
    pub fn flag(&self, name: &str) -> bool {
        self.flags.get(name).copied().unwrap_or(false)
    }

    /// Set one flag in memory. Call [`PrefStore::save`] to persist.
    pub fn set_flag(&mut self, name: impl Into<String>, value: bool) {
        self.flags.insert(name.into(), value);
    }

    /// Persist all flags atomically (write to a sibling temp file, rename).
    pub fn save(&self) -> Result<(), PrefsError> {
        let file = PrefFile {
            version: PREFS_VERSION,
            flags: self.flags.clone(),
        };
        let json = serde_json::to_string_pretty(&file)
            .map_err(|e| PrefsError::Serialization(e.to_string()))?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    /// The backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}
