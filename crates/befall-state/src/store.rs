//! State persistence
//!
//! The on-disk snapshot is a pretty JSON document. Writes land in a sibling
//! temp file first and are renamed into place.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::StateError;
use crate::state::{Location, SessionState, UserPrefs};
use crate::Result;

/// Persistence backend consumed by the navigation engine.
pub trait StateStore: Send + Sync {
    /// Write the state out. A state with persistence disabled is a no-op.
    fn persist(&self, state: &SessionState) -> Result<()>;
}

#[derive(Debug, Serialize, Deserialize)]
struct Snapshot {
    current_loc: Location,
    prefs: UserPrefs,
    saved_at: DateTime<Utc>,
}

/// JSON file store at the path named by `prefs.persist`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileStore;

impl FileStore {
    pub fn new() -> Self {
        Self
    }

    /// Load a full snapshot. Returns `None` if the file does not exist.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Option<SessionState>> {
        let path = path.as_ref();
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StateError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let snapshot: Snapshot = serde_json::from_str(&raw)?;

        tracing::debug!(
            path = %path.display(),
            saved_at = %snapshot.saved_at,
            "Loaded session state"
        );

        Ok(Some(SessionState::with_location(
            snapshot.prefs,
            snapshot.current_loc,
        )))
    }

    /// Build a state from `prefs`, restoring the stored location if the
    /// configured state file exists. Preferences always come from `prefs`.
    pub fn restore(prefs: UserPrefs) -> Result<SessionState> {
        let Some(path) = prefs.persist.clone() else {
            return Ok(SessionState::new(prefs));
        };

        match Self::load(&path)? {
            Some(stored) => {
                tracing::info!(
                    path = %path.display(),
                    route = ?stored.location().id,
                    "Restored session location"
                );
                Ok(SessionState::with_location(prefs, stored.location().clone()))
            }
            None => Ok(SessionState::new(prefs)),
        }
    }

    fn write(path: &Path, state: &SessionState) -> Result<()> {
        let snapshot = Snapshot {
            current_loc: state.location().clone(),
            prefs: state.prefs.clone(),
            saved_at: Utc::now(),
        };
        let json = serde_json::to_string_pretty(&snapshot)?;

        let tmp = temp_path(path);
        fs::write(&tmp, json).map_err(|source| StateError::Io {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, path).map_err(|source| StateError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(())
    }
}

impl StateStore for FileStore {
    fn persist(&self, state: &SessionState) -> Result<()> {
        let Some(path) = state.prefs.persist.as_deref() else {
            return Ok(());
        };

        Self::write(path, state)?;
        tracing::debug!(path = %path.display(), "Persisted session state");
        Ok(())
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
