//! Session state data structures

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Raw `key=value` command arguments, as typed by the operator.
pub type RawArgs = BTreeMap<String, String>;

/// Setting value that turns persistence off.
const PERSIST_DISABLED: &str = "false";

/// Where the session currently is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// Command id of the active route, `None` before the first navigation
    pub id: Option<String>,
    /// Raw arguments that were passed to reach the route
    pub data: RawArgs,
}

impl Location {
    pub fn new(id: impl Into<String>, data: RawArgs) -> Self {
        Self {
            id: Some(id.into()),
            data,
        }
    }

    pub fn is_initial(&self) -> bool {
        self.id.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPrefs {
    pub mouse_enabled: bool,
    pub paste_enabled: bool,
    pub fullscreen_enabled: bool,
    /// State file; `None` disables persistence
    pub persist: Option<PathBuf>,
}

impl UserPrefs {
    /// Interpret a persistence setting. Empty and `"false"` disable it.
    pub fn persist_path(setting: &str) -> Option<PathBuf> {
        let setting = setting.trim();
        if setting.is_empty() || setting == PERSIST_DISABLED {
            return None;
        }
        Some(PathBuf::from(setting))
    }

    pub fn persistence_enabled(&self) -> bool {
        self.persist.is_some()
    }
}

impl Default for UserPrefs {
    fn default() -> Self {
        Self {
            mouse_enabled: false,
            paste_enabled: true,
            fullscreen_enabled: true,
            persist: None,
        }
    }
}

/// The session: one current location plus the operator's preferences.
///
/// A single instance is created at startup and threaded by reference through
/// every navigation and route hook. Only the navigation engine changes the
/// location; hooks receive a shared reference.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    current_loc: Location,
    pub prefs: UserPrefs,
}

impl SessionState {
    pub fn new(prefs: UserPrefs) -> Self {
        Self {
            current_loc: Location::default(),
            prefs,
        }
    }

    pub fn with_location(prefs: UserPrefs, current_loc: Location) -> Self {
        Self { current_loc, prefs }
    }

    pub fn location(&self) -> &Location {
        &self.current_loc
    }

    /// Swap in a new location, returning the one being left.
    pub fn replace_location(&mut self, loc: Location) -> Location {
        std::mem::replace(&mut self.current_loc, loc)
    }
}
