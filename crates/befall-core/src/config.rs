//! Tool configuration
//!
//! Read from environment variables with plain defaults.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use befall_state::UserPrefs;

use crate::error::CoreError;
use crate::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub mouse_enabled: bool,
    pub paste_enabled: bool,
    pub fullscreen_enabled: bool,
    /// State file; `None` disables persistence
    pub persist: Option<PathBuf>,
    /// Print completion diagnostics in the shell
    pub debug_completions: bool,
    /// Base URL of the API under test
    pub api_url: String,
    /// Per-call timeout, `0` for none
    pub exec_timeout_secs: u64,
    pub history_path: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let string_or = |key: &str, fallback: &str| lookup(key).unwrap_or_else(|| fallback.to_string());
        let bool_or = |key: &str, fallback: &str| string_or(key, fallback) == "true";

        let timeout = string_or("EXEC_TIMEOUT_SECS", "30");
        let exec_timeout_secs = timeout.trim().parse().map_err(|_| {
            CoreError::Config(format!("EXEC_TIMEOUT_SECS must be a whole number, got {}", timeout))
        })?;

        Ok(Self {
            mouse_enabled: bool_or("MOUSE_ENABLED", "false"),
            paste_enabled: bool_or("PASTE_ENABLED", "true"),
            fullscreen_enabled: bool_or("FULLSCREEN", "true"),
            persist: UserPrefs::persist_path(&string_or("PERSIST", "evil-befall-cfg.json")),
            debug_completions: bool_or("DEBUG_COMPLETIONS", "false"),
            api_url: string_or("API_URL", "http://localhost:8080"),
            exec_timeout_secs,
            history_path: PathBuf::from(string_or("HISTORY_PATH", "evil-befall-history.txt")),
        })
    }

    pub fn prefs(&self) -> UserPrefs {
        UserPrefs {
            mouse_enabled: self.mouse_enabled,
            paste_enabled: self.paste_enabled,
            fullscreen_enabled: self.fullscreen_enabled,
            persist: self.persist.clone(),
        }
    }

    pub fn exec_timeout(&self) -> Option<Duration> {
        (self.exec_timeout_secs > 0).then(|| Duration::from_secs(self.exec_timeout_secs))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mouse_enabled: false,
            paste_enabled: true,
            fullscreen_enabled: true,
            persist: None,
            debug_completions: false,
            api_url: "http://localhost:8080".to_string(),
            exec_timeout_secs: 30,
            history_path: PathBuf::from("evil-befall-history.txt"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();

        assert!(!config.mouse_enabled);
        assert!(config.paste_enabled);
        assert!(config.fullscreen_enabled);
        assert_eq!(config.persist, Some(PathBuf::from("evil-befall-cfg.json")));
        assert_eq!(config.exec_timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("MOUSE_ENABLED", "true"),
            ("PASTE_ENABLED", "no"),
            ("PERSIST", "false"),
            ("EXEC_TIMEOUT_SECS", "0"),
            ("API_URL", "https://api.example.com/v1/"),
        ]))
        .unwrap();

        assert!(config.mouse_enabled);
        assert!(!config.paste_enabled);
        assert_eq!(config.persist, None);
        assert_eq!(config.exec_timeout(), None);
        assert!(!config.prefs().persistence_enabled());
        assert_eq!(config.api_url, "https://api.example.com/v1/");
    }

    #[test]
    fn test_bad_timeout() {
        let result = Config::from_lookup(lookup(&[("EXEC_TIMEOUT_SECS", "soon")]));
        assert!(matches!(result, Err(CoreError::Config(_))));
    }
}
