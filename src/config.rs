//! shiftcover configuration.
//!
//! Loaded from `~/.shiftcover/config.toml`. A missing file means defaults;
//! a file that is present but invalid is an error.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use shiftcover::selection::DEFAULT_STEP_MINUTES;
use shiftcover::storage::Storage;
use shiftcover::window;

/// shiftcover configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Config {
    /// Who is acting when neither `--as` nor `SHIFTCOVER_USER` is set.
    pub default_user: Option<String>,

    /// Database path. Defaults to `~/.shiftcover/roster.sqlite`.
    pub database: Option<PathBuf>,

    /// Step between the times offered inside a gap.
    pub slot_minutes: i64,

    /// Log filter used when `SHIFTCOVER_LOG` is not set.
    pub log_level: String,

    /// Start time for new shifts when `--start-time` is omitted.
    pub default_start_time: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_user: None,
            database: None,
            slot_minutes: DEFAULT_STEP_MINUTES,
            log_level: "warn".to_string(),
            default_start_time: "09:00".to_string(),
        }
    }
}

impl Config {
    /// Load config from `~/.shiftcover/config.toml`.
    pub fn load() -> Result<Self, String> {
        match Self::path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load config from `path`, falling back to defaults when it is missing.
    pub fn load_from(path: &Path) -> Result<Self, String> {
        let contents = match fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(format!("failed to read {}: {e}", path.display())),
        };

        let config: Self = toml::from_str(&contents)
            .map_err(|e| format!("invalid config at {}: {e}", path.display()))?;

        if window::parse_time(&config.default_start_time).is_none() {
            return Err(format!(
                "default-start-time in {} must be HH:mm, got '{}'",
                path.display(),
                config.default_start_time
            ));
        }
        if config.slot_minutes <= 0 {
            return Err(format!(
                "slot-minutes in {} must be positive",
                path.display()
            ));
        }

        Ok(config)
    }

    /// The config file path: `~/.shiftcover/config.toml`.
    pub fn path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".shiftcover").join("config.toml"))
    }

    /// The database path: configured, or the default location.
    pub fn database_path(&self) -> Option<PathBuf> {
        self.database.clone().or_else(Storage::default_path)
    }
}
