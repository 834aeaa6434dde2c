//! # Settings
//!
//! User preferences for calculator hosts, stored as TOML:
//!
//! ```toml
//! angle_mode = "degrees"
//! history_limit = 100
//! conversion_decimals = 4
//! ```
//!
//! Every field is optional; missing fields take their defaults. Saves are
//! atomic: the file is written to a `.tmp` sibling, synced, then renamed.
//!
//! ## Example
//!
//! ```rust,no_run
//! use calc_core::settings::{load_settings, save_settings, Settings};
//! use calc_core::scientific::AngleMode;
//! use std::path::Path;
//!
//! let path = Path::new("abacus.toml");
//! let settings = Settings {
//!     angle_mode: AngleMode::Radians,
//!     ..Settings::default()
//! };
//! save_settings(&settings, path)?;
//!
//! let loaded = load_settings(path)?;
//! assert_eq!(loaded.angle_mode, AngleMode::Radians);
//! # Ok::<(), calc_core::errors::CalcError>(())
//! ```

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::errors::{CalcError, CalcResult};
use crate::scientific::AngleMode;

/// Default number of history entries a host keeps
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// Default decimals for unit conversion results
pub const DEFAULT_CONVERSION_DECIMALS: usize = 4;

/// Upper bound for `conversion_decimals`
pub const MAX_CONVERSION_DECIMALS: usize = 12;

/// Host preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// How trigonometric functions read their argument
    pub angle_mode: AngleMode,

    /// Most recent calculations to keep in history
    pub history_limit: usize,

    /// Fractional digits shown for unit conversion results
    pub conversion_decimals: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            angle_mode: AngleMode::default(),
            history_limit: DEFAULT_HISTORY_LIMIT,
            conversion_decimals: DEFAULT_CONVERSION_DECIMALS,
        }
    }
}

impl Settings {
    /// Check field ranges.
    pub fn validate(&self) -> CalcResult<()> {
        if self.history_limit == 0 {
            return Err(CalcError::invalid_input(
                "history_limit",
                "0",
                "history must keep at least one entry",
            ));
        }
        if self.conversion_decimals > MAX_CONVERSION_DECIMALS {
            return Err(CalcError::invalid_input(
                "conversion_decimals",
                self.conversion_decimals.to_string(),
                format!("must be at most {}", MAX_CONVERSION_DECIMALS),
            ));
        }
        Ok(())
    }

    /// Parse and validate settings from TOML text.
    pub fn from_toml(text: &str) -> CalcResult<Self> {
        let settings: Settings = toml::from_str(text).map_err(|e| CalcError::SerializationError {
            reason: e.to_string(),
        })?;
        settings.validate()?;
        Ok(settings)
    }

    /// Render as TOML text.
    pub fn to_toml(&self) -> CalcResult<String> {
        toml::to_string_pretty(self).map_err(|e| CalcError::SerializationError {
            reason: e.to_string(),
        })
    }
}

/// `<config dir>/abacus/config.toml`, if the platform has a config dir.
pub fn default_settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("abacus").join("config.toml"))
}

/// Load settings from a TOML file.
///
/// # Returns
///
/// * `Ok(Settings)` - Parsed and validated settings
/// * `Err(CalcError::FileError)` - I/O error
/// * `Err(CalcError::SerializationError)` - Invalid TOML
/// * `Err(CalcError::InvalidInput)` - A field is out of range
pub fn load_settings(path: &Path) -> CalcResult<Settings> {
    let contents = fs::read_to_string(path)
        .map_err(|e| CalcError::file_error("read", path.display().to_string(), e.to_string()))?;

    let settings = Settings::from_toml(&contents).map_err(|e| match e {
        CalcError::SerializationError { reason } => CalcError::SerializationError {
            reason: format!("Invalid TOML in {}: {}", path.display(), reason),
        },
        other => other,
    })?;

    debug!(path = %path.display(), "loaded settings");
    Ok(settings)
}

/// Load settings, falling back to defaults when the file does not exist.
///
/// A file that exists but cannot be read or parsed is still an error.
pub fn load_settings_or_default(path: &Path) -> CalcResult<Settings> {
    if !path.exists() {
        warn!(path = %path.display(), "settings file not found, using defaults");
        return Ok(Settings::default());
    }
    load_settings(path)
}

/// Save settings with atomic write semantics.
///
/// 1. Serialize to TOML
/// 2. Write to `<path>.tmp` and fsync
/// 3. Rename over `path`
///
/// Parent directories are created as needed.
pub fn save_settings(settings: &Settings, path: &Path) -> CalcResult<()> {
    settings.validate()?;
    let text = settings.to_toml()?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            CalcError::file_error("create directory", parent.display().to_string(), e.to_string())
        })?;
    }

    let tmp_path = tmp_path_for(path);

    let mut tmp_file = File::create(&tmp_path).map_err(|e| {
        CalcError::file_error("create temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.write_all(text.as_bytes()).map_err(|e| {
        CalcError::file_error("write temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.sync_all().map_err(|e| {
        CalcError::file_error("sync temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        CalcError::file_error("rename to final", path.display().to_string(), e.to_string())
    })?;

    debug!(path = %path.display(), "saved settings");
    Ok(())
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
