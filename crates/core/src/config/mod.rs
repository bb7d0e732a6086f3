//! Persisted user settings and the feature flags derived from them.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{Result, WavescopeError};

/// User-facing settings persisted as `settings.json`.
///
/// The serialized field names are part of the on-disk format used by earlier
/// releases, so existing files keep loading unchanged. Fields missing from
/// the file fall back to their defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Settings {
    pub enable_trail: bool,
    pub enable_glow: bool,
    pub show_spectrogram: bool,
    pub use_sinus_wave: bool,
    pub auto_start: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            enable_trail: true,
            enable_glow: true,
            show_spectrogram: false,
            use_sinus_wave: false,
            auto_start: true,
        }
    }
}

impl Settings {
    /// Loads settings from the default location.
    ///
    /// A missing file yields the defaults. A file that exists but cannot be
    /// read or parsed is an error so the caller can decide whether to fall
    /// back or surface it.
    pub fn load() -> Result<Self> {
        Self::load_from(&default_path()?)
    }

    /// Loads settings from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Saves the settings to the default location, creating the
    /// configuration directory if needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&default_path()?)
    }

    /// Saves the settings as pretty-printed JSON to an explicit path.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Renders the settings as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Derives the rotation filter from the persisted toggles.
    pub fn feature_flags(&self) -> FeatureFlags {
        FeatureFlags {
            trail: self.enable_trail,
            glow: self.enable_glow,
            sinus_wave: self.use_sinus_wave,
            spectrogram: self.show_spectrogram,
        }
    }
}

/// Returns the platform path of `settings.json`.
pub fn default_path() -> Result<PathBuf> {
    let dirs = directories::ProjectDirs::from("", "", "wavescope")
        .ok_or_else(|| WavescopeError::msg("no home directory available"))?;
    Ok(dirs.config_dir().join("settings.json"))
}

/// Toggles deciding which visualizations take part in the rotation.
///
/// Bars, circle and waveform are always available; the remaining strategies
/// are opt-in (or opt-out) through [`Settings`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureFlags {
    pub trail: bool,
    pub glow: bool,
    pub sinus_wave: bool,
    pub spectrogram: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Settings::default().feature_flags()
    }
}
