//! Game settings and preferences
//!
//! Stored as JSON next to the high score (or wherever the host points).
//! Every field has a default, so partial files are accepted.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::{NUMBER_OF_STARS, TICKS_PER_SECOND};
use crate::error::{GameError, Result};

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    Medium,
    #[default]
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Background stars per starfield
    pub fn star_count(&self) -> usize {
        match self {
            QualityPreset::Low => NUMBER_OF_STARS / 4,
            QualityPreset::Medium => NUMBER_OF_STARS / 2,
            QualityPreset::High => NUMBER_OF_STARS,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,

    // === Simulation ===
    /// Fixed tick rate; timers convert durations using this
    pub ticks_per_second: u32,
    /// RNG seed. `None` seeds from entropy.
    pub seed: Option<u64>,

    // === Paths ===
    /// Override for the high score file location
    pub high_score_path: Option<PathBuf>,
    /// Directory holding the asset pack, verified at startup when set
    pub asset_dir: Option<PathBuf>,

    /// Ticks the headless host runs before stopping
    pub headless_ticks: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::High,

            // Audio
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,

            ticks_per_second: TICKS_PER_SECOND,
            seed: None,

            high_score_path: None,
            asset_dir: None,

            headless_ticks: u64::from(TICKS_PER_SECOND) * 120,
        }
    }
}

impl Settings {
    /// Create settings from a quality preset
    pub fn from_preset(preset: QualityPreset) -> Self {
        Self {
            quality: preset,
            ..Self::default()
        }
    }

    /// Tick rate, never zero
    pub fn tps(&self) -> u32 {
        self.ticks_per_second.max(1)
    }

    /// Load settings from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No settings at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(e) => return Err(GameError::io(path, e)),
        };
        let settings = serde_json::from_str(&json).map_err(|source| GameError::Settings {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(|source| GameError::Settings {
            path: path.to_path_buf(),
            source,
        })?;
        std::fs::write(path, json).map_err(|e| GameError::io(path, e))?;
        log::info!("Settings saved");
        Ok(())
    }
}
