//! Game settings and preferences
//!
//! Persisted separately from the best score: a JSON file on native, LocalStorage
//! on the web.

use serde::{Deserialize, Serialize};

use crate::catalog::Difficulty;
use crate::error::GameError;
use crate::sim::level::LevelTier;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Level tier selected on startup
    pub level: LevelTier,
    /// Difficulty selected on startup
    pub difficulty: Difficulty,

    // === Audio ===
    pub muted: bool,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,

    // === Accessibility ===
    /// Reduced motion (hides the glitch overlay; the driving pause still applies)
    pub reduced_motion: bool,

    /// Fixed RNG seed for reproducible phrase order (random when unset)
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            level: LevelTier::Short,
            difficulty: Difficulty::Beginner,
            muted: false,
            sfx_volume: 0.05,
            reduced_motion: false,
            seed: None,
        }
    }
}

impl Settings {
    /// Whether the glitch overlay should be drawn
    pub fn effective_glitch(&self) -> bool {
        !self.reduced_motion
    }

    pub fn from_json(json: &str) -> Result<Self, GameError> {
        let mut settings: Settings = serde_json::from_str(json)?;
        settings.sfx_volume = settings.sfx_volume.clamp(0.0, 1.0);
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, GameError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "phrase_rally_settings";

    /// Read settings from a JSON file
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from(path: &std::path::Path) -> Result<Self, GameError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    /// Load settings from `path`, falling back to defaults
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(path: Option<&std::path::Path>) -> Self {
        let Some(path) = path else {
            log::info!("Using default settings");
            return Self::default();
        };
        match Self::load_from(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::info!("Using default settings ({}: {})", path.display(), e);
                Self::default()
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to(&self, path: &std::path::Path) -> Result<(), GameError> {
        std::fs::write(path, self.to_json()?)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(settings) = Self::from_json(&json) {
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = self.to_json() {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings = Settings::from_json(r#"{"difficulty": "advanced", "muted": true}"#).unwrap();
        assert_eq!(settings.difficulty, Difficulty::Advanced);
        assert!(settings.muted);
        assert_eq!(settings.level, LevelTier::Short);
        assert_eq!(settings.sfx_volume, 0.05);
    }

    #[test]
    fn test_volume_is_clamped() {
        let settings = Settings::from_json(r#"{"sfx_volume": 4.0}"#).unwrap();
        assert_eq!(settings.sfx_volume, 1.0);
    }

    #[test]
    fn test_reduced_motion_hides_glitch() {
        let settings = Settings {
            reduced_motion: true,
            ..Default::default()
        };
        assert!(!settings.effective_glitch());
        assert!(Settings::default().effective_glitch());
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_save_and_reload() {
        let path = std::env::temp_dir().join(format!("phrase-rally-settings-{}.json", std::process::id()));
        let settings = Settings {
            level: LevelTier::Long,
            difficulty: Difficulty::Intermediate,
            muted: true,
            seed: Some(42),
            ..Default::default()
        };
        settings.save_to(&path).unwrap();
        assert_eq!(Settings::load_from(&path).unwrap(), settings);
        let _ = std::fs::remove_file(&path);
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_missing_file_falls_back() {
        let path = std::env::temp_dir().join("phrase-rally-does-not-exist.json");
        assert_eq!(Settings::load(Some(&path)), Settings::default());
        assert!(Settings::load_from(&path).is_err());
    }
}
