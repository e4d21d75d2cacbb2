//! Game settings
//!
//! Placement and timing parameters. Persisted as JSON in LocalStorage on the
//! web and read from an optional file natively.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::SettingsError;
use crate::sim::LayoutConfig;

/// Tunable game parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Token placement
    pub layout: LayoutConfig,

    // === Timing (seconds) ===
    /// Avatar walk before a pickup lands
    pub collect_delay: f32,
    /// Pause between the last pickup and the win screen
    pub win_delay: f32,

    /// Avatar sprite size, used to center it on a fresh level
    pub avatar_size: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            layout: LayoutConfig::default(),
            collect_delay: COLLECT_DELAY,
            win_delay: WIN_DELAY,
            avatar_size: AVATAR_SIZE,
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        self.layout.validate()?;
        for (name, value) in [("collect", self.collect_delay), ("win", self.win_delay)] {
            if !value.is_finite() || value < 0.0 {
                return Err(SettingsError::InvalidDelay { name, value });
            }
        }
        if !self.avatar_size.is_finite() || self.avatar_size < 0.0 {
            return Err(SettingsError::InvalidAvatarSize(self.avatar_size));
        }
        Ok(())
    }

    /// Parse and validate; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "letter_dash_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(err) => log::warn!("Ignoring stored settings: {}", err),
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

    /// Load settings from a JSON file (native only)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_file(path: &std::path::Path) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_file(&self, path: &std::path::Path) -> Result<(), SettingsError> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LayoutError;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.layout.retry_budget, 50);
        assert_eq!(settings.layout.min_separation, 60.0);
        assert_eq!(settings.collect_delay, 0.5);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings =
            Settings::from_json(r#"{ "collect_delay": 0.25, "layout": { "margins": { "top": 10.0 } } }"#)
                .unwrap();
        assert_eq!(settings.collect_delay, 0.25);
        assert_eq!(settings.win_delay, WIN_DELAY);
        assert_eq!(settings.layout.margins.top, 10.0);
        assert_eq!(settings.layout.margins.left, MARGIN_X);
        assert_eq!(settings.layout.token_size, TOKEN_SIZE);
    }

    #[test]
    fn test_json_round_trip() {
        let mut settings = Settings::default();
        settings.layout.retry_budget = 12;
        settings.win_delay = 1.5;
        let parsed = Settings::from_json(&settings.to_json().unwrap()).unwrap();
        assert_eq!(parsed, settings);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            Settings::from_json(r#"{ "win_delay": -1.0 }"#),
            Err(SettingsError::InvalidDelay { name: "win", .. })
        ));
        assert!(matches!(
            Settings::from_json(r#"{ "layout": { "min_separation": -3.0 } }"#),
            Err(SettingsError::Layout(LayoutError::InvalidSeparation(_)))
        ));
        assert!(matches!(
            Settings::from_json(r#"{ "avatar_size": -48.0 }"#),
            Err(SettingsError::InvalidAvatarSize(_))
        ));
        assert!(matches!(
            Settings::from_json("not json"),
            Err(SettingsError::Parse(_))
        ));
    }

    #[test]
    fn test_file_round_trip() {
        let path = std::env::temp_dir().join(format!("letter_dash_{}.json", std::process::id()));
        let mut settings = Settings::default();
        settings.collect_delay = 0.1;
        settings.save_file(&path).unwrap();

        let loaded = Settings::load_file(&path).unwrap();
        assert_eq!(loaded, settings);
        let _ = std::fs::remove_file(&path);

        assert!(matches!(
            Settings::load_file(&path),
            Err(SettingsError::Io(_))
        ));
    }
}
