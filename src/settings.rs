//! Settings persistence using TOML
//!
//! Stores settings in ~/.config/stackfall/settings.toml (or platform equivalent)

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::warn;

/// Game settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Keybindings
    pub keys: KeyBindings,
    /// Visual settings
    pub visual: VisualSettings,
    /// Gameplay settings
    pub gameplay: GameplaySettings,
    /// Audio settings
    pub audio: AudioSettings,
}

/// Key bindings (stored as strings for easy editing)
/// Each action can have one or more keys bound to it
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub move_left: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub move_right: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub soft_drop: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub hard_drop: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub rotate_cw: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub rotate_ccw: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub pause: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub restart: Vec<String>,
    /// Additional restart keys once the game is over
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub confirm: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub quit: Vec<String>,
}

/// Deserialize keys as either a single string or array of strings
fn deserialize_keys<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(key) => vec![key],
        OneOrMany::Many(keys) => keys,
    })
}

/// Serialize keys: single key as string, multiple as array
fn serialize_keys<S>(keys: &[String], serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    match keys {
        [single] => serializer.serialize_str(single),
        many => many.serialize(serializer),
    }
}

/// Visual settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualSettings {
    /// Landing preview visibility
    pub show_ghost: bool,
    /// Block style: "solid", "bracket", "round"
    pub block_style: String,
}

/// Gameplay settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameplaySettings {
    /// Delay before a held key starts repeating, in milliseconds
    pub repeat_delay_ms: u64,
    /// Interval between repeats, in milliseconds
    pub repeat_interval_ms: u64,
}

/// Audio settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// SFX volume (0-100)
    pub sfx_volume: u32,
    pub muted: bool,
}

fn keys(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            move_left: keys(&["Left"]),
            move_right: keys(&["Right"]),
            soft_drop: keys(&["Down"]),
            hard_drop: keys(&["Space"]),
            rotate_cw: keys(&["Up", "x"]),
            rotate_ccw: keys(&["z"]),
            pause: keys(&["p"]),
            restart: keys(&["r"]),
            confirm: keys(&["Enter", "Space"]),
            quit: keys(&["Esc", "q"]),
        }
    }
}

impl Default for VisualSettings {
    fn default() -> Self {
        Self {
            show_ghost: true,
            block_style: "solid".to_string(),
        }
    }
}

impl Default for GameplaySettings {
    fn default() -> Self {
        Self {
            repeat_delay_ms: 170,
            repeat_interval_ms: 50,
        }
    }
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            sfx_volume: 50,
            muted: false,
        }
    }
}

impl Settings {
    /// Get the config directory path
    fn config_dir() -> Option<PathBuf> {
        ProjectDirs::from("com", "stackfall", "stackfall").map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Get the settings file path
    pub fn settings_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("settings.toml"))
    }

    /// Parse settings from TOML text, falling back to defaults on error
    pub fn from_toml(contents: &str) -> Self {
        toml::from_str(contents).unwrap_or_else(|e| {
            warn!("invalid settings, using defaults: {}", e);
            Self::default()
        })
    }

    /// Load settings from file, or create default
    pub fn load() -> Self {
        let Some(path) = Self::settings_path() else {
            return Self::default();
        };

        match fs::read_to_string(&path) {
            Ok(contents) => Self::from_toml(&contents),
            Err(_) => Self::default(),
        }
    }

    /// Whether a settings file exists on disk
    pub fn exists() -> bool {
        Self::settings_path().is_some_and(|path| path.exists())
    }

    /// Save settings to file
    pub fn save(&self) -> Result<(), String> {
        let Some(dir) = Self::config_dir() else {
            return Err("Could not determine config directory".to_string());
        };

        let Some(path) = Self::settings_path() else {
            return Err("Could not determine settings path".to_string());
        };

        // Create directory if needed
        fs::create_dir_all(&dir).map_err(|e| format!("Failed to create config dir: {}", e))?;

        // Serialize and write
        let contents =
            toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize: {}", e))?;

        fs::write(&path, contents).map_err(|e| format!("Failed to write settings: {}", e))?;

        Ok(())
    }

    /// Master volume as a 0.0-1.0 gain
    pub fn sfx_gain(&self) -> f32 {
        if self.audio.muted {
            0.0
        } else {
            (self.audio.sfx_volume.min(100) as f32) / 100.0
        }
    }
}

impl VisualSettings {
    /// Get the block characters based on style
    pub fn block_chars(&self) -> (&'static str, &'static str) {
        match self.block_style.as_str() {
            "bracket" => ("[]", ".."),
            "round" => ("()", ".."),
            _ => ("██", "░░"), // "solid" or default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_key_or_list() {
        let settings = Settings::from_toml(
            r#"
            [keys]
            move_left = "a"
            rotate_cw = ["w", "Up"]
            "#,
        );
        assert_eq!(settings.keys.move_left, vec!["a"]);
        assert_eq!(settings.keys.rotate_cw, vec!["w", "Up"]);
        // Untouched fields keep their defaults
        assert_eq!(settings.keys.move_right, vec!["Right"]);
        assert_eq!(settings.gameplay.repeat_delay_ms, 170);
    }

    #[test]
    fn test_round_trip_keeps_single_keys_as_strings() {
        let text = toml::to_string_pretty(&Settings::default()).unwrap_or_default();
        assert!(text.contains("move_left = \"Left\""));
        assert!(text.contains("rotate_cw = ["));
        let parsed = Settings::from_toml(&text);
        assert_eq!(parsed.keys.confirm, vec!["Enter", "Space"]);
    }

    #[test]
    fn test_malformed_file_falls_back_to_defaults() {
        let settings = Settings::from_toml("this is [not toml");
        assert_eq!(settings.gameplay.repeat_interval_ms, 50);
        assert!(settings.visual.show_ghost);
    }

    #[test]
    fn test_sfx_gain() {
        let mut settings = Settings::default();
        assert_eq!(settings.sfx_gain(), 0.5);
        settings.audio.sfx_volume = 250;
        assert_eq!(settings.sfx_gain(), 1.0);
        settings.audio.muted = true;
        assert_eq!(settings.sfx_gain(), 0.0);
    }
}
