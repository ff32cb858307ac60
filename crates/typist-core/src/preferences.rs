use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use strum::Display;

use crate::controller::{ControllerSettings, RevealSpeed};
use crate::utils::paths::AppPaths;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, Display)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ChatMethod {
    /// `GET <chat_path>?<chat_param>=<message>`
    #[default]
    Get,
    /// `POST <chat_path>` with the message as a raw text body
    Post,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Preferences {
    #[serde(default)]
    pub server: ServerPreferences,

    #[serde(default)]
    pub display: DisplayPreferences,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerPreferences {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_resource_path")]
    pub resource_path: String,
    #[serde(default = "default_chat_path")]
    pub chat_path: String,
    #[serde(default = "default_chat_param")]
    pub chat_param: String,
    #[serde(default)]
    pub chat_method: ChatMethod,
    pub request_timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DisplayPreferences {
    /// Delay between reveal steps. Zero renders the resource all at once.
    #[serde(default = "default_reveal_delay_ms")]
    pub reveal_delay_ms: u64,
    #[serde(default = "default_chars_per_step")]
    pub chars_per_step: usize,
    /// Cursor blink period. Zero hides the cursor.
    #[serde(default = "default_cursor_blink_ms")]
    pub cursor_blink_ms: u64,
}

fn default_base_url() -> String {
    "http://localhost:8000/".to_string()
}

fn default_resource_path() -> String {
    "index_full.html".to_string()
}

fn default_chat_path() -> String {
    "/chat".to_string()
}

fn default_chat_param() -> String {
    "msg".to_string()
}

fn default_reveal_delay_ms() -> u64 {
    20
}

fn default_chars_per_step() -> usize {
    1
}

fn default_cursor_blink_ms() -> u64 {
    500
}

impl Default for ServerPreferences {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            resource_path: default_resource_path(),
            chat_path: default_chat_path(),
            chat_param: default_chat_param(),
            chat_method: ChatMethod::default(),
            request_timeout_ms: None,
        }
    }
}

impl Default for DisplayPreferences {
    fn default() -> Self {
        Self {
            reveal_delay_ms: default_reveal_delay_ms(),
            chars_per_step: default_chars_per_step(),
            cursor_blink_ms: default_cursor_blink_ms(),
        }
    }
}

impl ServerPreferences {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }
}

impl DisplayPreferences {
    pub fn reveal_speed(&self) -> RevealSpeed {
        if self.reveal_delay_ms == 0 {
            RevealSpeed::Instant
        } else {
            RevealSpeed::Typed {
                delay: Duration::from_millis(self.reveal_delay_ms),
                chars_per_step: self.chars_per_step.max(1),
            }
        }
    }

    pub fn cursor_blink(&self) -> Option<Duration> {
        (self.cursor_blink_ms > 0).then(|| Duration::from_millis(self.cursor_blink_ms))
    }
}

impl Preferences {
    /// Get the path to the preferences file
    pub fn config_path() -> Result<PathBuf, crate::error::Error> {
        AppPaths::preferences_file().ok_or_else(|| {
            crate::error::Error::Configuration("Could not determine config directory".to_string())
        })
    }

    /// Load preferences from disk, or return defaults if not found
    pub fn load() -> Result<Self, crate::error::Error> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self, crate::error::Error> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            match toml::from_str(&contents) {
                Ok(prefs) => Ok(prefs),
                Err(e) => {
                    tracing::warn!(
                        "Failed to parse preferences file at {:?}: {}. Using defaults.",
                        path,
                        e
                    );
                    Ok(Self::default())
                }
            }
        } else {
            Ok(Self::default())
        }
    }

    /// Save preferences to disk
    pub fn save(&self) -> Result<(), crate::error::Error> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), crate::error::Error> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;

        Ok(())
    }

    pub fn controller_settings(&self) -> ControllerSettings {
        ControllerSettings {
            reveal: self.display.reveal_speed(),
            cursor_blink: self.display.cursor_blink(),
            chat_method: self.server.chat_method,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_match_the_stock_page() {
        let prefs = Preferences::default();
        assert_eq!(prefs.server.resource_path, "index_full.html");
        assert_eq!(prefs.server.chat_path, "/chat");
        assert_eq!(prefs.server.chat_param, "msg");
        assert_eq!(prefs.server.chat_method, ChatMethod::Get);
        assert_eq!(
            prefs.display.reveal_speed(),
            RevealSpeed::Typed {
                delay: Duration::from_millis(20),
                chars_per_step: 1
            }
        );
        assert_eq!(prefs.display.cursor_blink(), Some(Duration::from_millis(500)));
    }

    #[test]
    fn zero_delay_means_instant_reveal() {
        let display = DisplayPreferences {
            reveal_delay_ms: 0,
            ..Default::default()
        };
        assert_eq!(display.reveal_speed(), RevealSpeed::Instant);
    }

    #[test]
    fn zero_chars_per_step_is_clamped() {
        let display = DisplayPreferences {
            chars_per_step: 0,
            ..Default::default()
        };
        assert!(matches!(
            display.reveal_speed(),
            RevealSpeed::Typed {
                chars_per_step: 1,
                ..
            }
        ));
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let prefs: Preferences = toml::from_str(
            r#"
            [server]
            base_url = "http://example.com/"
            chat_method = "post"
            "#,
        )
        .unwrap();
        assert_eq!(prefs.server.base_url, "http://example.com/");
        assert_eq!(prefs.server.chat_method, ChatMethod::Post);
        assert_eq!(prefs.server.chat_param, "msg");
        assert_eq!(prefs.display, DisplayPreferences::default());
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("preferences.toml");
        let mut prefs = Preferences::default();
        prefs.display.reveal_delay_ms = 5;
        prefs.server.request_timeout_ms = Some(1500);

        prefs.save_to(&path).unwrap();
        let loaded = Preferences::load_from(&path).unwrap();

        assert_eq!(loaded, prefs);
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("preferences.toml");
        std::fs::write(&path, "[server\nbase_url = ").unwrap();

        let loaded = Preferences::load_from(&path).unwrap();
        assert_eq!(loaded, Preferences::default());
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let loaded = Preferences::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(loaded, Preferences::default());
    }
}
