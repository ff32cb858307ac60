use std::path::PathBuf;

/// Standardized application directories for Typist.
///
/// - User-level config: uses OS-specific dirs
/// - User-level data (logs): uses OS-specific dirs
pub struct AppPaths;

impl AppPaths {
    /// Return the user-level config directory (platform-specific)
    pub fn user_config_dir() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "typist").map(|d| d.config_dir().to_path_buf())
    }

    /// Return the user-level data directory (platform-specific)
    pub fn user_data_dir() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "typist").map(|d| d.data_dir().to_path_buf())
    }

    pub fn preferences_file() -> Option<PathBuf> {
        Self::user_config_dir().map(|d| d.join("preferences.toml"))
    }

    pub fn log_dir() -> Option<PathBuf> {
        Self::user_data_dir().map(|d| d.join("logs"))
    }
}
