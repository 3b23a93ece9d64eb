//! Platform-specific paths for analysis configuration files.
//!
//! # Directory Structure
//!
//! - **User config**: `~/.config/sonograph/` (Linux), `~/Library/Application Support/sonograph/` (macOS), `%APPDATA%\sonograph\` (Windows)
//! - **Default file**: `analysis.toml` inside the user config directory
//!
//! # Example
//!
//! ```rust,no_run
//! use sonograph_config::paths;
//!
//! println!("Default config: {:?}", paths::default_config_path());
//!
//! // Resolve a named config (searches the path itself, then the user directory)
//! if let Some(path) = paths::find_config("speech") {
//!     println!("Found config at: {:?}", path);
//! }
//! ```

use std::path::{Path, PathBuf};

/// Application name used for directory paths.
const APP_NAME: &str = "sonograph";

/// File name of the default analysis configuration.
pub const DEFAULT_CONFIG_FILE: &str = "analysis.toml";

/// Returns the user-specific configuration directory.
///
/// # Platform Paths
///
/// - Linux: `~/.config/sonograph/`
/// - macOS: `~/Library/Application Support/sonograph/`
/// - Windows: `%APPDATA%\sonograph\`
///
/// Returns a fallback path if the config directory cannot be determined.
pub fn user_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Path of the default analysis configuration file.
pub fn default_config_path() -> PathBuf {
    user_config_dir().join(DEFAULT_CONFIG_FILE)
}

/// Ensure the user config directory exists.
///
/// Creates the directory and any parent directories if they don't exist.
///
/// # Errors
///
/// Returns an error if the directory cannot be created.
pub fn ensure_user_config_dir() -> Result<PathBuf, crate::ConfigError> {
    let dir = user_config_dir();

    if !dir.exists() {
        std::fs::create_dir_all(&dir).map_err(|e| crate::ConfigError::create_dir(&dir, e))?;
    }

    Ok(dir)
}

/// Find a configuration file by path or name.
///
/// Searches in the following order:
/// 1. `name` as given, if it is an existing file
/// 2. The user config directory, with `.toml` appended when missing
pub fn find_config(name: &str) -> Option<PathBuf> {
    find_config_in(name, &user_config_dir())
}

fn find_config_in(name: &str, dir: &Path) -> Option<PathBuf> {
    let path = PathBuf::from(name);
    if path.is_file() {
        return Some(path);
    }

    let filename = if name.ends_with(".toml") {
        name.to_string()
    } else {
        format!("{name}.toml")
    };

    let candidate = dir.join(filename);
    candidate.is_file().then_some(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_user_config_dir() {
        let dir = user_config_dir();
        assert!(dir.to_string_lossy().contains("sonograph"));
    }

    #[test]
    fn test_default_config_path() {
        let path = default_config_path();
        assert!(path.ends_with("sonograph/analysis.toml"));
    }

    #[test]
    fn test_find_config_by_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("speech.toml");
        fs::write(&path, "fft_scale = 2").unwrap();

        let found = find_config(path.to_str().unwrap());
        assert_eq!(found, Some(path));
    }

    #[test]
    fn test_find_config_adds_extension() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("speech.toml"), "").unwrap();

        let found = find_config_in("speech", temp_dir.path());
        assert_eq!(found, Some(temp_dir.path().join("speech.toml")));
        assert!(find_config_in("speech.toml", temp_dir.path()).is_some());
    }

    #[test]
    fn test_find_config_not_found() {
        let temp_dir = TempDir::new().unwrap();
        assert!(find_config_in("nonexistent_config_12345", temp_dir.path()).is_none());
    }
}
