//! Unified path management for lumen state files.
//!
//! All lumen configuration, secrets, and progression data are managed via
//! AppPaths from the version-migrate crate for consistency across all
//! storage.
//!
//! This ensures consistency across all platforms (Linux, macOS, Windows).

use std::path::PathBuf;
use version_migrate::AppPaths;

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Unified path management for lumen.
///
/// # Directory Structure
///
/// ```text
/// ~/.config/lumen/             # Config directory (AppPaths default)
/// ├── config.toml              # Application configuration
/// ├── secret.json              # Remote credentials and wallet address
/// ├── orb.json                 # Current orb snapshot
/// ├── orb_history.json         # Archived orbs, newest first
/// ├── stats.json               # Aggregate meditation stats
/// ├── achievements.json        # Milestone unlock state
/// ├── meditations/             # Custom meditation definitions (AsyncDirStorage)
/// └── logs/                    # Application logs
/// ```
pub struct LumenPaths;

impl LumenPaths {
    /// Returns a configured AppPaths instance for lumen.
    ///
    /// This uses the default PathStrategy (XDG on Linux/macOS, appropriate on Windows).
    fn app_paths() -> AppPaths {
        AppPaths::new("lumen")
    }

    /// Returns the lumen configuration directory.
    ///
    /// # Returns
    ///
    /// - `Ok(PathBuf)`: Path to config directory (e.g., `~/.config/lumen/`)
    /// - `Err(PathError::HomeDirNotFound)`: Could not determine directory
    pub fn config_dir() -> Result<PathBuf, PathError> {
        Self::app_paths()
            .config_dir()
            .map_err(|_| PathError::HomeDirNotFound)
    }

    /// Returns the path to the main configuration file.
    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Returns the path to the secrets file.
    ///
    /// # Security Note
    ///
    /// Ensure this file has appropriate permissions (e.g., 600) to prevent
    /// unauthorized access.
    pub fn secret_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("secret.json"))
    }

    /// Returns the path to the current orb snapshot.
    pub fn orb_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("orb.json"))
    }

    /// Returns the path to the orb history archive.
    pub fn orb_history_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("orb_history.json"))
    }

    /// Returns the path to the aggregate stats file.
    pub fn stats_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("stats.json"))
    }

    /// Returns the path to the achievements file.
    pub fn achievements_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("achievements.json"))
    }

    /// Returns the path to the custom meditation definitions directory.
    ///
    /// Note: This is primarily for display. New code should use
    /// FileMeditationRepository which manages this via AsyncDirStorage.
    pub fn meditations_dir() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("meditations"))
    }

    /// Returns the path to the logs directory.
    pub fn logs_dir() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("logs"))
    }

    /// Ensures the secret file exists, creating it with a template if it doesn't.
    ///
    /// The template includes empty placeholders using the SecretConfig type so
    /// users can fill in credentials by hand.
    ///
    /// # Security Note
    ///
    /// This function sets file permissions to 600 (user read/write only) on Unix systems.
    pub fn ensure_secret_file() -> Result<PathBuf, std::io::Error> {
        let secret_path = Self::secret_file()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::NotFound, e.to_string()))?;

        // If file already exists, return the path
        if secret_path.exists() {
            return Ok(secret_path);
        }

        // Ensure parent directory exists
        if let Some(parent) = secret_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        use lumen_core::config::SecretConfig;

        let template_json = serde_json::to_string_pretty(&SecretConfig::default())
            .map_err(std::io::Error::other)?;

        std::fs::write(&secret_path, template_json)?;

        // Set file permissions to 600 (user read/write only) on Unix
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(&secret_path, permissions)?;
        }

        Ok(secret_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_dir() {
        let config_dir = LumenPaths::config_dir().unwrap();
        // AppPaths returns platform-specific config directory with "lumen" appended
        assert!(config_dir.ends_with("lumen"));
    }

    #[test]
    fn test_config_file() {
        let config_file = LumenPaths::config_file().unwrap();
        assert!(config_file.ends_with("config.toml"));
        let config_dir = LumenPaths::config_dir().unwrap();
        assert!(config_file.starts_with(&config_dir));
    }

    #[test]
    fn test_state_files_live_under_config_dir() {
        let config_dir = LumenPaths::config_dir().unwrap();
        for file in [
            LumenPaths::secret_file().unwrap(),
            LumenPaths::orb_file().unwrap(),
            LumenPaths::orb_history_file().unwrap(),
            LumenPaths::stats_file().unwrap(),
            LumenPaths::achievements_file().unwrap(),
            LumenPaths::meditations_dir().unwrap(),
        ] {
            assert!(file.starts_with(&config_dir));
        }
    }

    #[test]
    fn test_logs_dir() {
        let logs_dir = LumenPaths::logs_dir().unwrap();
        assert!(logs_dir.ends_with("logs"));
    }
}
