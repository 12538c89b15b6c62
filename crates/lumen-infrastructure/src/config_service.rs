//! Configuration service implementation.
//!
//! Loads the root configuration from config.toml and credentials from
//! secret.json (~/.config/lumen/). A missing `[remote]` section disables
//! remote sync; it is not an error.

use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use version_migrate::{FileStorage, FileStorageStrategy, FormatStrategy, LoadBehavior};

use lumen_core::config::{RootConfig, SecretConfig};
use lumen_core::error::{LumenError, Result};

use crate::dto::create_root_config_migrator;
use crate::paths::LumenPaths;
use crate::storage::AtomicJsonFile;

/// Configuration service that loads and caches the root configuration.
///
/// The configuration is read once and cached; call
/// [`ConfigService::invalidate_cache`] after editing config.toml on disk.
#[derive(Debug, Clone)]
pub struct ConfigService {
    config_path: PathBuf,
    secret_path: PathBuf,
    /// Cached configuration loaded from file.
    config: Arc<RwLock<Option<RootConfig>>>,
}

impl ConfigService {
    /// Creates a ConfigService over the default locations, making sure the
    /// secret file exists with a fillable template.
    pub fn new() -> Result<Self> {
        let config_path =
            LumenPaths::config_file().map_err(|e| LumenError::config(e.to_string()))?;
        let secret_path = LumenPaths::ensure_secret_file()?;

        Ok(Self::with_paths(config_path, secret_path))
    }

    /// Creates a ConfigService over explicit paths.
    pub fn with_paths(config_path: PathBuf, secret_path: PathBuf) -> Self {
        Self {
            config_path,
            secret_path,
            config: Arc::new(RwLock::new(None)),
        }
    }

    /// Gets the root configuration, loading from file if not cached.
    pub fn get_config(&self) -> RootConfig {
        {
            let read_lock = self.config.read().unwrap();
            if let Some(ref cached) = *read_lock {
                return cached.clone();
            }
        }

        let loaded = self.load_config().unwrap_or_else(|e| {
            tracing::warn!("Failed to load config, using defaults: {}", e);
            RootConfig::default()
        });

        {
            let mut write_lock = self.config.write().unwrap();
            *write_lock = Some(loaded.clone());
        }

        loaded
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        let mut write_lock = self.config.write().unwrap();
        *write_lock = None;
    }

    /// Loads RootConfig from the config file using FileStorage.
    fn load_config(&self) -> Result<RootConfig> {
        let migrator = create_root_config_migrator();
        let strategy = FileStorageStrategy::new()
            .with_format(FormatStrategy::Toml)
            .with_load_behavior(LoadBehavior::CreateIfMissing);

        let mut storage = FileStorage::new(self.config_path.clone(), migrator, strategy)?;

        let configs: Vec<RootConfig> = storage.query("root_config")?;
        Ok(configs.into_iter().next().unwrap_or_default())
    }

    /// Loads the credential file, defaulting to empty credentials when the
    /// file is missing.
    pub fn load_secrets(&self) -> Result<SecretConfig> {
        let file = AtomicJsonFile::<SecretConfig>::new(self.secret_path.clone());
        let secrets = file
            .load()
            .map_err(|e| LumenError::config(format!("Failed to read secret file: {}", e)))?;
        Ok(secrets.unwrap_or_default())
    }

    /// Overwrites the credential file.
    pub fn save_secrets(&self, secrets: &SecretConfig) -> Result<()> {
        let file = AtomicJsonFile::<SecretConfig>::new(self.secret_path.clone());
        file.save(secrets)
            .map_err(|e| LumenError::config(format!("Failed to write secret file: {}", e)))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn service(dir: &TempDir) -> ConfigService {
        ConfigService::with_paths(
            dir.path().join("config.toml"),
            dir.path().join("secret.json"),
        )
    }

    #[test]
    fn test_defaults_when_config_missing() {
        let dir = TempDir::new().unwrap();
        let config = service(&dir).get_config();
        assert!(!config.remote_enabled());
    }

    #[test]
    fn test_reads_remote_section() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("config.toml"),
            r#"
version = "1.0.0"

[remote]
store_url = "https://store.example.com"
"#,
        )
        .unwrap();

        let config = service(&dir).get_config();
        assert!(config.remote_enabled());
        assert_eq!(
            config.remote.unwrap().store_url,
            "https://store.example.com"
        );
    }

    #[test]
    fn test_cache_and_invalidate() {
        let dir = TempDir::new().unwrap();
        let svc = service(&dir);
        assert!(!svc.get_config().remote_enabled());

        std::fs::write(
            dir.path().join("config.toml"),
            r#"
version = "1.0.0"

[remote]
store_url = "https://store.example.com"
"#,
        )
        .unwrap();

        // Cached value still served
        assert!(!svc.get_config().remote_enabled());

        svc.invalidate_cache();
        assert!(svc.get_config().remote_enabled());
    }

    #[test]
    fn test_secrets_roundtrip() {
        let dir = TempDir::new().unwrap();
        let svc = service(&dir);

        // Missing file reads as empty credentials
        assert_eq!(svc.load_secrets().unwrap(), SecretConfig::default());

        let secrets = SecretConfig {
            api_key: Some("key-123".to_string()),
            wallet_address: Some("0xABC".to_string()),
        };
        svc.save_secrets(&secrets).unwrap();
        assert_eq!(svc.load_secrets().unwrap(), secrets);
    }
}
