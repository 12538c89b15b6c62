//! Root configuration DTOs and migrations

use serde::{Deserialize, Serialize};
use version_migrate::{IntoDomain, Versioned};

use lumen_core::config::{RemoteSettings, RootConfig, SyncSettings};

/// Remote settings DTO matching the domain model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteSettingsDTO {
    pub store_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_url: Option<String>,
}

/// Sync settings DTO matching the domain model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncSettingsDTO {
    pub interval_secs: u64,
    pub history_limit: usize,
}

impl Default for SyncSettingsDTO {
    fn default() -> Self {
        let defaults = SyncSettings::default();
        Self {
            interval_secs: defaults.interval_secs,
            history_limit: defaults.history_limit,
        }
    }
}

/// Root configuration schema V1.0.0.
#[derive(Debug, Clone, Serialize, Deserialize, Versioned, Default)]
#[versioned(version = "1.0.0")]
pub struct RootConfigV1_0 {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote: Option<RemoteSettingsDTO>,
    #[serde(default)]
    pub sync: SyncSettingsDTO,
}

// ============================================================================
// Domain model conversions
// ============================================================================

impl IntoDomain<RootConfig> for RootConfigV1_0 {
    fn into_domain(self) -> RootConfig {
        RootConfig {
            remote: self.remote.map(|r| RemoteSettings {
                store_url: r.store_url,
                auth_url: r.auth_url,
            }),
            sync: SyncSettings {
                interval_secs: self.sync.interval_secs,
                history_limit: self.sync.history_limit,
            },
        }
    }
}

impl version_migrate::FromDomain<RootConfig> for RootConfigV1_0 {
    fn from_domain(config: RootConfig) -> Self {
        RootConfigV1_0 {
            remote: config.remote.map(|r| RemoteSettingsDTO {
                store_url: r.store_url,
                auth_url: r.auth_url,
            }),
            sync: SyncSettingsDTO {
                interval_secs: config.sync.interval_secs,
                history_limit: config.sync.history_limit,
            },
        }
    }
}

// ============================================================================
// Migrator factory
// ============================================================================

/// Creates and configures a Migrator instance for RootConfig entities.
pub fn create_root_config_migrator() -> version_migrate::Migrator {
    let mut migrator = version_migrate::Migrator::builder().build();

    let config_path = version_migrate::Migrator::define("root_config")
        .from::<RootConfigV1_0>()
        .into_with_save::<RootConfig>();

    migrator
        .register(config_path)
        .expect("Failed to register root_config migration path");

    migrator
}
