//! Application configuration models.

use serde::{Deserialize, Serialize};
use version_migrate::DeriveQueryable as Queryable;

/// Remote document-store settings.
///
/// An absent `[remote]` section in config.toml means remote sync is a
/// disabled feature for this installation, not an error.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct RemoteSettings {
    /// Base URL of the document store
    pub store_url: String,
    /// Anonymous-auth endpoint; identity falls back to the wallet address
    /// when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_url: Option<String>,
}

/// Background sync tuning.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct SyncSettings {
    /// Seconds between remote history polls
    pub interval_secs: u64,
    /// Page size for remote history fetches
    pub history_limit: usize,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            interval_secs: 300,
            history_limit: 50,
        }
    }
}

/// Root configuration loaded from config.toml.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq, Queryable)]
#[queryable(entity = "root_config")]
pub struct RootConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote: Option<RemoteSettings>,
    #[serde(default)]
    pub sync: SyncSettings,
}

impl RootConfig {
    /// Whether a remote store is configured at all.
    pub fn remote_enabled(&self) -> bool {
        self.remote.is_some()
    }
}

/// Credentials kept out of config.toml, stored in secret.json (0600).
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct SecretConfig {
    /// Bearer token for the remote store, if it requires one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Connected wallet address, the identity fallback
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wallet_address: Option<String>,
}
