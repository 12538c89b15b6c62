//! Remote collaborators: the REST document store and the anonymous-auth
//! identity bootstrap.

pub mod auth;
pub mod rest_store;

use std::sync::Arc;

use lumen_core::config::{RootConfig, SecretConfig};
use lumen_core::diagnostics::DiagnosticsHandle;
use lumen_core::remote::{DisabledRemoteSyncService, RemoteSyncService};

pub use auth::{IdentityResolver, RestAuthGateway};
pub use rest_store::RestRemoteSyncService;

/// Builds the remote sync service for the given configuration.
///
/// No `[remote]` section means the disabled null implementation; call sites
/// never check for presence themselves.
pub fn remote_from_config(
    config: &RootConfig,
    secrets: &SecretConfig,
) -> Arc<dyn RemoteSyncService> {
    match &config.remote {
        Some(remote) => {
            tracing::info!(target: "remote_sync", "Remote store configured: {}", remote.store_url);
            Arc::new(RestRemoteSyncService::new(
                remote.store_url.clone(),
                secrets.api_key.clone(),
            ))
        }
        None => {
            tracing::debug!(target: "remote_sync", "No remote store configured, sync disabled");
            Arc::new(DisabledRemoteSyncService)
        }
    }
}

/// Builds the identity resolver for the given configuration.
///
/// Resolution priority: authenticated uid (when an auth endpoint is
/// configured), else the configured wallet address, else no identity.
pub fn identity_from_config(
    config: &RootConfig,
    secrets: &SecretConfig,
    diagnostics: DiagnosticsHandle,
) -> IdentityResolver {
    let gateway = config
        .remote
        .as_ref()
        .and_then(|r| r.auth_url.clone())
        .map(|url| {
            Arc::new(RestAuthGateway::new(url, secrets.api_key.clone()))
                as Arc<dyn lumen_core::identity::AuthGateway>
        });

    IdentityResolver::new(gateway, secrets.wallet_address.clone(), diagnostics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_core::config::RemoteSettings;

    #[tokio::test]
    async fn test_remote_disabled_without_config() {
        let service = remote_from_config(&RootConfig::default(), &SecretConfig::default());
        let err = service.record_debug_ping("user").await.unwrap_err();
        assert!(err.is_remote_disabled());
    }

    #[tokio::test]
    async fn test_identity_falls_back_to_wallet() {
        let config = RootConfig {
            remote: Some(RemoteSettings {
                store_url: "https://store.example.com".to_string(),
                auth_url: None,
            }),
            ..Default::default()
        };
        let secrets = SecretConfig {
            api_key: None,
            wallet_address: Some("0xABC".to_string()),
        };

        let resolver = identity_from_config(&config, &secrets, DiagnosticsHandle::new());
        let identity = resolver.resolve().await.unwrap();
        assert_eq!(identity.raw(), "0xABC");
    }

    #[tokio::test]
    async fn test_no_identity_without_auth_or_wallet() {
        let resolver = identity_from_config(
            &RootConfig::default(),
            &SecretConfig::default(),
            DiagnosticsHandle::new(),
        );
        assert!(resolver.resolve().await.is_none());
    }
}
