//! Anonymous-auth bootstrap and identity resolution.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;
use tokio::sync::OnceCell;

use lumen_core::diagnostics::DiagnosticsHandle;
use lumen_core::error::{LumenError, Result};
use lumen_core::identity::{AuthGateway, UserIdentity};

/// Upper bound on waiting for the auth bootstrap before falling back.
const AUTH_WAIT_BOUND: Duration = Duration::from_secs(15);

/// Per-request transport timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Auth gateway performing an anonymous sign-in against a REST endpoint.
pub struct RestAuthGateway {
    client: Client,
    auth_url: String,
    api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SignInResponse {
    uid: String,
}

impl RestAuthGateway {
    pub fn new(auth_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            auth_url: auth_url.into(),
            api_key,
        }
    }

    fn auth_request(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if let Some(api_key) = &self.api_key {
            request.header("Authorization", format!("Bearer {}", api_key))
        } else {
            request
        }
    }
}

#[async_trait]
impl AuthGateway for RestAuthGateway {
    async fn resolve_uid(&self) -> Result<String> {
        let request = self.auth_request(
            self.client
                .post(&self.auth_url)
                .timeout(REQUEST_TIMEOUT),
        );

        match request.send().await {
            Ok(response) if response.status().is_success() => {
                let signed_in: SignInResponse = response
                    .json()
                    .await
                    .map_err(|e| LumenError::auth(format!("Malformed sign-in response: {}", e)))?;
                Ok(signed_in.uid)
            }
            Ok(response) => {
                let status = response.status().as_u16();
                let error_text = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unknown error".to_string());
                Err(LumenError::auth(format!(
                    "Anonymous sign-in failed ({}): {}",
                    status, error_text
                )))
            }
            Err(e) => Err(LumenError::auth(format!("Anonymous sign-in failed: {}", e))),
        }
    }
}

/// Resolves the identity used to namespace remote records.
///
/// Priority order: authenticated uid, else configured wallet address, else
/// none (remote sync disabled for this session). The outcome is resolved
/// once and cached for the session, including the no-identity outcome.
pub struct IdentityResolver {
    gateway: Option<Arc<dyn AuthGateway>>,
    wallet_address: Option<String>,
    diagnostics: DiagnosticsHandle,
    cached: OnceCell<Option<UserIdentity>>,
}

impl IdentityResolver {
    pub fn new(
        gateway: Option<Arc<dyn AuthGateway>>,
        wallet_address: Option<String>,
        diagnostics: DiagnosticsHandle,
    ) -> Self {
        Self {
            gateway,
            wallet_address,
            diagnostics,
            cached: OnceCell::new(),
        }
    }

    /// Resolves the identity, waiting (bounded) for the auth bootstrap.
    pub async fn resolve(&self) -> Option<UserIdentity> {
        self.cached
            .get_or_init(|| async {
                if let Some(gateway) = &self.gateway {
                    match tokio::time::timeout(AUTH_WAIT_BOUND, gateway.resolve_uid()).await {
                        Ok(Ok(uid)) => return Some(UserIdentity::Authenticated(uid)),
                        Ok(Err(e)) => {
                            tracing::warn!(target: "remote_sync", "Auth bootstrap failed: {}", e);
                            self.diagnostics.record_auth_error(&e, Utc::now().to_rfc3339());
                        }
                        Err(_) => {
                            let e = LumenError::auth("Auth bootstrap timed out");
                            tracing::warn!(target: "remote_sync", "{}", e);
                            self.diagnostics.record_auth_error(&e, Utc::now().to_rfc3339());
                        }
                    }
                }

                self.wallet_address.clone().map(UserIdentity::Wallet)
            })
            .await
            .clone()
    }
}
