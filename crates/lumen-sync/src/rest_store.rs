//! REST client for the remote document store.
//!
//! The store is path-addressed and append-only per user: a POST under a
//! collection path returns the auto-generated child key, and nothing is
//! ever overwritten in place. Layout:
//!
//! ```text
//! meditations/{sanitizedUserId}/{autoId}        session records
//! meditations/{sanitizedUserId}/debug/{autoId}  diagnostic pings
//! gifts/{sanitizedRecipientId}/{autoId}         consumable gift records
//! ```

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use futures::future::join_all;
use once_cell::sync::Lazy;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use lumen_core::error::{LumenError, Result};
use lumen_core::gift::GiftPayload;
use lumen_core::identity::sanitize_identifier;
use lumen_core::meditation::SessionRecord;
use lumen_core::remote::RemoteSyncService;

/// Shared HTTP client so every remote call reuses one connection pool.
static HTTP_CLIENT: Lazy<Client> = Lazy::new(Client::new);

const WRITE_TIMEOUT: Duration = Duration::from_secs(10);
const READ_TIMEOUT: Duration = Duration::from_secs(30);

/// Remote sync service over the REST document store.
#[derive(Clone)]
pub struct RestRemoteSyncService {
    client: Client,
    store_url: String,
    api_key: Option<String>,
}

/// Response of an append: the auto-generated child key.
#[derive(Debug, Deserialize)]
struct PushResponse {
    name: String,
}

impl RestRemoteSyncService {
    /// Creates a new service with explicit configuration.
    pub fn new(store_url: impl Into<String>, api_key: Option<String>) -> Self {
        let store_url: String = store_url.into();
        Self {
            client: HTTP_CLIENT.clone(),
            store_url: store_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    /// Makes an authenticated request to the store.
    fn auth_request(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if let Some(api_key) = &self.api_key {
            request.header("Authorization", format!("Bearer {}", api_key))
        } else {
            request
        }
    }

    /// Appends a value under `path`, returning the generated child key.
    async fn append(&self, path: &str, body: &serde_json::Value) -> Result<String> {
        let url = format!("{}/{}", self.store_url, path);
        let request = self.auth_request(self.client.post(&url).json(body).timeout(WRITE_TIMEOUT));

        match request.send().await {
            Ok(response) if response.status().is_success() => {
                let pushed: PushResponse = response
                    .json()
                    .await
                    .map_err(|e| LumenError::remote(None, format!("Malformed push response: {}", e)))?;
                tracing::debug!(target: "remote_sync", "Appended {}/{}", path, pushed.name);
                Ok(pushed.name)
            }
            Ok(response) => {
                let status = response.status().as_u16();
                let error_text = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unknown error".to_string());
                Err(LumenError::remote(Some(status), error_text))
            }
            Err(e) => Err(LumenError::remote(
                e.status().map(|s| s.as_u16()),
                e.to_string(),
            )),
        }
    }

    /// Reads all children of `path` as a key → value map.
    async fn read_collection(&self, path: &str) -> Result<HashMap<String, serde_json::Value>> {
        let url = format!("{}/{}", self.store_url, path);
        let request = self.auth_request(self.client.get(&url).timeout(READ_TIMEOUT));

        match request.send().await {
            Ok(response) if response.status().is_success() => {
                // An empty collection comes back as JSON null
                let body: Option<HashMap<String, serde_json::Value>> = response
                    .json()
                    .await
                    .map_err(|e| LumenError::remote(None, format!("Malformed collection: {}", e)))?;
                Ok(body.unwrap_or_default())
            }
            Ok(response) => {
                let status = response.status().as_u16();
                let error_text = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unknown error".to_string());
                Err(LumenError::remote(Some(status), error_text))
            }
            Err(e) => Err(LumenError::remote(
                e.status().map(|s| s.as_u16()),
                e.to_string(),
            )),
        }
    }

    /// Deletes one child record, best effort.
    async fn delete_child(&self, path: &str, key: &str) {
        let url = format!("{}/{}/{}", self.store_url, path, key);
        let request = self.auth_request(self.client.delete(&url).timeout(WRITE_TIMEOUT));

        match request.send().await {
            Ok(response) if response.status().is_success() => {}
            Ok(response) => {
                tracing::warn!(
                    target: "remote_sync",
                    "Failed to consume {}/{}: HTTP {}",
                    path,
                    key,
                    response.status()
                );
            }
            Err(e) => {
                tracing::warn!(target: "remote_sync", "Failed to consume {}/{}: {}", path, key, e);
            }
        }
    }
}

#[async_trait]
impl RemoteSyncService for RestRemoteSyncService {
    async fn record_session(&self, user: &str, record: &SessionRecord) -> Result<String> {
        let path = format!("meditations/{}", sanitize_identifier(user));
        let body = serde_json::to_value(record)?;
        self.append(&path, &body).await
    }

    async fn record_debug_ping(&self, user: &str) -> Result<String> {
        let path = format!("meditations/{}/debug", sanitize_identifier(user));
        let body = json!({
            "ping": true,
            "source": "lumen",
            "created_at": Utc::now().to_rfc3339(),
        });
        self.append(&path, &body).await
    }

    async fn deliver_gift(&self, recipient: &str, gift: &GiftPayload) -> Result<String> {
        let path = format!("gifts/{}", sanitize_identifier(recipient));
        let body = serde_json::to_value(gift)?;
        self.append(&path, &body).await
    }

    async fn fetch_sessions(&self, user: &str, limit: usize) -> Result<Vec<SessionRecord>> {
        let path = format!("meditations/{}", sanitize_identifier(user));
        let children = self.read_collection(&path).await?;

        let mut records: Vec<SessionRecord> = children
            .into_values()
            .filter_map(|value| match serde_json::from_value(value) {
                Ok(record) => Some(record),
                Err(e) => {
                    // Undecodable record: fail closed, treat as absent
                    tracing::warn!(target: "remote_sync", "Skipping malformed session record: {}", e);
                    None
                }
            })
            .collect();

        // Newest first, bounded page
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        records.truncate(limit);

        Ok(records)
    }

    async fn take_gifts(&self, user: &str) -> Result<Vec<GiftPayload>> {
        let path = format!("gifts/{}", sanitize_identifier(user));
        let children = self.read_collection(&path).await?;

        if children.is_empty() {
            return Ok(Vec::new());
        }

        let mut gifts = Vec::new();
        let mut consumed_keys = Vec::new();

        for (key, value) in children {
            match GiftPayload::from_value(value) {
                Some(gift) => {
                    gifts.push(gift);
                    consumed_keys.push(key);
                }
                None => {
                    // Unknown schema version or garbage: drop it from the
                    // queue so it is not re-examined on every poll
                    tracing::warn!(target: "remote_sync", "Discarding malformed gift {}/{}", path, key);
                    consumed_keys.push(key);
                }
            }
        }

        // Gifts are read-once: consume every examined record
        join_all(
            consumed_keys
                .iter()
                .map(|key| self.delete_child(&path, key)),
        )
        .await;

        // Oldest first so recipients see gifts in arrival order
        gifts.sort_by(|a, b| a.created_at.cmp(&b.created_at));

        Ok(gifts)
    }
}
