//! Remote synchronization capability.
//!
//! The remote store is an append-only, path-addressed log per user: local
//! storage keeps only the latest snapshot, the remote keeps full history
//! across devices. The store may be absent entirely (not configured); the
//! disabled implementation below gives call sites a single code path for
//! that case instead of presence checks scattered around.

use async_trait::async_trait;

use crate::error::{LumenError, Result};
use crate::gift::GiftPayload;
use crate::meditation::SessionRecord;

/// Trait for mirroring state to a shared remote document store.
///
/// Implementations sanitize every identity used as a path segment and append
/// under auto-generated child keys; nothing is ever overwritten in place.
#[async_trait]
pub trait RemoteSyncService: Send + Sync {
    /// Appends a session record under `meditations/{user}/`.
    ///
    /// Returns the store's auto-generated child key.
    async fn record_session(&self, user: &str, record: &SessionRecord) -> Result<String>;

    /// Appends a diagnostic ping under `meditations/{user}/debug/`.
    async fn record_debug_ping(&self, user: &str) -> Result<String>;

    /// Appends a gift under `gifts/{recipient}/`.
    async fn deliver_gift(&self, recipient: &str, gift: &GiftPayload) -> Result<String>;

    /// Fetches up to `limit` most recent session records, newest first.
    ///
    /// Returns an empty list (not an error) when the store is disabled.
    async fn fetch_sessions(&self, user: &str, limit: usize) -> Result<Vec<SessionRecord>>;

    /// Consumes all pending gifts for the user (read-then-delete).
    ///
    /// Records that fail the gift schema check are skipped and deleted.
    /// Returns an empty list (not an error) when the store is disabled.
    async fn take_gifts(&self, user: &str) -> Result<Vec<GiftPayload>>;
}

/// The null implementation used when no remote store is configured.
///
/// Writes fail with [`LumenError::RemoteDisabled`]; background sync treats
/// that variant as a silent skip while user-triggered diagnostics surface
/// it. Reads degrade to empty results.
pub struct DisabledRemoteSyncService;

#[async_trait]
impl RemoteSyncService for DisabledRemoteSyncService {
    async fn record_session(&self, _user: &str, _record: &SessionRecord) -> Result<String> {
        Err(LumenError::RemoteDisabled)
    }

    async fn record_debug_ping(&self, _user: &str) -> Result<String> {
        Err(LumenError::RemoteDisabled)
    }

    async fn deliver_gift(&self, _recipient: &str, _gift: &GiftPayload) -> Result<String> {
        Err(LumenError::RemoteDisabled)
    }

    async fn fetch_sessions(&self, _user: &str, _limit: usize) -> Result<Vec<SessionRecord>> {
        Ok(Vec::new())
    }

    async fn take_gifts(&self, _user: &str) -> Result<Vec<GiftPayload>> {
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_disabled_writes_fail_with_disabled() {
        let service = DisabledRemoteSyncService;
        let err = service.record_debug_ping("user").await.unwrap_err();
        assert!(err.is_remote_disabled());
    }

    #[tokio::test]
    async fn test_disabled_reads_are_empty() {
        let service = DisabledRemoteSyncService;
        assert!(service.fetch_sessions("user", 20).await.unwrap().is_empty());
        assert!(service.take_gifts("user").await.unwrap().is_empty());
    }
}
