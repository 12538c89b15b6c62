//! Sync-health diagnostics.
//!
//! An explicitly owned handle rather than ambient module state: whoever
//! renders sync status holds a clone. Errors are overwritten on each new
//! failure and never cleared for the lifetime of the process.

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::error::LumenError;

/// One recorded sync failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncErrorInfo {
    /// Short stable error code (see [`LumenError::code`])
    pub code: String,
    pub message: String,
    /// Timestamp the error was observed (ISO 8601 format)
    pub at: String,
}

/// Last observed auth and write failures, nullable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncDiagnostics {
    pub last_auth_error: Option<SyncErrorInfo>,
    pub last_write_error: Option<SyncErrorInfo>,
}

/// Shared, cloneable handle to the diagnostics state.
#[derive(Clone, Default)]
pub struct DiagnosticsHandle {
    inner: Arc<Mutex<SyncDiagnostics>>,
}

impl DiagnosticsHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a remote identity bootstrap failure.
    pub fn record_auth_error(&self, error: &LumenError, at: impl Into<String>) {
        let mut guard = self.inner.lock().expect("diagnostics lock poisoned");
        guard.last_auth_error = Some(SyncErrorInfo {
            code: error.code(),
            message: error.to_string(),
            at: at.into(),
        });
    }

    /// Records a remote write failure.
    pub fn record_write_error(&self, error: &LumenError, at: impl Into<String>) {
        let mut guard = self.inner.lock().expect("diagnostics lock poisoned");
        guard.last_write_error = Some(SyncErrorInfo {
            code: error.code(),
            message: error.to_string(),
            at: at.into(),
        });
    }

    /// Current diagnostics state for rendering.
    pub fn snapshot(&self) -> SyncDiagnostics {
        self.inner.lock().expect("diagnostics lock poisoned").clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_clean() {
        let handle = DiagnosticsHandle::new();
        let snapshot = handle.snapshot();
        assert!(snapshot.last_auth_error.is_none());
        assert!(snapshot.last_write_error.is_none());
    }

    #[test]
    fn test_overwrites_never_clears() {
        let handle = DiagnosticsHandle::new();
        handle.record_write_error(
            &LumenError::remote(Some(500), "server sad"),
            "2026-01-01T00:00:00Z",
        );
        handle.record_write_error(
            &LumenError::remote(Some(403), "permission denied"),
            "2026-01-02T00:00:00Z",
        );

        let snapshot = handle.snapshot();
        let write = snapshot.last_write_error.unwrap();
        assert_eq!(write.code, "remote/403");
        assert_eq!(write.at, "2026-01-02T00:00:00Z");
        // Auth slot untouched by write errors
        assert!(snapshot.last_auth_error.is_none());
    }

    #[test]
    fn test_clones_share_state() {
        let handle = DiagnosticsHandle::new();
        let other = handle.clone();
        other.record_auth_error(&LumenError::auth("bootstrap timed out"), "2026-01-01T00:00:00Z");
        assert!(handle.snapshot().last_auth_error.is_some());
    }
}
