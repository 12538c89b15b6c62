//! User identity resolution and storage-path sanitization.

use async_trait::async_trait;

use crate::error::Result;

/// Fallback path segment for identifiers that sanitize to nothing.
const UNKNOWN_IDENTIFIER: &str = "unknown";

/// Makes an identifier safe for use as a storage path segment.
///
/// Every character outside `[A-Za-z0-9_-]` is replaced 1:1 with `_`.
/// Empty or whitespace-only input sanitizes to the literal `"unknown"`.
pub fn sanitize_identifier(raw: &str) -> String {
    if raw.trim().is_empty() {
        return UNKNOWN_IDENTIFIER.to_string();
    }

    raw.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// A resolved user identity for remote namespacing.
///
/// Resolution priority is fixed: an authenticated uid when the auth gateway
/// produced one, else a configured wallet address. When neither exists,
/// remote sync is disabled for the session and no identity value is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserIdentity {
    /// Remote-auth user id
    Authenticated(String),
    /// Connected wallet address
    Wallet(String),
}

impl UserIdentity {
    /// The raw identifier string.
    pub fn raw(&self) -> &str {
        match self {
            UserIdentity::Authenticated(id) | UserIdentity::Wallet(id) => id,
        }
    }

    /// The storage-path-safe form of the identifier.
    pub fn sanitized(&self) -> String {
        sanitize_identifier(self.raw())
    }
}

/// Collaborator producing a stable authenticated identity string.
///
/// Implementations bootstrap an anonymous sign-in on first use; `resolve_uid`
/// must bound its wait rather than hang on a stuck bootstrap.
#[async_trait]
pub trait AuthGateway: Send + Sync {
    /// Returns the stable uid for this installation.
    async fn resolve_uid(&self) -> Result<String>;
}
