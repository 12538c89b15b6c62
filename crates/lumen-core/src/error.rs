//! Error types for the Lumen application.

use serde::Serialize;
use thiserror::Error;

/// A shared error type for the entire Lumen application.
///
/// This provides typed, structured error variants with automatic conversion
/// from common error types via the `From` trait.
#[derive(Error, Debug, Clone, Serialize)]
pub enum LumenError {
    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Data access error (repository/storage layer)
    #[error("Data access error: {0}")]
    DataAccess(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON", etc.
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Migration error
    #[error("Migration error: {0}")]
    Migration(String),

    /// Remote identity bootstrap failure
    #[error("Auth error: {0}")]
    Auth(String),

    /// Remote store write/read failure with optional HTTP status
    #[error("Remote error: {message}")]
    Remote {
        code: Option<u16>,
        message: String,
    },

    /// Remote store is not configured for this installation.
    ///
    /// This is a disabled-feature condition, not a failure: background sync
    /// paths skip on it silently, user-triggered diagnostics surface it.
    #[error("Remote sync is disabled")]
    RemoteDisabled,

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl LumenError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates a DataAccess error
    pub fn data_access(message: impl Into<String>) -> Self {
        Self::DataAccess(message.into())
    }

    /// Creates an Auth error
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth(message.into())
    }

    /// Creates a Remote error
    pub fn remote(code: Option<u16>, message: impl Into<String>) -> Self {
        Self::Remote {
            code,
            message: message.into(),
        }
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Creates a Migration error
    pub fn migration(message: impl Into<String>) -> Self {
        Self::Migration(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is the disabled-feature condition
    pub fn is_remote_disabled(&self) -> bool {
        matches!(self, Self::RemoteDisabled)
    }

    /// Check if this is an auth error
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth(_))
    }

    /// Short stable code for diagnostics display.
    ///
    /// Remote errors carry their HTTP status when one was observed.
    pub fn code(&self) -> String {
        match self {
            Self::NotFound { .. } => "not_found".to_string(),
            Self::Io { .. } => "io".to_string(),
            Self::DataAccess(_) => "data_access".to_string(),
            Self::Serialization { .. } => "serialization".to_string(),
            Self::Config(_) => "config".to_string(),
            Self::Migration(_) => "migration".to_string(),
            Self::Auth(_) => "auth".to_string(),
            Self::Remote {
                code: Some(status), ..
            } => format!("remote/{}", status),
            Self::Remote { code: None, .. } => "remote".to_string(),
            Self::RemoteDisabled => "remote_disabled".to_string(),
            Self::Internal(_) => "internal".to_string(),
        }
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for LumenError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for LumenError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for LumenError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for LumenError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<version_migrate::MigrationError> for LumenError {
    fn from(err: version_migrate::MigrationError) -> Self {
        use version_migrate::MigrationError;

        match err {
            MigrationError::EntityNotFound(id) => Self::not_found("entity", id),
            MigrationError::DeserializationError(_) => Self::Serialization {
                format: "migration".to_string(),
                message: err.to_string(),
            },
            MigrationError::SerializationError(_) => Self::Serialization {
                format: "migration".to_string(),
                message: err.to_string(),
            },
            MigrationError::TomlParseError(_) | MigrationError::TomlSerializeError(_) => {
                Self::Serialization {
                    format: "TOML".to_string(),
                    message: err.to_string(),
                }
            }
            MigrationError::IoError { .. } => Self::Io {
                message: err.to_string(),
            },
            _ => Self::Migration(err.to_string()),
        }
    }
}

/// Conversion from anyhow::Error (transitional, should be removed eventually)
impl From<anyhow::Error> for LumenError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Conversion from String (for error messages)
impl From<String> for LumenError {
    fn from(err: String) -> Self {
        Self::Internal(err)
    }
}

/// A type alias for `Result<T, LumenError>`.
pub type Result<T> = std::result::Result<T, LumenError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_code_carries_status() {
        let err = LumenError::remote(Some(403), "permission denied");
        assert_eq!(err.code(), "remote/403");

        let err = LumenError::remote(None, "connection refused");
        assert_eq!(err.code(), "remote");
    }

    #[test]
    fn test_remote_disabled_predicate() {
        assert!(LumenError::RemoteDisabled.is_remote_disabled());
        assert!(!LumenError::auth("boom").is_remote_disabled());
    }
}
