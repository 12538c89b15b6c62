//! Orb DTOs and migrations

use serde::{Deserialize, Serialize};
use version_migrate::{IntoDomain, MigratesTo, Versioned};

use lumen_core::orb::Orb;

/// Orb schema V1.0.0 (initial version, before minute accounting existed).
#[derive(Debug, Clone, Serialize, Deserialize, Versioned)]
#[versioned(version = "1.0.0")]
pub struct OrbV1_0 {
    /// Unique orb identifier (UUID format).
    pub id: String,
    /// Count of accumulated color layers.
    pub level: u8,
    /// Color layers in insertion order.
    pub layers: Vec<String>,
    /// True once all seven layers are held.
    #[serde(default)]
    pub is_awakened: bool,
    /// Creation timestamp (ISO 8601 format).
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Orb schema V1.1.0 (added accumulated_minutes for tier derivation).
#[derive(Debug, Clone, Serialize, Deserialize, Versioned)]
#[versioned(version = "1.1.0")]
pub struct OrbV1_1 {
    /// Unique orb identifier (UUID format).
    pub id: String,
    /// Count of accumulated color layers.
    pub level: u8,
    /// Color layers in insertion order.
    pub layers: Vec<String>,
    /// Cumulative meditation minutes credited toward the tier.
    #[serde(default)]
    pub accumulated_minutes: u32,
    /// True once all seven layers are held.
    #[serde(default)]
    pub is_awakened: bool,
    /// Creation timestamp (ISO 8601 format).
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

// ============================================================================
// Migration implementations
// ============================================================================

/// Migration from OrbV1_0 to OrbV1_1.
///
/// Pre-1.1 orbs never tracked minutes; they restart at the seed tier while
/// keeping their visual layers.
impl MigratesTo<OrbV1_1> for OrbV1_0 {
    fn migrate(self) -> OrbV1_1 {
        OrbV1_1 {
            id: self.id,
            level: self.level,
            layers: self.layers,
            accumulated_minutes: 0,
            is_awakened: self.is_awakened,
            created_at: self.created_at,
            completed_at: self.completed_at,
            sender: self.sender,
            message: self.message,
        }
    }
}

// ============================================================================
// Domain model conversions
// ============================================================================

impl IntoDomain<Orb> for OrbV1_1 {
    fn into_domain(self) -> Orb {
        Orb {
            id: self.id,
            level: self.level,
            layers: self.layers,
            accumulated_minutes: self.accumulated_minutes,
            is_awakened: self.is_awakened,
            created_at: self.created_at,
            completed_at: self.completed_at,
            sender: self.sender,
            message: self.message,
        }
    }
}

impl version_migrate::FromDomain<Orb> for OrbV1_1 {
    fn from_domain(orb: Orb) -> Self {
        OrbV1_1 {
            id: orb.id,
            level: orb.level,
            layers: orb.layers,
            accumulated_minutes: orb.accumulated_minutes,
            is_awakened: orb.is_awakened,
            created_at: orb.created_at,
            completed_at: orb.completed_at,
            sender: orb.sender,
            message: orb.message,
        }
    }
}

// ============================================================================
// Migrator factory
// ============================================================================

/// Creates and configures a Migrator instance for Orb entities.
///
/// # Migration Path
///
/// - V1.0.0 → V1.1.0: Adds `accumulated_minutes` (default 0)
/// - V1.1.0 → Orb: Converts DTO to domain model
pub fn create_orb_migrator() -> version_migrate::Migrator {
    let mut migrator = version_migrate::Migrator::builder().build();

    let orb_path = version_migrate::Migrator::define("orb")
        .from::<OrbV1_0>()
        .step::<OrbV1_1>()
        .into_with_save::<Orb>();

    migrator
        .register(orb_path)
        .expect("Failed to register orb migration path");

    migrator
}
