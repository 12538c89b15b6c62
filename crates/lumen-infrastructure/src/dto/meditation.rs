//! Meditation definition DTOs and migrations

use serde::{Deserialize, Serialize};
use version_migrate::{IntoDomain, Versioned};

use lumen_core::meditation::MeditationDef;

/// Meditation definition schema V1.0.0.
#[derive(Debug, Clone, Serialize, Deserialize, Versioned)]
#[versioned(version = "1.0.0")]
pub struct MeditationDefV1_0 {
    /// Unique identifier (UUID format).
    pub id: String,
    pub title: String,
    pub duration_minutes: u32,
    /// Guidance script played by the session player.
    pub script: String,
    /// Creation timestamp (ISO 8601 format).
    pub created_at: String,
}

// ============================================================================
// Domain model conversions
// ============================================================================

impl IntoDomain<MeditationDef> for MeditationDefV1_0 {
    fn into_domain(self) -> MeditationDef {
        MeditationDef {
            id: self.id,
            title: self.title,
            duration_minutes: self.duration_minutes,
            script: self.script,
            created_at: self.created_at,
        }
    }
}

impl version_migrate::FromDomain<MeditationDef> for MeditationDefV1_0 {
    fn from_domain(def: MeditationDef) -> Self {
        MeditationDefV1_0 {
            id: def.id,
            title: def.title,
            duration_minutes: def.duration_minutes,
            script: def.script,
            created_at: def.created_at,
        }
    }
}

// ============================================================================
// Migrator factory
// ============================================================================

/// Creates and configures a Migrator instance for MeditationDef entities.
pub fn create_meditation_def_migrator() -> version_migrate::Migrator {
    let mut migrator = version_migrate::Migrator::builder().build();

    let def_path = version_migrate::Migrator::define("meditation_def")
        .from::<MeditationDefV1_0>()
        .into_with_save::<MeditationDef>();

    migrator
        .register(def_path)
        .expect("Failed to register meditation_def migration path");

    migrator
}
