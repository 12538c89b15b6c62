//! Stats DTOs and migrations

use serde::{Deserialize, Serialize};
use version_migrate::{IntoDomain, MigratesTo, Versioned};

use lumen_core::stats::MeditationStats;

/// Stats schema V1.0.0 (initial version, no weekly tracker).
#[derive(Debug, Clone, Serialize, Deserialize, Versioned)]
#[versioned(version = "1.0.0")]
pub struct StatsV1_0 {
    pub total_sessions: u32,
    pub total_minutes: u32,
    pub current_streak: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_session_date: Option<String>,
}

/// Stats schema V1.1.0 (added week_progress).
#[derive(Debug, Clone, Serialize, Deserialize, Versioned)]
#[versioned(version = "1.1.0")]
pub struct StatsV1_1 {
    pub total_sessions: u32,
    pub total_minutes: u32,
    pub current_streak: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_session_date: Option<String>,
    /// Which days of the current week saw a completion, Monday = index 0.
    #[serde(default)]
    pub week_progress: [bool; 7],
}

// ============================================================================
// Migration implementations
// ============================================================================

/// Migration from StatsV1_0 to StatsV1_1.
impl MigratesTo<StatsV1_1> for StatsV1_0 {
    fn migrate(self) -> StatsV1_1 {
        StatsV1_1 {
            total_sessions: self.total_sessions,
            total_minutes: self.total_minutes,
            current_streak: self.current_streak,
            last_session_date: self.last_session_date,
            // The tracker refills naturally from the next completion on
            week_progress: [false; 7],
        }
    }
}

// ============================================================================
// Domain model conversions
// ============================================================================

impl IntoDomain<MeditationStats> for StatsV1_1 {
    fn into_domain(self) -> MeditationStats {
        MeditationStats {
            total_sessions: self.total_sessions,
            total_minutes: self.total_minutes,
            current_streak: self.current_streak,
            last_session_date: self.last_session_date,
            week_progress: self.week_progress,
        }
    }
}

impl version_migrate::FromDomain<MeditationStats> for StatsV1_1 {
    fn from_domain(stats: MeditationStats) -> Self {
        StatsV1_1 {
            total_sessions: stats.total_sessions,
            total_minutes: stats.total_minutes,
            current_streak: stats.current_streak,
            last_session_date: stats.last_session_date,
            week_progress: stats.week_progress,
        }
    }
}

// ============================================================================
// Migrator factory
// ============================================================================

/// Creates and configures a Migrator instance for MeditationStats entities.
///
/// # Migration Path
///
/// - V1.0.0 → V1.1.0: Adds `week_progress` (default all-false)
/// - V1.1.0 → MeditationStats: Converts DTO to domain model
pub fn create_stats_migrator() -> version_migrate::Migrator {
    let mut migrator = version_migrate::Migrator::builder().build();

    let stats_path = version_migrate::Migrator::define("meditation_stats")
        .from::<StatsV1_0>()
        .step::<StatsV1_1>()
        .into_with_save::<MeditationStats>();

    migrator
        .register(stats_path)
        .expect("Failed to register meditation_stats migration path");

    migrator
}
