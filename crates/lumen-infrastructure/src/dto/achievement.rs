//! Achievement DTOs and migrations

use serde::{Deserialize, Serialize};
use version_migrate::{IntoDomain, Versioned};

use lumen_core::achievement::{Achievement, AchievementKind};

/// Achievement kind DTO matching the domain model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AchievementKindDTO {
    FirstSession,
    WeekStreak,
    TenSessions,
    HourOfCalm,
}

impl From<AchievementKindDTO> for AchievementKind {
    fn from(dto: AchievementKindDTO) -> Self {
        match dto {
            AchievementKindDTO::FirstSession => AchievementKind::FirstSession,
            AchievementKindDTO::WeekStreak => AchievementKind::WeekStreak,
            AchievementKindDTO::TenSessions => AchievementKind::TenSessions,
            AchievementKindDTO::HourOfCalm => AchievementKind::HourOfCalm,
        }
    }
}

impl From<AchievementKind> for AchievementKindDTO {
    fn from(kind: AchievementKind) -> Self {
        match kind {
            AchievementKind::FirstSession => AchievementKindDTO::FirstSession,
            AchievementKind::WeekStreak => AchievementKindDTO::WeekStreak,
            AchievementKind::TenSessions => AchievementKindDTO::TenSessions,
            AchievementKind::HourOfCalm => AchievementKindDTO::HourOfCalm,
        }
    }
}

/// Achievement schema V1.0.0.
#[derive(Debug, Clone, Serialize, Deserialize, Versioned)]
#[versioned(version = "1.0.0")]
pub struct AchievementV1_0 {
    pub kind: AchievementKindDTO,
    pub unlocked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unlocked_at: Option<String>,
}

// ============================================================================
// Domain model conversions
// ============================================================================

impl IntoDomain<Achievement> for AchievementV1_0 {
    fn into_domain(self) -> Achievement {
        Achievement {
            kind: self.kind.into(),
            unlocked: self.unlocked,
            unlocked_at: self.unlocked_at,
        }
    }
}

impl version_migrate::FromDomain<Achievement> for AchievementV1_0 {
    fn from_domain(achievement: Achievement) -> Self {
        AchievementV1_0 {
            kind: achievement.kind.into(),
            unlocked: achievement.unlocked,
            unlocked_at: achievement.unlocked_at,
        }
    }
}

// ============================================================================
// Migrator factory
// ============================================================================

/// Creates and configures a Migrator instance for Achievement entities.
pub fn create_achievement_migrator() -> version_migrate::Migrator {
    let mut migrator = version_migrate::Migrator::builder().build();

    let achievement_path = version_migrate::Migrator::define("achievement")
        .from::<AchievementV1_0>()
        .into_with_save::<Achievement>();

    migrator
        .register(achievement_path)
        .expect("Failed to register achievement migration path");

    migrator
}

#[cfg(test)]
mod migrator_tests {
    use super::*;

    #[test]
    fn test_achievement_migration_to_domain() {
        let migrator = create_achievement_migrator();

        let toml_str = r#"
version = "1.0.0"
kind = "week_streak"
unlocked = true
unlocked_at = "2025-12-01T08:00:00Z"
"#;
        let toml_value: toml::Value = toml::from_str(toml_str).unwrap();

        let result: Result<Achievement, _> = migrator.load_flat_from("achievement", toml_value);
        assert!(result.is_ok(), "Migration failed: {:?}", result.err());

        let achievement = result.unwrap();
        assert_eq!(achievement.kind, AchievementKind::WeekStreak);
        assert!(achievement.unlocked);
    }
}
