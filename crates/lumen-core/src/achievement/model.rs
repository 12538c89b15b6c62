//! Achievement domain model and evaluation.
//!
//! Four fixed milestones, each unlocked at most once. An unlocked
//! achievement is never re-locked, whatever the stats later look like.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoEnumIterator};
use version_migrate::DeriveQueryable as Queryable;

use crate::stats::MeditationStats;

/// The fixed milestone set.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AchievementKind {
    /// First session ever
    FirstSession,
    /// Streak of 7 consecutive days
    WeekStreak,
    /// 10 total sessions
    TenSessions,
    /// 60 total minutes
    HourOfCalm,
}

impl AchievementKind {
    /// Display title for the achievement.
    pub fn title(&self) -> &'static str {
        match self {
            AchievementKind::FirstSession => "First Breath",
            AchievementKind::WeekStreak => "Seven Suns",
            AchievementKind::TenSessions => "Steady Practice",
            AchievementKind::HourOfCalm => "Hour of Calm",
        }
    }

    fn is_met(&self, stats: &MeditationStats) -> bool {
        match self {
            AchievementKind::FirstSession => stats.total_sessions >= 1,
            AchievementKind::WeekStreak => stats.current_streak >= 7,
            AchievementKind::TenSessions => stats.total_sessions >= 10,
            AchievementKind::HourOfCalm => stats.total_minutes >= 60,
        }
    }
}

/// One milestone and its unlock state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Queryable)]
#[queryable(entity = "achievement")]
pub struct Achievement {
    pub kind: AchievementKind,
    pub unlocked: bool,
    /// Timestamp of the unlock (ISO 8601 format)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unlocked_at: Option<String>,
}

impl Achievement {
    /// Creates a locked achievement of the given kind.
    pub fn locked(kind: AchievementKind) -> Self {
        Self {
            kind,
            unlocked: false,
            unlocked_at: None,
        }
    }
}

/// The full locked set, in display order.
pub fn default_achievements() -> Vec<Achievement> {
    AchievementKind::iter().map(Achievement::locked).collect()
}

/// Evaluates all milestone predicates against the given stats, unlocking any
/// that are newly met. Returns the kinds unlocked by this call.
///
/// Idempotent: a second call with the same stats unlocks nothing further, and
/// no call ever flips an unlocked achievement back.
pub fn evaluate_achievements(
    stats: &MeditationStats,
    achievements: &mut Vec<Achievement>,
    now: &str,
) -> Vec<AchievementKind> {
    let mut newly_unlocked = Vec::new();

    for kind in AchievementKind::iter() {
        // Older stored lists may predate a kind; backfill it locked.
        if !achievements.iter().any(|a| a.kind == kind) {
            achievements.push(Achievement::locked(kind));
        }

        let entry = achievements
            .iter_mut()
            .find(|a| a.kind == kind)
            .expect("achievement entry just ensured");

        if !entry.unlocked && kind.is_met(stats) {
            entry.unlocked = true;
            entry.unlocked_at = Some(now.to_string());
            newly_unlocked.push(kind);
        }
    }

    newly_unlocked
}
