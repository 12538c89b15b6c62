//! Meditation statistics domain model.

use serde::{Deserialize, Serialize};
use version_migrate::DeriveQueryable as Queryable;

/// Aggregate counters across all meditation sessions.
///
/// Unlike the orb, stats advance on every completion, including repeat
/// completions on the same calendar day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Queryable)]
#[queryable(entity = "meditation_stats")]
pub struct MeditationStats {
    /// Total number of completed sessions
    pub total_sessions: u32,
    /// Total meditated minutes
    pub total_minutes: u32,
    /// Consecutive calendar days with at least one completion
    pub current_streak: u32,
    /// Calendar date of the most recent completion (YYYY-MM-DD)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_session_date: Option<String>,
    /// Which days of the current week saw a completion, Monday = index 0.
    /// Cleared when a completion lands in a new ISO week.
    #[serde(default)]
    pub week_progress: [bool; 7],
}

impl MeditationStats {
    /// Creates empty stats for a first launch.
    pub fn new() -> Self {
        Self::default()
    }
}
