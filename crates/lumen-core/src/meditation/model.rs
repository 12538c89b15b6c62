//! Session events and meditation definitions.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use version_migrate::DeriveQueryable as Queryable;

/// A completed-session event from the meditation player.
///
/// `session_id` and `course_name` are display data; progression math only
/// uses the duration and the completion timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedSession {
    pub session_id: String,
    pub course_name: String,
    pub duration_minutes: u32,
    /// Self-reported energy after the session (1-5)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub energy_rating: Option<u8>,
    /// Timestamp of the completion (ISO 8601 format)
    pub completed_at: String,
}

/// The wire record appended to the remote session log, one per completion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    /// Calendar date of the session (YYYY-MM-DD)
    pub date: String,
    pub course_name: String,
    /// Session length in minutes
    pub duration: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub energy_rating: Option<u8>,
    /// Timestamp the record was created (ISO 8601 format)
    pub created_at: String,
}

impl SessionRecord {
    /// Builds the remote record for a completed session.
    pub fn for_session(session: &CompletedSession, date: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            course_name: session.course_name.clone(),
            duration: session.duration_minutes,
            energy_rating: session.energy_rating,
            created_at: session.completed_at.clone(),
        }
    }
}

/// A custom or generated meditation definition, persisted locally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Queryable)]
#[queryable(entity = "meditation_def")]
pub struct MeditationDef {
    /// Unique identifier (UUID format)
    pub id: String,
    pub title: String,
    pub duration_minutes: u32,
    /// Guidance script played by the session player
    pub script: String,
    /// Timestamp of creation (ISO 8601 format)
    pub created_at: String,
}

impl MeditationDef {
    /// Creates a new definition with a fresh id.
    pub fn new(
        title: impl Into<String>,
        duration_minutes: u32,
        script: impl Into<String>,
        created_at: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            duration_minutes,
            script: script.into(),
            created_at: created_at.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_record_carries_session_fields() {
        let session = CompletedSession {
            session_id: "s1".to_string(),
            course_name: "Morning Calm".to_string(),
            duration_minutes: 15,
            energy_rating: Some(4),
            completed_at: "2026-03-02T07:30:00Z".to_string(),
        };

        let record = SessionRecord::for_session(&session, "2026-03-02");
        assert_eq!(record.date, "2026-03-02");
        assert_eq!(record.course_name, "Morning Calm");
        assert_eq!(record.duration, 15);
        assert_eq!(record.energy_rating, Some(4));
        assert_eq!(record.created_at, "2026-03-02T07:30:00Z");
    }

    #[test]
    fn test_meditation_def_ids_are_unique() {
        let a = MeditationDef::new("Focus", 10, "Breathe in...", "2026-01-01T00:00:00Z");
        let b = MeditationDef::new("Focus", 10, "Breathe in...", "2026-01-01T00:00:00Z");
        assert_ne!(a.id, b.id);
    }
}
