//! Orb progression engine.
//!
//! Pure state transitions from completion and gifting events to the next orb
//! and stats values. No I/O and no clock access here: callers pass the
//! current calendar date and event timestamps in, which keeps every rule
//! directly testable.

use chrono::{Datelike, NaiveDate};

use crate::error::{LumenError, Result};
use crate::meditation::CompletedSession;
use crate::stats::MeditationStats;

use super::model::{CHAKRA_COLORS, MAX_LAYERS, Orb};

/// Result of applying a completed session to the current orb and stats.
#[derive(Debug, Clone)]
pub struct CompletionOutcome {
    pub orb: Orb,
    pub stats: MeditationStats,
    /// Whether this completion earned the day's layer credit
    pub orb_grew: bool,
    /// Whether this completion brought the orb to all seven layers
    pub just_completed: bool,
}

/// Applies a completed session.
///
/// Orb growth is capped at one layer per calendar day: the day already has
/// its credit when `stats.last_session_date` equals `today`. Stats advance
/// on every call regardless.
pub fn complete_meditation(
    orb: &Orb,
    stats: &MeditationStats,
    today: NaiveDate,
    session: &CompletedSession,
) -> CompletionOutcome {
    let credited_today = last_session_date(stats).is_some_and(|d| d == today);

    let mut next_orb = orb.clone();
    let mut orb_grew = false;
    let mut just_completed = false;

    if !credited_today && next_orb.level < MAX_LAYERS {
        let color = CHAKRA_COLORS[(next_orb.level % MAX_LAYERS) as usize];
        next_orb.layers.push(color.to_string());
        next_orb.level += 1;
        orb_grew = true;

        if next_orb.level == MAX_LAYERS {
            next_orb.is_awakened = true;
            next_orb.completed_at = Some(session.completed_at.clone());
            just_completed = true;
        }
    }

    // Minutes accrue on every completion, credited day or not
    next_orb.accumulated_minutes += session.duration_minutes;

    let next_stats = advance_stats(stats, today, session.duration_minutes);

    CompletionOutcome {
        orb: next_orb,
        stats: next_stats,
        orb_grew,
        just_completed,
    }
}

/// Archives the current orb for sending and produces its replacement.
///
/// The archived snapshot is tagged `sender = "Me"` with the message kept
/// verbatim; the replacement is a brand-new zero-state orb. Sending always
/// resets to zero, there is no partial-credit carryover.
///
/// The 21-minute sendability gate is enforced by the caller, not here: an
/// immature orb handed in is archived as-is.
pub fn send_orb(orb: &Orb, message: Option<String>, now: &str) -> (Orb, Orb) {
    let mut archived = orb.clone();
    archived.sender = Some("Me".to_string());
    archived.message = message;

    (archived, Orb::new(now))
}

/// Resolves an archived orb for the garden's merge animation.
///
/// Display-only: the history archive is immutable, so merging neither
/// removes the entry nor changes any progression numbers.
pub fn merge_orb<'a>(history: &'a [Orb], orb_id: &str) -> Result<&'a Orb> {
    history
        .iter()
        .find(|o| o.id == orb_id)
        .ok_or_else(|| LumenError::not_found("orb", orb_id))
}

fn last_session_date(stats: &MeditationStats) -> Option<NaiveDate> {
    stats.last_session_date.as_deref()?.parse().ok()
}

fn advance_stats(stats: &MeditationStats, today: NaiveDate, duration: u32) -> MeditationStats {
    let last = last_session_date(stats);

    let current_streak = match last {
        Some(d) if d == today => stats.current_streak,
        Some(d) if (today - d).num_days() == 1 => stats.current_streak + 1,
        _ => 1,
    };

    // A completion in a new ISO week starts a fresh weekly tracker
    let mut week_progress = match last {
        Some(d) if d.iso_week() == today.iso_week() => stats.week_progress,
        _ => [false; 7],
    };
    week_progress[today.weekday().num_days_from_monday() as usize] = true;

    MeditationStats {
        total_sessions: stats.total_sessions + 1,
        total_minutes: stats.total_minutes + duration,
        current_streak,
        last_session_date: Some(today.to_string()),
        week_progress,
    }
}
