//! Orb domain model.
//!
//! This is the "pure" domain model that progression logic operates on,
//! independent of any specific storage format or version.

use serde::{Deserialize, Serialize};
use strum::Display;
use uuid::Uuid;
use version_migrate::DeriveQueryable as Queryable;

/// The fixed color sequence appended to an orb as it grows, one per
/// qualifying day, in chakra order (root through crown).
pub const CHAKRA_COLORS: [&str; 7] = [
    "#FF0000", // root
    "#FF7F00", // sacral
    "#FFFF00", // solar plexus
    "#00FF00", // heart
    "#0000FF", // throat
    "#4B0082", // third eye
    "#8F00FF", // crown
];

/// Maximum number of color layers an orb can hold.
pub const MAX_LAYERS: u8 = 7;

/// Accumulated-minute threshold at which an orb becomes awakened.
pub const AWAKENED_MINUTES: u32 = 21;
/// Accumulated-minute threshold at which an orb becomes legendary.
pub const LEGENDARY_MINUTES: u32 = 49;
/// Accumulated-minute threshold at which an orb becomes eternal.
pub const ETERNAL_MINUTES: u32 = 108;

/// Orb tier, derived from accumulated meditation minutes.
///
/// The tier is a pure function of [`Orb::accumulated_minutes`] and is never
/// stored; within one orb's lifetime it only moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum OrbStatus {
    Seed,
    Awakened,
    Legendary,
    Eternal,
}

impl OrbStatus {
    /// Derives the tier for an accumulated minute count.
    pub fn for_minutes(minutes: u32) -> Self {
        match minutes {
            m if m >= ETERNAL_MINUTES => OrbStatus::Eternal,
            m if m >= LEGENDARY_MINUTES => OrbStatus::Legendary,
            m if m >= AWAKENED_MINUTES => OrbStatus::Awakened,
            _ => OrbStatus::Seed,
        }
    }
}

/// The user's current progression token.
///
/// Exactly one orb is "current" per user at any time; all others live in the
/// orb history archive. A current orb is grown in place (a new copy replaces
/// the stored one on every qualifying completion); an archived orb is never
/// mutated again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Queryable)]
#[queryable(entity = "orb")]
#[serde(rename_all = "camelCase")]
pub struct Orb {
    /// Unique orb identifier (UUID format)
    pub id: String,
    /// Count of accumulated color layers (0-7)
    pub level: u8,
    /// Color layers in insertion order; `layers.len() == level` for a fresh orb
    pub layers: Vec<String>,
    /// Cumulative meditation minutes credited toward this orb's tier
    pub accumulated_minutes: u32,
    /// Legacy alternate completion signal, true once `level` reaches 7
    pub is_awakened: bool,
    /// Timestamp when the orb was instantiated (ISO 8601 format)
    pub created_at: String,
    /// Timestamp set when the orb reaches full completion (ISO 8601 format)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
    /// Populated only on archived (sent/received) orbs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<String>,
    /// Populated only on archived (sent/received) orbs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Orb {
    /// Creates a fresh zero-state orb with a new unique id.
    pub fn new(created_at: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            level: 0,
            layers: Vec::new(),
            accumulated_minutes: 0,
            is_awakened: false,
            created_at: created_at.into(),
            completed_at: None,
            sender: None,
            message: None,
        }
    }

    /// Current tier, derived from accumulated minutes.
    pub fn status(&self) -> OrbStatus {
        OrbStatus::for_minutes(self.accumulated_minutes)
    }

    /// Whether the orb holds all seven layers.
    pub fn is_complete(&self) -> bool {
        self.level >= MAX_LAYERS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_orb_is_zero_state() {
        let orb = Orb::new("2026-01-01T00:00:00Z");
        assert_eq!(orb.level, 0);
        assert!(orb.layers.is_empty());
        assert_eq!(orb.accumulated_minutes, 0);
        assert!(!orb.is_awakened);
        assert_eq!(orb.status(), OrbStatus::Seed);
        assert!(orb.completed_at.is_none());
        assert!(!orb.id.is_empty());
    }

    #[test]
    fn test_fresh_orbs_have_unique_ids() {
        let a = Orb::new("2026-01-01T00:00:00Z");
        let b = Orb::new("2026-01-01T00:00:00Z");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_status_boundaries() {
        // Boundaries of the tier table, checked exactly
        assert_eq!(OrbStatus::for_minutes(0), OrbStatus::Seed);
        assert_eq!(OrbStatus::for_minutes(20), OrbStatus::Seed);
        assert_eq!(OrbStatus::for_minutes(21), OrbStatus::Awakened);
        assert_eq!(OrbStatus::for_minutes(48), OrbStatus::Awakened);
        assert_eq!(OrbStatus::for_minutes(49), OrbStatus::Legendary);
        assert_eq!(OrbStatus::for_minutes(107), OrbStatus::Legendary);
        assert_eq!(OrbStatus::for_minutes(108), OrbStatus::Eternal);
        assert_eq!(OrbStatus::for_minutes(10_000), OrbStatus::Eternal);
    }

    #[test]
    fn test_status_display_is_lowercase() {
        assert_eq!(OrbStatus::Seed.to_string(), "seed");
        assert_eq!(OrbStatus::Eternal.to_string(), "eternal");
    }
}
