//! Data Transfer Objects (DTOs) for persistence.
//!
//! These DTOs represent the versioned schema for persisting data.
//! They are private to the infrastructure layer and handle the evolution
//! of the storage format over time.
//!
//! ## Schema Versioning (Semantic Versioning)
//!
//! We follow semantic versioning for schema changes:
//! - **MAJOR (X.0.0)**: Breaking changes (field removal, type changes)
//! - **MINOR (1.X.0)**: Backward-compatible additions (new optional fields)
//! - **PATCH (1.0.X)**: Backward-compatible fixes (not typically used for schema)
//!
//! ### Orb Version History
//! - **1.0.0**: Initial schema (layers + level, no minute accounting)
//! - **1.1.0**: Added `accumulated_minutes` for tier derivation
//!
//! ### Stats Version History
//! - **1.0.0**: Initial schema (totals, streak, last session date)
//! - **1.1.0**: Added `week_progress` weekly tracker

mod achievement;
mod config_root;
mod meditation;
mod orb;
mod stats;

// Re-export achievement DTOs and migrator
pub use achievement::{AchievementKindDTO, AchievementV1_0, create_achievement_migrator};

// Re-export config DTOs and migrator
pub use config_root::{RootConfigV1_0, create_root_config_migrator};

// Re-export meditation DTOs and migrator
pub use meditation::{MeditationDefV1_0, create_meditation_def_migrator};

// Re-export orb DTOs and migrator
pub use orb::{OrbV1_0, OrbV1_1, create_orb_migrator};

// Re-export stats DTOs and migrator
pub use stats::{StatsV1_0, StatsV1_1, create_stats_migrator};
