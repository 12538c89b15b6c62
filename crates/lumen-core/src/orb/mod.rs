//! Orb progression domain.
//!
//! The orb is the user's progression token: it accumulates one color layer
//! per qualifying meditation day and minutes toward its tier, until it is
//! sent away as a gift and replaced by a fresh one.

pub mod engine;
pub mod model;
pub mod repository;

pub use engine::{CompletionOutcome, complete_meditation, merge_orb, send_orb};
pub use model::{CHAKRA_COLORS, MAX_LAYERS, Orb, OrbStatus};
pub use repository::OrbRepository;
