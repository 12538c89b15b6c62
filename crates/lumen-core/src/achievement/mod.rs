//! Milestone achievements.

pub mod model;
pub mod repository;

pub use model::{Achievement, AchievementKind, default_achievements, evaluate_achievements};
pub use repository::AchievementRepository;
