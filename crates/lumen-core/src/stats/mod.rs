//! Aggregate meditation statistics.

pub mod model;
pub mod repository;

pub use model::MeditationStats;
pub use repository::StatsRepository;
