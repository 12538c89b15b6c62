//! Meditation sessions and custom meditation definitions.

pub mod model;
pub mod repository;

pub use model::{CompletedSession, MeditationDef, SessionRecord};
pub use repository::MeditationRepository;
