//! Meditation definition repository trait.

use async_trait::async_trait;

use crate::error::Result;
use crate::meditation::model::MeditationDef;

/// Repository for custom/generated meditation definitions.
#[async_trait]
pub trait MeditationRepository: Send + Sync {
    /// Lists all stored definitions, newest first.
    async fn list(&self) -> Result<Vec<MeditationDef>>;

    /// Stores a definition (insert or overwrite by id).
    async fn save(&self, def: MeditationDef) -> Result<()>;

    /// Removes a definition by id. Removing an unknown id is a no-op.
    async fn delete(&self, id: &str) -> Result<()>;
}
