//! Achievement repository trait.

use async_trait::async_trait;

use crate::achievement::model::Achievement;
use crate::error::Result;

/// Repository for the persisted achievement list.
#[async_trait]
pub trait AchievementRepository: Send + Sync {
    /// Loads the stored achievements, or the default locked set.
    async fn load(&self) -> Result<Vec<Achievement>>;

    /// Overwrites the stored achievement list.
    async fn save(&self, achievements: Vec<Achievement>) -> Result<()>;
}
