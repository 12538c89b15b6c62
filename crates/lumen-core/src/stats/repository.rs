//! Stats repository trait.

use async_trait::async_trait;

use crate::error::Result;
use crate::stats::model::MeditationStats;

/// Repository for the aggregate meditation statistics.
#[async_trait]
pub trait StatsRepository: Send + Sync {
    /// Loads the stored stats, or the empty default when nothing is stored.
    async fn load(&self) -> Result<MeditationStats>;

    /// Overwrites the stored stats.
    async fn save(&self, stats: MeditationStats) -> Result<()>;
}
