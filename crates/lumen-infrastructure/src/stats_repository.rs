//! FileStorage-based stats repository.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use version_migrate::{FileStorage, FileStorageStrategy, FormatStrategy, LoadBehavior};

use lumen_core::error::{LumenError, Result};
use lumen_core::stats::{MeditationStats, StatsRepository};

use crate::dto::create_stats_migrator;
use crate::paths::LumenPaths;

/// Stats repository over a single versioned JSON file.
pub struct FileStatsRepository {
    storage: Arc<Mutex<FileStorage>>,
}

impl FileStatsRepository {
    /// Creates a repository at the default location (~/.config/lumen).
    pub fn default_location() -> Result<Self> {
        let path = LumenPaths::stats_file().map_err(|e| LumenError::config(e.to_string()))?;
        Self::new(path)
    }

    /// Creates a repository over an explicit file path.
    pub fn new(path: PathBuf) -> Result<Self> {
        let migrator = create_stats_migrator();
        let strategy = FileStorageStrategy::new()
            .with_format(FormatStrategy::Json)
            .with_load_behavior(LoadBehavior::CreateIfMissing);
        let storage = FileStorage::new(path, migrator, strategy)?;

        Ok(Self {
            storage: Arc::new(Mutex::new(storage)),
        })
    }
}

#[async_trait]
impl StatsRepository for FileStatsRepository {
    async fn load(&self) -> Result<MeditationStats> {
        let mut storage = self.storage.lock().await;
        match storage.query::<MeditationStats>("meditation_stats") {
            Ok(stats) => Ok(stats.into_iter().next().unwrap_or_default()),
            Err(e) => {
                tracing::warn!("Unreadable stats, treating as absent: {}", e);
                Ok(MeditationStats::default())
            }
        }
    }

    async fn save(&self, stats: MeditationStats) -> Result<()> {
        let storage = Arc::clone(&self.storage);
        tokio::task::spawn_blocking(move || {
            let mut storage = storage.blocking_lock();
            storage
                .update_and_save("meditation_stats", vec![stats])
                .map_err(LumenError::from)
        })
        .await
        .map_err(|e| LumenError::internal(format!("Failed to join task: {}", e)))??;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_load_defaults_on_first_use() {
        let dir = TempDir::new().unwrap();
        let repo = FileStatsRepository::new(dir.path().join("stats.json")).unwrap();

        let stats = repo.load().await.unwrap();
        assert_eq!(stats, MeditationStats::default());
    }

    #[tokio::test]
    async fn test_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("stats.json");

        let stats = MeditationStats {
            total_sessions: 5,
            total_minutes: 75,
            current_streak: 2,
            last_session_date: Some("2026-03-02".to_string()),
            week_progress: [true, true, false, false, false, false, false],
        };

        {
            let repo = FileStatsRepository::new(path.clone()).unwrap();
            repo.save(stats.clone()).await.unwrap();
        }

        let repo = FileStatsRepository::new(path).unwrap();
        assert_eq!(repo.load().await.unwrap(), stats);
    }
}
