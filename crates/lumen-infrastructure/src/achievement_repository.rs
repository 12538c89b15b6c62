//! FileStorage-based achievement repository.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use version_migrate::{FileStorage, FileStorageStrategy, FormatStrategy, LoadBehavior};

use lumen_core::achievement::{Achievement, AchievementRepository, default_achievements};
use lumen_core::error::{LumenError, Result};

use crate::dto::create_achievement_migrator;
use crate::paths::LumenPaths;

/// Achievement repository over a single versioned JSON file.
pub struct FileAchievementRepository {
    storage: Arc<Mutex<FileStorage>>,
}

impl FileAchievementRepository {
    /// Creates a repository at the default location (~/.config/lumen).
    pub fn default_location() -> Result<Self> {
        let path =
            LumenPaths::achievements_file().map_err(|e| LumenError::config(e.to_string()))?;
        Self::new(path)
    }

    /// Creates a repository over an explicit file path.
    pub fn new(path: PathBuf) -> Result<Self> {
        let migrator = create_achievement_migrator();
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
impl AchievementRepository for FileAchievementRepository {
    async fn load(&self) -> Result<Vec<Achievement>> {
        let mut storage = self.storage.lock().await;
        match storage.query::<Achievement>("achievement") {
            Ok(achievements) if achievements.is_empty() => Ok(default_achievements()),
            Ok(achievements) => Ok(achievements),
            Err(e) => {
                tracing::warn!("Unreadable achievements, using locked defaults: {}", e);
                Ok(default_achievements())
            }
        }
    }

    async fn save(&self, achievements: Vec<Achievement>) -> Result<()> {
        let storage = Arc::clone(&self.storage);
        tokio::task::spawn_blocking(move || {
            let mut storage = storage.blocking_lock();
            storage
                .update_and_save("achievement", achievements)
                .map_err(LumenError::from)
        })
        .await
        .map_err(|e| LumenError::internal(format!("Failed to join task: {}", e)))??;

        Ok(())
    }
}
