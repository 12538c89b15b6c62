//! AsyncDirStorage-based meditation definition repository.
//!
//! One file per definition under `meditations/`, keyed by definition id:
//!
//! ```text
//! base_dir/
//! └── meditations/
//!     ├── def-id-1.json
//!     └── def-id-2.json
//! ```

use std::path::Path;

use async_trait::async_trait;
use tokio::fs;
use version_migrate::{
    AppPaths, AsyncDirStorage, DirStorageStrategy, FilenameEncoding, FormatStrategy, PathStrategy,
};

use lumen_core::error::{LumenError, Result};
use lumen_core::meditation::{MeditationDef, MeditationRepository};

use crate::paths::LumenPaths;

/// Meditation definition repository over per-definition files.
pub struct FileMeditationRepository {
    storage: AsyncDirStorage,
}

impl FileMeditationRepository {
    /// Creates a repository at the default location (~/.config/lumen).
    pub async fn default_location() -> Result<Self> {
        let base_dir = LumenPaths::config_dir().map_err(|e| LumenError::config(e.to_string()))?;
        Self::new(base_dir).await
    }

    /// Creates a repository rooted at `base_dir`.
    pub async fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();

        fs::create_dir_all(&base_dir)
            .await
            .map_err(|e| LumenError::io(format!("Failed to create base directory: {}", e)))?;

        let paths = AppPaths::new("lumen").data_strategy(PathStrategy::CustomBase(base_dir));
        let migrator = crate::dto::create_meditation_def_migrator();
        let strategy = DirStorageStrategy::default()
            .with_format(FormatStrategy::Json)
            .with_filename_encoding(FilenameEncoding::Direct);

        let storage = AsyncDirStorage::new(paths, "meditations", migrator, strategy)
            .await
            .map_err(|e| {
                LumenError::data_access(format!("Failed to create AsyncDirStorage: {}", e))
            })?;

        Ok(Self { storage })
    }
}

#[async_trait]
impl MeditationRepository for FileMeditationRepository {
    async fn list(&self) -> Result<Vec<MeditationDef>> {
        let all = self
            .storage
            .load_all::<MeditationDef>("meditation_def")
            .await
            .map_err(|e| LumenError::data_access(format!("Failed to load definitions: {}", e)))?;

        let mut defs: Vec<MeditationDef> = all.into_iter().map(|(_id, def)| def).collect();

        // Newest first
        defs.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(defs)
    }

    async fn save(&self, def: MeditationDef) -> Result<()> {
        self.storage
            .save("meditation_def", &def.id, &def)
            .await
            .map_err(|e| LumenError::data_access(format!("Failed to save definition: {}", e)))?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        match self.storage.delete(id).await {
            Ok(()) => Ok(()),
            Err(e) => {
                // Deleting an unknown id is a no-op
                let error_str = e.to_string();
                if error_str.contains("No such file or directory")
                    || error_str.contains("not found")
                    || error_str.contains("cannot find")
                {
                    return Ok(());
                }
                Err(LumenError::data_access(format!(
                    "Failed to delete definition: {}",
                    e
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_list_is_empty_on_first_use() {
        let dir = TempDir::new().unwrap();
        let repo = FileMeditationRepository::new(dir.path()).await.unwrap();
        assert!(repo.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_save_list_delete_roundtrip() {
        let dir = TempDir::new().unwrap();
        let repo = FileMeditationRepository::new(dir.path()).await.unwrap();

        let older = MeditationDef::new("Evening Wind-down", 20, "Settle in...", "2026-01-01T20:00:00Z");
        let newer = MeditationDef::new("Morning Focus", 10, "Sit tall...", "2026-02-01T07:00:00Z");
        repo.save(older.clone()).await.unwrap();
        repo.save(newer.clone()).await.unwrap();

        let defs = repo.list().await.unwrap();
        assert_eq!(defs.len(), 2);
        assert_eq!(defs[0].id, newer.id);
        assert_eq!(defs[1].id, older.id);

        repo.delete(&older.id).await.unwrap();
        let defs = repo.list().await.unwrap();
        assert_eq!(defs.len(), 1);
        assert_eq!(defs[0].id, newer.id);
    }

    #[tokio::test]
    async fn test_delete_unknown_id_is_noop() {
        let dir = TempDir::new().unwrap();
        let repo = FileMeditationRepository::new(dir.path()).await.unwrap();
        repo.delete("does-not-exist").await.unwrap();
    }

    #[tokio::test]
    async fn test_save_overwrites_by_id() {
        let dir = TempDir::new().unwrap();
        let repo = FileMeditationRepository::new(dir.path()).await.unwrap();

        let mut def = MeditationDef::new("Focus", 10, "Breathe...", "2026-01-01T00:00:00Z");
        repo.save(def.clone()).await.unwrap();

        def.duration_minutes = 15;
        repo.save(def.clone()).await.unwrap();

        let defs = repo.list().await.unwrap();
        assert_eq!(defs.len(), 1);
        assert_eq!(defs[0].duration_minutes, 15);
    }
}
