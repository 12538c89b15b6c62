//! FileStorage-based orb repository.
//!
//! The current orb and the history archive live in two separate versioned
//! JSON files. The current snapshot is overwritten on every mutation; the
//! archive only ever grows at the head.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use version_migrate::{FileStorage, FileStorageStrategy, FormatStrategy, LoadBehavior};

use lumen_core::error::{LumenError, Result};
use lumen_core::orb::{Orb, OrbRepository};

use crate::dto::create_orb_migrator;
use crate::paths::LumenPaths;

/// Orb repository over two versioned files (current + history).
pub struct FileOrbRepository {
    current: Arc<Mutex<FileStorage>>,
    history: Arc<Mutex<FileStorage>>,
}

impl FileOrbRepository {
    /// Creates a repository at the default location (~/.config/lumen).
    pub fn default_location() -> Result<Self> {
        let orb_file = LumenPaths::orb_file().map_err(|e| LumenError::config(e.to_string()))?;
        let history_file =
            LumenPaths::orb_history_file().map_err(|e| LumenError::config(e.to_string()))?;
        Self::new(orb_file, history_file)
    }

    /// Creates a repository over explicit file paths.
    pub fn new(orb_file: PathBuf, history_file: PathBuf) -> Result<Self> {
        Ok(Self {
            current: Arc::new(Mutex::new(open_orb_storage(orb_file)?)),
            history: Arc::new(Mutex::new(open_orb_storage(history_file)?)),
        })
    }
}

fn open_orb_storage(path: PathBuf) -> Result<FileStorage> {
    let migrator = create_orb_migrator();
    let strategy = FileStorageStrategy::new()
        .with_format(FormatStrategy::Json)
        .with_load_behavior(LoadBehavior::CreateIfMissing);
    Ok(FileStorage::new(path, migrator, strategy)?)
}

/// Persists the full record list in a blocking context.
async fn write_orbs(storage: &Arc<Mutex<FileStorage>>, orbs: Vec<Orb>) -> Result<()> {
    let storage = Arc::clone(storage);
    tokio::task::spawn_blocking(move || {
        let mut storage = storage.blocking_lock();
        storage
            .update_and_save("orb", orbs)
            .map_err(LumenError::from)
    })
    .await
    .map_err(|e| LumenError::internal(format!("Failed to join task: {}", e)))??;

    Ok(())
}

#[async_trait]
impl OrbRepository for FileOrbRepository {
    async fn load_current(&self) -> Result<Option<Orb>> {
        let mut storage = self.current.lock().await;
        match storage.query::<Orb>("orb") {
            Ok(orbs) => Ok(orbs.into_iter().next()),
            Err(e) => {
                // Undecodable snapshot: fail closed, treat as absent
                tracing::warn!("Unreadable orb snapshot, treating as absent: {}", e);
                Ok(None)
            }
        }
    }

    async fn save_current(&self, orb: Orb) -> Result<()> {
        write_orbs(&self.current, vec![orb]).await
    }

    async fn load_history(&self) -> Result<Vec<Orb>> {
        let mut storage = self.history.lock().await;
        match storage.query::<Orb>("orb") {
            Ok(orbs) => Ok(orbs),
            Err(e) => {
                tracing::warn!("Unreadable orb history, treating as empty: {}", e);
                Ok(Vec::new())
            }
        }
    }

    async fn append_history(&self, orb: Orb) -> Result<()> {
        // A corrupt archive is surfaced rather than overwritten; only a
        // readable archive may be extended.
        let mut orbs = {
            let mut storage = self.history.lock().await;
            storage.query::<Orb>("orb")?
        };

        orbs.insert(0, orb);
        write_orbs(&self.history, orbs).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn repository(dir: &TempDir) -> FileOrbRepository {
        FileOrbRepository::new(
            dir.path().join("orb.json"),
            dir.path().join("orb_history.json"),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_current_is_absent_on_first_use() {
        let dir = TempDir::new().unwrap();
        let repo = repository(&dir);
        assert!(repo.load_current().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_and_reload_current() {
        let dir = TempDir::new().unwrap();
        let repo = repository(&dir);

        let mut orb = Orb::new("2026-01-01T00:00:00Z");
        orb.accumulated_minutes = 42;
        repo.save_current(orb.clone()).await.unwrap();

        let loaded = repo.load_current().await.unwrap().unwrap();
        assert_eq!(loaded, orb);
    }

    #[tokio::test]
    async fn test_save_current_overwrites() {
        let dir = TempDir::new().unwrap();
        let repo = repository(&dir);

        repo.save_current(Orb::new("2026-01-01T00:00:00Z")).await.unwrap();
        let replacement = Orb::new("2026-02-01T00:00:00Z");
        repo.save_current(replacement.clone()).await.unwrap();

        let loaded = repo.load_current().await.unwrap().unwrap();
        assert_eq!(loaded.id, replacement.id);
    }

    #[tokio::test]
    async fn test_history_appends_at_head() {
        let dir = TempDir::new().unwrap();
        let repo = repository(&dir);

        let first = Orb::new("2026-01-01T00:00:00Z");
        let second = Orb::new("2026-02-01T00:00:00Z");
        repo.append_history(first.clone()).await.unwrap();
        repo.append_history(second.clone()).await.unwrap();

        let history = repo.load_history().await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].id, second.id);
        assert_eq!(history[1].id, first.id);
    }

    #[tokio::test]
    async fn test_history_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let orb = Orb::new("2026-01-01T00:00:00Z");

        {
            let repo = repository(&dir);
            repo.append_history(orb.clone()).await.unwrap();
        }

        let repo = repository(&dir);
        let history = repo.load_history().await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].id, orb.id);
    }
}
