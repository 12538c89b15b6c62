//! Orb repository trait.

use async_trait::async_trait;

use crate::error::Result;
use crate::orb::model::Orb;

/// Repository for the current orb and the append-only history archive.
#[async_trait]
pub trait OrbRepository: Send + Sync {
    /// Loads the current orb, or `None` on first use.
    async fn load_current(&self) -> Result<Option<Orb>>;

    /// Overwrites the stored current orb.
    async fn save_current(&self, orb: Orb) -> Result<()>;

    /// Loads the full history archive, newest first.
    async fn load_history(&self) -> Result<Vec<Orb>>;

    /// Prepends an archived orb to the history. Entries are never mutated
    /// or removed once appended.
    async fn append_history(&self, orb: Orb) -> Result<()>;
}
