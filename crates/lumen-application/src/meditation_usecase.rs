//! Meditation use case implementation.
//!
//! This module provides the `MeditationUseCase` which orchestrates the
//! progression engine, the local repositories, and the best-effort remote
//! sync. Local storage is the source of truth; every remote write happens
//! strictly after the corresponding local write succeeded.

use std::sync::Arc;

use chrono::{Local, Utc};
use tokio::sync::{Mutex, RwLock};

use lumen_core::achievement::{Achievement, AchievementKind, AchievementRepository, evaluate_achievements};
use lumen_core::diagnostics::{DiagnosticsHandle, SyncDiagnostics};
use lumen_core::error::{LumenError, Result};
use lumen_core::gift::GiftPayload;
use lumen_core::meditation::{CompletedSession, MeditationDef, MeditationRepository, SessionRecord};
use lumen_core::orb::{self, Orb, OrbRepository};
use lumen_core::remote::RemoteSyncService;
use lumen_core::stats::{MeditationStats, StatsRepository};
use lumen_sync::IdentityResolver;

/// Result of a completed session, for the UI to celebrate with.
#[derive(Debug, Clone)]
pub struct CompletionSummary {
    pub orb: Orb,
    pub stats: MeditationStats,
    pub orb_grew: bool,
    pub just_completed: bool,
    pub unlocked: Vec<AchievementKind>,
}

/// In-memory engine state, mirrored to local storage on every mutation.
#[derive(Debug, Clone)]
struct EngineState {
    orb: Orb,
    stats: MeditationStats,
    achievements: Vec<Achievement>,
}

/// Use case for the orb progression and its persistence.
///
/// # Concurrency
///
/// Every mutating operation runs under a single-flight mutex owned here, so
/// two racing triggers serialize instead of interleaving; correctness does
/// not depend on the caller disabling its controls while a call is in
/// flight.
pub struct MeditationUseCase {
    /// Repository for the current orb and history archive
    orb_repository: Arc<dyn OrbRepository>,
    /// Repository for aggregate stats
    stats_repository: Arc<dyn StatsRepository>,
    /// Repository for milestone achievements
    achievement_repository: Arc<dyn AchievementRepository>,
    /// Repository for custom meditation definitions
    meditation_repository: Arc<dyn MeditationRepository>,
    /// Remote mirror (null implementation when not configured)
    remote: Arc<dyn RemoteSyncService>,
    /// Identity used to namespace remote records
    identity: Arc<IdentityResolver>,
    /// Sync-health diagnostics handle
    diagnostics: DiagnosticsHandle,
    /// Display name attached to outgoing gifts
    display_name: Option<String>,
    /// In-memory engine state
    state: RwLock<EngineState>,
    /// Single-flight guard for mutating operations
    op_guard: Mutex<()>,
}

impl MeditationUseCase {
    /// Creates a new `MeditationUseCase`, loading state from local storage.
    ///
    /// A missing current orb (first app use) is replaced by a fresh
    /// zero-state orb.
    pub async fn new(
        orb_repository: Arc<dyn OrbRepository>,
        stats_repository: Arc<dyn StatsRepository>,
        achievement_repository: Arc<dyn AchievementRepository>,
        meditation_repository: Arc<dyn MeditationRepository>,
        remote: Arc<dyn RemoteSyncService>,
        identity: Arc<IdentityResolver>,
        diagnostics: DiagnosticsHandle,
    ) -> Result<Self> {
        let orb = match orb_repository.load_current().await? {
            Some(orb) => orb,
            None => {
                let orb = Orb::new(Utc::now().to_rfc3339());
                if let Err(e) = orb_repository.save_current(orb.clone()).await {
                    tracing::warn!("Failed to persist initial orb: {}", e);
                }
                orb
            }
        };
        let stats = stats_repository.load().await?;
        let achievements = achievement_repository.load().await?;

        Ok(Self {
            orb_repository,
            stats_repository,
            achievement_repository,
            meditation_repository,
            remote,
            identity,
            diagnostics,
            display_name: None,
            state: RwLock::new(EngineState {
                orb,
                stats,
                achievements,
            }),
            op_guard: Mutex::new(()),
        })
    }

    /// Sets the display name attached to outgoing gifts.
    pub fn with_display_name(mut self, display_name: Option<String>) -> Self {
        self.display_name = display_name;
        self
    }

    // ============================================================================
    // Engine operations
    // ============================================================================

    /// Applies a completed meditation session.
    ///
    /// Cannot fail for valid inputs: persistence trouble is logged and the
    /// in-memory state stays authoritative for this process. The remote
    /// session record is pushed after the local writes, fire-and-forget.
    pub async fn complete_meditation(&self, session: CompletedSession) -> Result<CompletionSummary> {
        let _guard = self.op_guard.lock().await;

        let today = Local::now().date_naive();
        let previous = self.state.read().await.clone();

        let outcome = orb::complete_meditation(&previous.orb, &previous.stats, today, &session);

        let mut achievements = previous.achievements.clone();
        let unlocked =
            evaluate_achievements(&outcome.stats, &mut achievements, &session.completed_at);

        {
            let mut state = self.state.write().await;
            state.orb = outcome.orb.clone();
            state.stats = outcome.stats.clone();
            state.achievements = achievements.clone();
        }

        // Local writes, awaited; failures logged, never propagated
        if outcome.orb != previous.orb {
            if let Err(e) = self.orb_repository.save_current(outcome.orb.clone()).await {
                tracing::warn!("Failed to persist orb: {}", e);
            }
        }
        if let Err(e) = self.stats_repository.save(outcome.stats.clone()).await {
            tracing::warn!("Failed to persist stats: {}", e);
        }
        if !unlocked.is_empty() {
            if let Err(e) = self.achievement_repository.save(achievements).await {
                tracing::warn!("Failed to persist achievements: {}", e);
            }
        }

        self.spawn_session_record(SessionRecord::for_session(&session, today.to_string()));

        Ok(CompletionSummary {
            orb: outcome.orb,
            stats: outcome.stats,
            orb_grew: outcome.orb_grew,
            just_completed: outcome.just_completed,
            unlocked,
        })
    }

    /// Sends the current orb to another user and resets to a fresh one.
    ///
    /// The 21-minute sendability gate is the caller's responsibility; this
    /// archives and resets whatever orb is current.
    pub async fn send_orb(&self, recipient: &str, blessing: Option<String>) -> Result<Orb> {
        let _guard = self.op_guard.lock().await;

        let now = Utc::now().to_rfc3339();
        let previous = self.state.read().await.clone();

        let (archived, replacement) = orb::send_orb(&previous.orb, blessing.clone(), &now);

        {
            let mut state = self.state.write().await;
            state.orb = replacement.clone();
        }

        if let Err(e) = self.orb_repository.append_history(archived).await {
            tracing::warn!("Failed to archive sent orb: {}", e);
        }
        if let Err(e) = self.orb_repository.save_current(replacement.clone()).await {
            tracing::warn!("Failed to persist replacement orb: {}", e);
        }

        // Remote gift write, independent of the local archive
        let gift = GiftPayload::new(
            now,
            recipient,
            "", // filled with the resolved identity below
            self.display_name.clone(),
            blessing,
            previous.orb,
        );
        self.spawn_gift(recipient.to_string(), gift);

        Ok(replacement)
    }

    /// Resolves an archived orb for the garden's merge animation.
    pub async fn merge_orb(&self, orb_id: &str) -> Result<Orb> {
        let history = self.orb_repository.load_history().await?;
        orb::merge_orb(&history, orb_id).map(|orb| orb.clone())
    }

    /// Consumes pending gifts for this user into the local history archive.
    ///
    /// Returns the received orbs, newest last. No identity means no gifts.
    pub async fn claim_gifts(&self) -> Result<Vec<Orb>> {
        let _guard = self.op_guard.lock().await;

        let Some(identity) = self.identity.resolve().await else {
            return Ok(Vec::new());
        };

        let gifts = self.remote.take_gifts(identity.raw()).await?;

        let mut received = Vec::new();
        for gift in gifts {
            let orb = gift.into_received_orb();
            if let Err(e) = self.orb_repository.append_history(orb.clone()).await {
                // The gift is already consumed remotely; losing it here is
                // the accepted local-storage failure mode
                tracing::error!("Failed to archive received orb {}: {}", orb.id, e);
            }
            received.push(orb);
        }

        Ok(received)
    }

    // ============================================================================
    // Custom meditations
    // ============================================================================

    /// Creates and stores a custom meditation definition.
    pub async fn create_meditation(
        &self,
        title: &str,
        duration_minutes: u32,
        script: &str,
    ) -> Result<MeditationDef> {
        let def = MeditationDef::new(title, duration_minutes, script, Utc::now().to_rfc3339());
        self.meditation_repository.save(def.clone()).await?;
        Ok(def)
    }

    /// Lists stored custom meditation definitions, newest first.
    pub async fn list_meditations(&self) -> Result<Vec<MeditationDef>> {
        self.meditation_repository.list().await
    }

    /// Removes a custom meditation definition.
    pub async fn delete_meditation(&self, id: &str) -> Result<()> {
        self.meditation_repository.delete(id).await
    }

    // ============================================================================
    // Diagnostics
    // ============================================================================

    /// Writes a diagnostic ping to the remote store.
    ///
    /// This is the loud path: unlike background sync, a disabled store, a
    /// missing identity, or a write failure all surface to the caller.
    pub async fn debug_ping(&self) -> Result<String> {
        let Some(identity) = self.identity.resolve().await else {
            let e = LumenError::auth("No user identity available");
            self.diagnostics.record_auth_error(&e, Utc::now().to_rfc3339());
            return Err(e);
        };

        match self.remote.record_debug_ping(identity.raw()).await {
            Ok(key) => Ok(key),
            Err(e) => {
                if !e.is_remote_disabled() {
                    self.diagnostics.record_write_error(&e, Utc::now().to_rfc3339());
                }
                Err(e)
            }
        }
    }

    /// Current sync-health snapshot for the status indicator.
    pub fn sync_health(&self) -> SyncDiagnostics {
        self.diagnostics.snapshot()
    }

    // ============================================================================
    // Read accessors
    // ============================================================================

    /// The current orb.
    pub async fn current_orb(&self) -> Orb {
        self.state.read().await.orb.clone()
    }

    /// The aggregate stats.
    pub async fn stats(&self) -> MeditationStats {
        self.state.read().await.stats.clone()
    }

    /// The achievement list.
    pub async fn achievements(&self) -> Vec<Achievement> {
        self.state.read().await.achievements.clone()
    }

    /// The archived orb history, newest first.
    pub async fn orb_history(&self) -> Result<Vec<Orb>> {
        self.orb_repository.load_history().await
    }

    // ============================================================================
    // Background remote pushes
    // ============================================================================

    /// Pushes a session record after the local write, fire-and-forget.
    fn spawn_session_record(&self, record: SessionRecord) {
        let remote = Arc::clone(&self.remote);
        let identity = Arc::clone(&self.identity);
        let diagnostics = self.diagnostics.clone();

        tokio::spawn(async move {
            let Some(identity) = identity.resolve().await else {
                tracing::debug!(target: "remote_sync", "No identity, skipping session record");
                return;
            };

            match remote.record_session(identity.raw(), &record).await {
                Ok(key) => {
                    tracing::debug!(target: "remote_sync", "Session record appended as {}", key);
                }
                Err(e) if e.is_remote_disabled() => {
                    tracing::debug!(target: "remote_sync", "Remote disabled, skipping session record");
                }
                Err(e) => {
                    tracing::warn!(target: "remote_sync", "Failed to push session record: {}", e);
                    diagnostics.record_write_error(&e, Utc::now().to_rfc3339());
                }
            }
        });
    }

    /// Delivers a gift to the recipient's namespace, fire-and-forget.
    fn spawn_gift(&self, recipient: String, mut gift: GiftPayload) {
        let remote = Arc::clone(&self.remote);
        let identity = Arc::clone(&self.identity);
        let diagnostics = self.diagnostics.clone();

        tokio::spawn(async move {
            let Some(identity) = identity.resolve().await else {
                tracing::debug!(target: "remote_sync", "No identity, skipping gift delivery");
                return;
            };
            gift.from = identity.raw().to_string();

            match remote.deliver_gift(&recipient, &gift).await {
                Ok(key) => {
                    tracing::debug!(target: "remote_sync", "Gift delivered as {}", key);
                }
                Err(e) if e.is_remote_disabled() => {
                    tracing::debug!(target: "remote_sync", "Remote disabled, skipping gift delivery");
                }
                Err(e) => {
                    tracing::warn!(target: "remote_sync", "Failed to deliver gift: {}", e);
                    diagnostics.record_write_error(&e, Utc::now().to_rfc3339());
                }
            }
        });
    }
}
