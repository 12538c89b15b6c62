//! Remote history poller.
//!
//! Time-driven (fixed interval) plus event-driven (app returning to the
//! foreground). A boolean in-flight flag drops a poll that arrives while
//! one is running; dropped polls are not queued.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::interval;

use lumen_core::meditation::SessionRecord;
use lumen_core::remote::RemoteSyncService;
use lumen_sync::IdentityResolver;

use crate::meditation_usecase::MeditationUseCase;

/// Polls the remote session log and gift queue.
pub struct RemoteHistoryPoller {
    usecase: Arc<MeditationUseCase>,
    remote: Arc<dyn RemoteSyncService>,
    identity: Arc<IdentityResolver>,
    /// Page size for history fetches
    history_limit: usize,
    /// Re-entrancy guard; a poll arriving while one is in flight is dropped
    in_flight: AtomicBool,
    /// Prevents multiple scheduler instances per poller
    scheduler_running: AtomicBool,
    /// Most recent fetch result, for the UI to read
    latest: RwLock<Vec<SessionRecord>>,
}

impl RemoteHistoryPoller {
    pub fn new(
        usecase: Arc<MeditationUseCase>,
        remote: Arc<dyn RemoteSyncService>,
        identity: Arc<IdentityResolver>,
        history_limit: usize,
    ) -> Self {
        Self {
            usecase,
            remote,
            identity,
            history_limit,
            in_flight: AtomicBool::new(false),
            scheduler_running: AtomicBool::new(false),
            latest: RwLock::new(Vec::new()),
        }
    }

    /// Runs one poll. Returns `false` when dropped because another poll is
    /// already in flight.
    pub async fn poll(&self) -> bool {
        if self.in_flight.swap(true, Ordering::SeqCst) {
            tracing::debug!(target: "remote_sync", "Poll already in flight, dropping");
            return false;
        }

        self.run_poll().await;

        self.in_flight.store(false, Ordering::SeqCst);
        true
    }

    async fn run_poll(&self) {
        let Some(identity) = self.identity.resolve().await else {
            tracing::debug!(target: "remote_sync", "No identity, skipping poll");
            return;
        };

        match self
            .remote
            .fetch_sessions(identity.raw(), self.history_limit)
            .await
        {
            Ok(records) => {
                tracing::debug!(target: "remote_sync", "Fetched {} session records", records.len());
                *self.latest.write().await = records;
            }
            Err(e) => {
                tracing::warn!(target: "remote_sync", "History fetch failed: {}", e);
            }
        }

        match self.usecase.claim_gifts().await {
            Ok(received) if !received.is_empty() => {
                tracing::info!(target: "remote_sync", "Received {} gifted orb(s)", received.len());
            }
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(target: "remote_sync", "Gift claim failed: {}", e);
            }
        }
    }

    /// The most recently fetched session records, newest first.
    pub async fn recent_sessions(&self) -> Vec<SessionRecord> {
        self.latest.read().await.clone()
    }

    /// Starts the interval-driven scheduler.
    pub fn start(self: &Arc<Self>, interval_secs: u64) {
        if self.scheduler_running.swap(true, Ordering::SeqCst) {
            tracing::warn!(target: "remote_sync", "Poll scheduler already running, skipping");
            return;
        }

        let poller = Arc::clone(self);

        tokio::spawn(async move {
            let mut ticker = interval(Duration::from_secs(interval_secs));
            tracing::info!(target: "remote_sync", "Poll scheduler started ({}s interval)", interval_secs);

            loop {
                ticker.tick().await;
                poller.poll().await;
            }
        });
    }

    /// Event-driven trigger for the app returning to the foreground.
    pub async fn on_foreground(&self) {
        self.poll().await;
    }
}
