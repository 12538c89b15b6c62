//! End-to-end flow tests over in-memory fakes.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use lumen_application::{MeditationUseCase, RemoteHistoryPoller};
use lumen_core::achievement::{Achievement, AchievementKind, AchievementRepository, default_achievements};
use lumen_core::diagnostics::DiagnosticsHandle;
use lumen_core::error::{LumenError, Result};
use lumen_core::gift::GiftPayload;
use lumen_core::meditation::{CompletedSession, MeditationDef, MeditationRepository, SessionRecord};
use lumen_core::orb::{Orb, OrbRepository, OrbStatus};
use lumen_core::remote::{DisabledRemoteSyncService, RemoteSyncService};
use lumen_core::stats::{MeditationStats, StatsRepository};
use lumen_sync::IdentityResolver;

// ============================================================================
// In-memory fakes
// ============================================================================

#[derive(Default)]
struct MemoryOrbRepository {
    current: Mutex<Option<Orb>>,
    history: Mutex<Vec<Orb>>,
}

#[async_trait]
impl OrbRepository for MemoryOrbRepository {
    async fn load_current(&self) -> Result<Option<Orb>> {
        Ok(self.current.lock().unwrap().clone())
    }

    async fn save_current(&self, orb: Orb) -> Result<()> {
        *self.current.lock().unwrap() = Some(orb);
        Ok(())
    }

    async fn load_history(&self) -> Result<Vec<Orb>> {
        Ok(self.history.lock().unwrap().clone())
    }

    async fn append_history(&self, orb: Orb) -> Result<()> {
        self.history.lock().unwrap().insert(0, orb);
        Ok(())
    }
}

#[derive(Default)]
struct MemoryStatsRepository {
    stats: Mutex<MeditationStats>,
}

#[async_trait]
impl StatsRepository for MemoryStatsRepository {
    async fn load(&self) -> Result<MeditationStats> {
        Ok(self.stats.lock().unwrap().clone())
    }

    async fn save(&self, stats: MeditationStats) -> Result<()> {
        *self.stats.lock().unwrap() = stats;
        Ok(())
    }
}

struct MemoryAchievementRepository {
    achievements: Mutex<Vec<Achievement>>,
}

impl Default for MemoryAchievementRepository {
    fn default() -> Self {
        Self {
            achievements: Mutex::new(default_achievements()),
        }
    }
}

#[async_trait]
impl AchievementRepository for MemoryAchievementRepository {
    async fn load(&self) -> Result<Vec<Achievement>> {
        Ok(self.achievements.lock().unwrap().clone())
    }

    async fn save(&self, achievements: Vec<Achievement>) -> Result<()> {
        *self.achievements.lock().unwrap() = achievements;
        Ok(())
    }
}

#[derive(Default)]
struct MemoryMeditationRepository {
    defs: Mutex<Vec<MeditationDef>>,
}

#[async_trait]
impl MeditationRepository for MemoryMeditationRepository {
    async fn list(&self) -> Result<Vec<MeditationDef>> {
        Ok(self.defs.lock().unwrap().clone())
    }

    async fn save(&self, def: MeditationDef) -> Result<()> {
        let mut defs = self.defs.lock().unwrap();
        defs.retain(|d| d.id != def.id);
        defs.insert(0, def);
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.defs.lock().unwrap().retain(|d| d.id != id);
        Ok(())
    }
}

/// Recording remote: captures writes, serves canned reads.
#[derive(Default)]
struct RecordingRemote {
    sessions: Mutex<Vec<(String, SessionRecord)>>,
    pings: Mutex<Vec<String>>,
    delivered: Mutex<Vec<(String, GiftPayload)>>,
    pending_gifts: Mutex<Vec<GiftPayload>>,
    fail_writes: AtomicBool,
    fetch_delay: Option<Duration>,
}

impl RecordingRemote {
    fn failing() -> Self {
        let remote = Self::default();
        remote.fail_writes.store(true, Ordering::SeqCst);
        remote
    }

    fn check_writes(&self) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            Err(LumenError::remote(Some(500), "store unavailable"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl RemoteSyncService for RecordingRemote {
    async fn record_session(&self, user: &str, record: &SessionRecord) -> Result<String> {
        self.check_writes()?;
        let mut sessions = self.sessions.lock().unwrap();
        sessions.push((user.to_string(), record.clone()));
        Ok(format!("key-{}", sessions.len()))
    }

    async fn record_debug_ping(&self, user: &str) -> Result<String> {
        self.check_writes()?;
        let mut pings = self.pings.lock().unwrap();
        pings.push(user.to_string());
        Ok(format!("ping-{}", pings.len()))
    }

    async fn deliver_gift(&self, recipient: &str, gift: &GiftPayload) -> Result<String> {
        self.check_writes()?;
        let mut delivered = self.delivered.lock().unwrap();
        delivered.push((recipient.to_string(), gift.clone()));
        Ok(format!("gift-{}", delivered.len()))
    }

    async fn fetch_sessions(&self, user: &str, limit: usize) -> Result<Vec<SessionRecord>> {
        if let Some(delay) = self.fetch_delay {
            tokio::time::sleep(delay).await;
        }
        let mut records: Vec<SessionRecord> = self
            .sessions
            .lock()
            .unwrap()
            .iter()
            .filter(|(u, _)| u == user)
            .map(|(_, r)| r.clone())
            .collect();
        records.reverse();
        records.truncate(limit);
        Ok(records)
    }

    async fn take_gifts(&self, _user: &str) -> Result<Vec<GiftPayload>> {
        Ok(std::mem::take(&mut *self.pending_gifts.lock().unwrap()))
    }
}

// ============================================================================
// Harness
// ============================================================================

struct Harness {
    usecase: Arc<MeditationUseCase>,
    identity: Arc<IdentityResolver>,
    diagnostics: DiagnosticsHandle,
    orb_repo: Arc<MemoryOrbRepository>,
    stats_repo: Arc<MemoryStatsRepository>,
}

async fn harness(remote: Arc<dyn RemoteSyncService>, wallet: Option<&str>) -> Harness {
    let diagnostics = DiagnosticsHandle::new();
    let identity = Arc::new(IdentityResolver::new(
        None,
        wallet.map(str::to_string),
        diagnostics.clone(),
    ));

    let orb_repo = Arc::new(MemoryOrbRepository::default());
    let stats_repo = Arc::new(MemoryStatsRepository::default());

    let usecase = MeditationUseCase::new(
        orb_repo.clone(),
        stats_repo.clone(),
        Arc::new(MemoryAchievementRepository::default()),
        Arc::new(MemoryMeditationRepository::default()),
        remote,
        identity.clone(),
        diagnostics.clone(),
    )
    .await
    .unwrap()
    .with_display_name(Some("Ana".to_string()));

    Harness {
        usecase: Arc::new(usecase),
        identity,
        diagnostics,
        orb_repo,
        stats_repo,
    }
}

fn session(id: &str, minutes: u32) -> CompletedSession {
    CompletedSession {
        session_id: id.to_string(),
        course_name: "Morning Calm".to_string(),
        duration_minutes: minutes,
        energy_rating: Some(4),
        completed_at: "2026-08-06T07:30:00Z".to_string(),
    }
}

/// Lets fire-and-forget remote pushes drain.
async fn settle() {
    tokio::time::sleep(Duration::from_millis(50)).await;
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn test_first_completion_grows_orb_and_syncs() {
    let remote = Arc::new(RecordingRemote::default());
    let h = harness(remote.clone(), Some("0xABC")).await;

    let summary = h.usecase.complete_meditation(session("s1", 10)).await.unwrap();

    assert!(summary.orb_grew);
    assert_eq!(summary.orb.level, 1);
    assert_eq!(summary.orb.layers, vec!["#FF0000".to_string()]);
    assert_eq!(summary.orb.accumulated_minutes, 10);
    assert_eq!(summary.orb.status(), OrbStatus::Seed);
    assert_eq!(summary.stats.total_sessions, 1);
    assert_eq!(summary.unlocked, vec![AchievementKind::FirstSession]);

    // Local writes landed
    let stored = h.orb_repo.load_current().await.unwrap().unwrap();
    assert_eq!(stored, summary.orb);
    assert_eq!(h.stats_repo.load().await.unwrap().total_minutes, 10);

    // Remote record followed, keyed by the wallet identity
    settle().await;
    let sessions = remote.sessions.lock().unwrap();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].0, "0xABC");
    assert_eq!(sessions[0].1.duration, 10);
}

#[tokio::test]
async fn test_same_day_repeat_credits_stats_not_layers() {
    let remote = Arc::new(RecordingRemote::default());
    let h = harness(remote.clone(), Some("0xABC")).await;

    h.usecase.complete_meditation(session("s1", 10)).await.unwrap();
    let second = h.usecase.complete_meditation(session("s2", 15)).await.unwrap();

    assert!(!second.orb_grew);
    assert_eq!(second.orb.level, 1);
    assert_eq!(second.orb.accumulated_minutes, 25);
    assert_eq!(second.orb.status(), OrbStatus::Awakened);
    assert_eq!(second.stats.total_sessions, 2);
    assert_eq!(second.stats.total_minutes, 25);

    // Both completions still produce remote records
    settle().await;
    assert_eq!(remote.sessions.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn test_send_orb_archives_resets_and_delivers() {
    let remote = Arc::new(RecordingRemote::default());
    let h = harness(remote.clone(), Some("0xABC")).await;

    h.usecase.complete_meditation(session("s1", 30)).await.unwrap();
    let sent_id = h.usecase.current_orb().await.id.clone();

    let replacement = h
        .usecase
        .send_orb("0xFRIEND", Some("take care".to_string()))
        .await
        .unwrap();

    assert_eq!(replacement.level, 0);
    assert!(replacement.layers.is_empty());
    assert_eq!(replacement.accumulated_minutes, 0);
    assert_ne!(replacement.id, sent_id);

    // Archived at the head of history, message verbatim
    let history = h.usecase.orb_history().await.unwrap();
    assert_eq!(history[0].id, sent_id);
    assert_eq!(history[0].sender.as_deref(), Some("Me"));
    assert_eq!(history[0].message.as_deref(), Some("take care"));

    // Gift delivered to the recipient's namespace
    settle().await;
    let delivered = remote.delivered.lock().unwrap();
    assert_eq!(delivered.len(), 1);
    assert_eq!(delivered[0].0, "0xFRIEND");
    let gift = &delivered[0].1;
    assert_eq!(gift.v, 1);
    assert_eq!(gift.from, "0xABC");
    assert_eq!(gift.from_display_name.as_deref(), Some("Ana"));
    assert_eq!(gift.blessing.as_deref(), Some("take care"));
    assert_eq!(gift.orb.id, sent_id);
    assert_eq!(gift.orb.accumulated_minutes, 30);
}

#[tokio::test]
async fn test_send_without_identity_still_archives_locally() {
    let remote = Arc::new(RecordingRemote::default());
    let h = harness(remote.clone(), None).await;

    h.usecase.complete_meditation(session("s1", 30)).await.unwrap();
    h.usecase.send_orb("0xFRIEND", None).await.unwrap();

    let history = h.usecase.orb_history().await.unwrap();
    assert_eq!(history.len(), 1);

    // No identity, so the gift write is silently skipped
    settle().await;
    assert!(remote.delivered.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_background_write_failure_is_swallowed_and_recorded() {
    let remote = Arc::new(RecordingRemote::failing());
    let h = harness(remote.clone(), Some("0xABC")).await;

    // The completion itself cannot fail on remote trouble
    let summary = h.usecase.complete_meditation(session("s1", 10)).await.unwrap();
    assert_eq!(summary.orb.level, 1);

    settle().await;
    let snapshot = h.diagnostics.snapshot();
    let write = snapshot.last_write_error.unwrap();
    assert_eq!(write.code, "remote/500");
}

#[tokio::test]
async fn test_debug_ping_is_loud_when_disabled() {
    let h = harness(Arc::new(DisabledRemoteSyncService), Some("0xABC")).await;

    let err = h.usecase.debug_ping().await.unwrap_err();
    assert!(err.is_remote_disabled());
}

#[tokio::test]
async fn test_debug_ping_without_identity_raises_auth() {
    let remote = Arc::new(RecordingRemote::default());
    let h = harness(remote, None).await;

    let err = h.usecase.debug_ping().await.unwrap_err();
    assert!(err.is_auth());
    assert!(h.diagnostics.snapshot().last_auth_error.is_some());
}

#[tokio::test]
async fn test_debug_ping_happy_path() {
    let remote = Arc::new(RecordingRemote::default());
    let h = harness(remote.clone(), Some("0xABC")).await;

    let key = h.usecase.debug_ping().await.unwrap();
    assert_eq!(key, "ping-1");
    assert_eq!(remote.pings.lock().unwrap()[0], "0xABC");
}

#[tokio::test]
async fn test_claim_gifts_consumes_into_history() {
    let remote = Arc::new(RecordingRemote::default());
    remote.pending_gifts.lock().unwrap().push(GiftPayload::new(
        "2026-08-01T12:00:00Z",
        "0xABC",
        "0xSENDER",
        Some("Kai".to_string()),
        Some("for you".to_string()),
        Orb::new("2026-07-01T00:00:00Z"),
    ));

    let h = harness(remote.clone(), Some("0xABC")).await;

    let received = h.usecase.claim_gifts().await.unwrap();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].sender.as_deref(), Some("Kai"));
    assert_eq!(received[0].message.as_deref(), Some("for you"));

    let history = h.usecase.orb_history().await.unwrap();
    assert_eq!(history[0].id, received[0].id);

    // Gifts are read-once
    assert!(h.usecase.claim_gifts().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_merge_orb_resolves_archived() {
    let remote = Arc::new(RecordingRemote::default());
    let h = harness(remote, Some("0xABC")).await;

    h.usecase.complete_meditation(session("s1", 30)).await.unwrap();
    let sent_id = h.usecase.current_orb().await.id.clone();
    h.usecase.send_orb("0xFRIEND", None).await.unwrap();

    let merged = h.usecase.merge_orb(&sent_id).await.unwrap();
    assert_eq!(merged.id, sent_id);

    // History stays intact; merge is display-only
    assert_eq!(h.usecase.orb_history().await.unwrap().len(), 1);

    let err = h.usecase.merge_orb("unknown").await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_custom_meditations_roundtrip() {
    let remote = Arc::new(RecordingRemote::default());
    let h = harness(remote, Some("0xABC")).await;

    let def = h
        .usecase
        .create_meditation("Deep Rest", 25, "Lie down and...")
        .await
        .unwrap();

    let defs = h.usecase.list_meditations().await.unwrap();
    assert_eq!(defs.len(), 1);
    assert_eq!(defs[0].title, "Deep Rest");

    h.usecase.delete_meditation(&def.id).await.unwrap();
    assert!(h.usecase.list_meditations().await.unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_poller_drops_overlapping_polls() {
    let remote = Arc::new(RecordingRemote {
        fetch_delay: Some(Duration::from_millis(150)),
        ..Default::default()
    });
    let h = harness(remote.clone(), Some("0xABC")).await;
    h.usecase.complete_meditation(session("s1", 10)).await.unwrap();
    settle().await;

    let poller = Arc::new(RemoteHistoryPoller::new(
        h.usecase.clone(),
        remote,
        h.identity.clone(),
        20,
    ));

    let first = {
        let poller = Arc::clone(&poller);
        tokio::spawn(async move { poller.poll().await })
    };

    // Arrives while the first poll is still fetching: dropped, not queued
    tokio::time::sleep(Duration::from_millis(30)).await;
    assert!(!poller.poll().await);

    assert!(first.await.unwrap());
    assert_eq!(poller.recent_sessions().await.len(), 1);

    // The flag cleared; the next poll runs
    assert!(poller.poll().await);
}
