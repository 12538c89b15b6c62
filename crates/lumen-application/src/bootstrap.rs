//! Composition root for the production stack.
//!
//! Wires the file-backed repositories, the configured (or disabled) remote
//! service, and the identity resolver into a ready `MeditationUseCase` and
//! its history poller.

use std::sync::Arc;

use lumen_core::config::RootConfig;
use lumen_core::diagnostics::DiagnosticsHandle;
use lumen_core::error::Result;
use lumen_infrastructure::{
    ConfigService, FileAchievementRepository, FileMeditationRepository, FileOrbRepository,
    FileStatsRepository,
};
use lumen_sync::{IdentityResolver, identity_from_config, remote_from_config};

use crate::history_poller::RemoteHistoryPoller;
use crate::meditation_usecase::MeditationUseCase;

/// Everything a frontend needs to drive the app.
pub struct AppContext {
    pub usecase: Arc<MeditationUseCase>,
    pub poller: Arc<RemoteHistoryPoller>,
    pub diagnostics: DiagnosticsHandle,
    pub config: RootConfig,
}

/// Builds the default production stack from on-disk configuration.
///
/// The poller is returned stopped; call [`RemoteHistoryPoller::start`] with
/// `config.sync.interval_secs` once the runtime is up.
pub async fn bootstrap() -> Result<AppContext> {
    let config_service = ConfigService::new()?;
    let config = config_service.get_config();
    let secrets = config_service.load_secrets().unwrap_or_else(|e| {
        tracing::warn!("Failed to read secrets, remote credentials unavailable: {}", e);
        Default::default()
    });

    let diagnostics = DiagnosticsHandle::new();
    let remote = remote_from_config(&config, &secrets);
    let identity: Arc<IdentityResolver> =
        Arc::new(identity_from_config(&config, &secrets, diagnostics.clone()));

    let usecase = MeditationUseCase::new(
        Arc::new(FileOrbRepository::default_location()?),
        Arc::new(FileStatsRepository::default_location()?),
        Arc::new(FileAchievementRepository::default_location()?),
        Arc::new(FileMeditationRepository::default_location().await?),
        Arc::clone(&remote),
        Arc::clone(&identity),
        diagnostics.clone(),
    )
    .await?;
    let usecase = Arc::new(usecase);

    let poller = Arc::new(RemoteHistoryPoller::new(
        Arc::clone(&usecase),
        remote,
        identity,
        config.sync.history_limit,
    ));

    Ok(AppContext {
        usecase,
        poller,
        diagnostics,
        config,
    })
}
