pub mod bootstrap;
pub mod history_poller;
pub mod meditation_usecase;
pub mod sync_status;

pub use bootstrap::{AppContext, bootstrap};
pub use history_poller::RemoteHistoryPoller;
pub use meditation_usecase::{CompletionSummary, MeditationUseCase};
pub use sync_status::{SyncStatusEvent, SyncStatusLayer};
