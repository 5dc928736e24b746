use chrono::{DateTime, Local};

use crate::{Notice, Phase, RunId, Tab};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DashboardStats {
    pub total: usize,
    pub completed: usize,
    /// Records created on the local calendar day passed to `AppState::view`.
    pub today: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentRunView {
    pub run_id: RunId,
    pub phase: Phase,
    pub status: String,
    pub progress: u8,
    pub title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoRowView {
    pub id: RunId,
    pub title: String,
    pub category: Option<String>,
    pub moral: Option<String>,
    pub created_at: DateTime<Local>,
    pub youtube_url: Option<String>,
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppViewModel {
    pub tab: Tab,
    pub stats: DashboardStats,
    /// False while a run is in flight; the generate action is disabled.
    pub can_generate: bool,
    pub current: Option<CurrentRunView>,
    /// Newest first.
    pub videos: Vec<VideoRowView>,
    pub notice: Option<Notice>,
    pub dirty: bool,
}
