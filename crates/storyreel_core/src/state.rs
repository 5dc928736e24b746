use chrono::{DateTime, Local, NaiveDate, Utc};

use crate::view_model::{AppViewModel, CurrentRunView, DashboardStats, VideoRowView};
use crate::{Notice, Phase, RunId, Story, VideoRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Dashboard,
    Videos,
    About,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    tab: Tab,
    videos: Vec<VideoRecord>,
    current: Option<VideoRecord>,
    last_failed: Option<VideoRecord>,
    notice: Option<Notice>,
    videos_loaded: bool,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the view model. `today` is the local calendar day used for the
    /// "today" counter.
    pub fn view(&self, today: NaiveDate) -> AppViewModel {
        let stats = DashboardStats {
            total: self.videos.len(),
            completed: self.videos.iter().filter(|v| v.is_completed()).count(),
            today: self
                .videos
                .iter()
                .filter(|v| local_day(v.created_at) == today)
                .count(),
        };

        let current = self.current.as_ref().map(|record| CurrentRunView {
            run_id: record.id,
            phase: record.status,
            status: record.status.label().to_string(),
            progress: record.progress,
            title: record.title.clone(),
        });

        let videos = self
            .videos
            .iter()
            .rev()
            .map(|record| VideoRowView {
                id: record.id,
                title: record
                    .title
                    .clone()
                    .unwrap_or_else(|| "Processing...".to_string()),
                category: record.story.as_ref().map(|s| s.category.clone()),
                moral: record.story.as_ref().map(|s| s.moral.clone()),
                created_at: record.created_at.with_timezone(&Local),
                youtube_url: record.youtube_url.clone(),
                completed: record.is_completed(),
            })
            .collect();

        AppViewModel {
            tab: self.tab,
            stats,
            can_generate: self.current.is_none(),
            current,
            videos,
            notice: self.notice.clone(),
            dirty: self.dirty,
        }
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    /// Committed records in append order.
    pub fn videos(&self) -> &[VideoRecord] {
        &self.videos
    }

    /// The in-flight record, if a run is active.
    pub fn current(&self) -> Option<&VideoRecord> {
        self.current.as_ref()
    }

    /// The most recent run that failed, kept until the next run starts.
    /// It is never part of [`AppState::videos`].
    pub fn last_failed(&self) -> Option<&VideoRecord> {
        self.last_failed.as_ref()
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn is_generating(&self) -> bool {
        self.current.is_some()
    }

    /// Returns whether the state changed since the last call and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn restore_videos(&mut self, videos: Vec<VideoRecord>) -> bool {
        if self.videos_loaded {
            return false;
        }
        self.videos_loaded = true;
        // A run finished before the load arrived stays after the loaded history.
        let committed = std::mem::replace(&mut self.videos, videos);
        self.videos.extend(committed);
        self.mark_dirty();
        true
    }

    pub(crate) fn select_tab(&mut self, tab: Tab) {
        if self.tab != tab {
            self.tab = tab;
            self.mark_dirty();
        }
    }

    /// Starts a run unless one is already in flight.
    pub(crate) fn begin_run(&mut self, now: DateTime<Utc>) -> Option<RunId> {
        if self.current.is_some() {
            return None;
        }
        let record = VideoRecord::started_at(now);
        let run_id = record.id;
        self.current = Some(record);
        self.last_failed = None;
        self.mark_dirty();
        Some(run_id)
    }

    /// Advances the in-flight record to `phase` if that is its next phase.
    pub(crate) fn advance_run(&mut self, run_id: RunId, phase: Phase, story: Option<Story>) -> bool {
        let Some(record) = self.current.as_mut().filter(|r| r.id == run_id) else {
            return false;
        };
        if record.status.successor() != Some(phase) || phase.is_terminal() {
            return false;
        }
        if let Some(story) = story {
            record.title = Some(story.title_english.clone());
            record.story = Some(story);
        }
        record.enter(phase);
        self.mark_dirty();
        true
    }

    /// Takes the in-flight record if it belongs to `run_id`.
    pub(crate) fn take_run(&mut self, run_id: RunId) -> Option<VideoRecord> {
        if self.current.as_ref().is_some_and(|r| r.id == run_id) {
            self.mark_dirty();
            self.current.take()
        } else {
            None
        }
    }

    pub(crate) fn commit(&mut self, record: VideoRecord) {
        self.videos.push(record);
        self.mark_dirty();
    }

    pub(crate) fn discard_failed(&mut self, record: VideoRecord) {
        self.last_failed = Some(record);
        self.mark_dirty();
    }

    pub(crate) fn set_notice(&mut self, notice: Option<Notice>) {
        if self.notice != notice {
            self.notice = notice;
            self.mark_dirty();
        }
    }
}

fn local_day(at: DateTime<Utc>) -> NaiveDate {
    at.with_timezone(&Local).date_naive()
}
