use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Identifier of a generation run. Equal to the id of the record it drives.
pub type RunId = i64;

/// Phase of a single generation run.
///
/// Phases advance strictly through [`Phase::successor`]; `Failed` can be
/// entered from any non-terminal phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Generating,
    RequestingStory,
    StoryReceived,
    AudioRendered,
    VideoRendered,
    Completed,
    Failed,
}

impl Phase {
    /// Progress checkpoint reported for this phase, in percent.
    ///
    /// A failed run keeps the progress it had reached, so `Failed` has no
    /// checkpoint of its own.
    pub fn progress(self) -> Option<u8> {
        match self {
            Phase::Generating => Some(0),
            Phase::RequestingStory => Some(20),
            Phase::StoryReceived => Some(40),
            Phase::AudioRendered => Some(60),
            Phase::VideoRendered => Some(80),
            Phase::Completed => Some(100),
            Phase::Failed => None,
        }
    }

    pub fn successor(self) -> Option<Phase> {
        match self {
            Phase::Generating => Some(Phase::RequestingStory),
            Phase::RequestingStory => Some(Phase::StoryReceived),
            Phase::StoryReceived => Some(Phase::AudioRendered),
            Phase::AudioRendered => Some(Phase::VideoRendered),
            Phase::VideoRendered => Some(Phase::Completed),
            Phase::Completed | Phase::Failed => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Completed | Phase::Failed)
    }

    /// Human-readable status line shown while the phase is current.
    pub fn label(self) -> &'static str {
        match self {
            Phase::Generating => "generating",
            Phase::RequestingStory => "Generating story...",
            Phase::StoryReceived => "Story ready, generating audio...",
            Phase::AudioRendered => "Audio ready, rendering video...",
            Phase::VideoRendered => "Video rendered, uploading to YouTube...",
            Phase::Completed => "completed",
            Phase::Failed => "failed",
        }
    }
}

/// Story payload returned by the backend.
///
/// Fields the dashboard does not know about are kept in `extra` and written
/// back verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Story {
    pub title_english: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub moral: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Story {
    pub fn new(
        title_english: impl Into<String>,
        category: impl Into<String>,
        moral: impl Into<String>,
    ) -> Self {
        Self {
            title_english: title_english.into(),
            category: category.into(),
            moral: moral.into(),
            extra: Map::new(),
        }
    }
}

/// One tracked generation attempt or result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoRecord {
    pub id: RunId,
    pub status: Phase,
    pub progress: u8,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub story: Option<Story>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub youtube_url: Option<String>,
}

impl VideoRecord {
    /// Fresh record for a run started at `now`; the id is the creation time
    /// in milliseconds.
    pub fn started_at(now: DateTime<Utc>) -> Self {
        Self {
            id: now.timestamp_millis(),
            status: Phase::Generating,
            progress: 0,
            created_at: now,
            story: None,
            title: None,
            youtube_url: None,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == Phase::Completed
    }

    /// Moves the record to `phase`, raising progress to the phase checkpoint.
    pub(crate) fn enter(&mut self, phase: Phase) {
        self.status = phase;
        if let Some(progress) = phase.progress() {
            self.progress = self.progress.max(progress);
        }
    }

    /// Marks the run failed. Progress stays where it stopped and the
    /// success-only fields are cleared.
    pub(crate) fn fail(&mut self) {
        self.enter(Phase::Failed);
        self.story = None;
        self.title = None;
        self.youtube_url = None;
    }
}
