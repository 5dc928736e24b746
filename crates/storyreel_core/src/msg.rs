use chrono::{DateTime, Utc};

use crate::{RunId, Story, Tab, VideoRecord};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// Restore the durable video list at startup.
    VideosLoaded(Vec<VideoRecord>),
    /// User switched tabs.
    TabSelected(Tab),
    /// User clicked "Generate Video Now". `now` stamps the new record.
    GenerateClicked { now: DateTime<Utc> },
    /// Engine reached the next stage of a run.
    GenerationProgress { run_id: RunId, step: GenerationStep },
    /// Engine finished a run, successfully or not.
    GenerationFinished {
        run_id: RunId,
        outcome: GenerationOutcome,
    },
    /// User clicked "Start Automation".
    StartAutomationClicked,
    /// Backend answered the automation request.
    AutomationFinished { outcome: AutomationOutcome },
    /// User acknowledged the current notice.
    NoticeDismissed,
}

/// Sub-stage reported by the engine while a run is in flight.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationStep {
    /// The story request is about to be sent.
    StoryRequested,
    StoryReceived(Story),
    AudioRendered,
    VideoRendered,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    Published { youtube_url: String },
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AutomationOutcome {
    Started,
    Failed { reason: String },
}
