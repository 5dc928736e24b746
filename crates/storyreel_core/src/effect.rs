use crate::{RunId, VideoRecord};

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Start the backend side of a run.
    RequestGeneration { run_id: RunId },
    /// Rewrite the durable list with `videos`.
    PersistVideos { videos: Vec<VideoRecord> },
    StartAutomation,
    /// Surface a message to the user.
    Notify(Notice),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Error,
}
