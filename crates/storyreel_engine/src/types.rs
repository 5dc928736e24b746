use storyreel_core::{GenerationStep, RunId};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    GenerationProgress {
        run_id: RunId,
        step: GenerationStep,
    },
    GenerationCompleted {
        run_id: RunId,
        result: Result<GenerationOutput, BackendError>,
    },
    AutomationCompleted {
        result: Result<(), BackendError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationOutput {
    pub youtube_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    #[error("invalid backend url {url}: {message}")]
    InvalidBaseUrl { url: String, message: String },
    /// Network failure, timeout, unreadable body or an HTTP error without a
    /// JSON explanation.
    #[error("request failed: {message}")]
    Transport { message: String },
    /// The backend answered with `success: false`.
    #[error("{}", .message.as_deref().unwrap_or("the backend could not complete the request"))]
    Rejected { message: Option<String> },
}

impl BackendError {
    pub(crate) fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to start async runtime: {0}")]
    Runtime(#[from] std::io::Error),
    #[error(transparent)]
    Backend(#[from] BackendError),
}
