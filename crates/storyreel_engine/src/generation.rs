use std::sync::mpsc;
use std::time::Duration;

use storyreel_core::{GenerationStep, RunId};
use storyreel_logging::{reel_debug, reel_info};

use crate::{Backend, BackendError, EngineEvent, GenerationOutput};

/// Backend stages that report no progress of their own yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Audio,
    Video,
    Publish,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageDelays {
    pub audio: Duration,
    pub video: Duration,
    pub publish: Duration,
}

impl StageDelays {
    pub fn none() -> Self {
        Self {
            audio: Duration::ZERO,
            video: Duration::ZERO,
            publish: Duration::ZERO,
        }
    }

    fn for_stage(&self, stage: Stage) -> Duration {
        match stage {
            Stage::Audio => self.audio,
            Stage::Video => self.video,
            Stage::Publish => self.publish,
        }
    }
}

impl Default for StageDelays {
    fn default() -> Self {
        Self {
            audio: Duration::from_millis(2000),
            video: Duration::from_millis(3000),
            publish: Duration::from_millis(2000),
        }
    }
}

/// Waits until the backend has finished a stage of a run.
#[async_trait::async_trait]
pub trait StagePacer: Send + Sync {
    async fn wait_for(&self, run_id: RunId, stage: Stage) -> Result<(), BackendError>;
}

/// Paces stages with fixed delays until the backend exposes a job-status
/// endpoint to poll.
#[derive(Debug, Clone, Default)]
pub struct FixedDelayPacer {
    delays: StageDelays,
}

impl FixedDelayPacer {
    pub fn new(delays: StageDelays) -> Self {
        Self { delays }
    }
}

#[async_trait::async_trait]
impl StagePacer for FixedDelayPacer {
    async fn wait_for(&self, run_id: RunId, stage: Stage) -> Result<(), BackendError> {
        let delay = self.delays.for_stage(stage);
        reel_debug!("run {} waiting {:?} for {:?}", run_id, delay, stage);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        Ok(())
    }
}

pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub(crate) struct ChannelProgressSink {
    tx: mpsc::Sender<EngineEvent>,
}

impl ChannelProgressSink {
    pub(crate) fn new(tx: mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl ProgressSink for ChannelProgressSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

/// Drives one run through its stages, reporting each one to `sink`.
///
/// Returns at the first failure; later stages are not reported.
pub async fn run_generation(
    run_id: RunId,
    backend: &dyn Backend,
    pacer: &dyn StagePacer,
    sink: &dyn ProgressSink,
) -> Result<GenerationOutput, BackendError> {
    let report = |step: GenerationStep| sink.emit(EngineEvent::GenerationProgress { run_id, step });

    report(GenerationStep::StoryRequested);
    let story = backend.request_generation().await?;
    report(GenerationStep::StoryReceived(story));

    pacer.wait_for(run_id, Stage::Audio).await?;
    report(GenerationStep::AudioRendered);

    pacer.wait_for(run_id, Stage::Video).await?;
    report(GenerationStep::VideoRendered);

    pacer.wait_for(run_id, Stage::Publish).await?;
    let youtube_url = placeholder_youtube_url(run_id);
    reel_info!("run {} published at {}", run_id, youtube_url);
    Ok(GenerationOutput { youtube_url })
}

/// The backend does not return the upload URL yet.
pub fn placeholder_youtube_url(run_id: RunId) -> String {
    format!("https://www.youtube.com/shorts/storyreel-{run_id}")
}
