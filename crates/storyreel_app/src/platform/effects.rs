use std::sync::mpsc;
use std::thread;

use storyreel_core::{AutomationOutcome, Effect, GenerationOutcome, Msg, NoticeKind};
use storyreel_engine::{EngineError, EngineEvent, EngineHandle, EngineSettings, LocalStore};
use storyreel_logging::{reel_error, reel_info, reel_warn};

use super::app::AppEvent;

/// Executes effects produced by `update` and feeds engine results back as messages.
pub struct EffectRunner {
    engine: EngineHandle,
    store: LocalStore,
}

impl EffectRunner {
    pub fn new(
        settings: EngineSettings,
        store: LocalStore,
        app_tx: mpsc::Sender<AppEvent>,
    ) -> Result<Self, EngineError> {
        let (event_tx, event_rx) = mpsc::channel();
        let engine = EngineHandle::spawn(settings, event_tx)?;
        spawn_event_loop(event_rx, app_tx);
        Ok(Self { engine, store })
    }

    pub fn check_status(&self) {
        self.engine.check_status();
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::RequestGeneration { run_id } => {
                    reel_info!("RequestGeneration run_id={}", run_id);
                    self.engine.generate(run_id);
                }
                Effect::PersistVideos { videos } => {
                    if let Err(err) = self.store.save(&videos) {
                        reel_error!(
                            "Failed to save {} videos to {:?}: {}",
                            videos.len(),
                            self.store.path(),
                            err
                        );
                    }
                }
                Effect::StartAutomation => {
                    reel_info!("StartAutomation");
                    self.engine.start_automation();
                }
                Effect::Notify(notice) => match notice.kind {
                    NoticeKind::Info => reel_info!("notice: {}", notice.text),
                    NoticeKind::Error => reel_warn!("notice: {}", notice.text),
                },
            }
        }
    }
}

fn spawn_event_loop(event_rx: mpsc::Receiver<EngineEvent>, app_tx: mpsc::Sender<AppEvent>) {
    thread::spawn(move || {
        while let Ok(event) = event_rx.recv() {
            if app_tx.send(AppEvent::Msg(map_event(event))).is_err() {
                break;
            }
        }
    });
}

fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::GenerationProgress { run_id, step } => Msg::GenerationProgress { run_id, step },
        EngineEvent::GenerationCompleted { run_id, result } => Msg::GenerationFinished {
            run_id,
            outcome: match result {
                Ok(output) => GenerationOutcome::Published {
                    youtube_url: output.youtube_url,
                },
                Err(err) => GenerationOutcome::Failed {
                    reason: err.to_string(),
                },
            },
        },
        EngineEvent::AutomationCompleted { result } => Msg::AutomationFinished {
            outcome: match result {
                Ok(()) => AutomationOutcome::Started,
                Err(err) => AutomationOutcome::Failed {
                    reason: err.to_string(),
                },
            },
        },
    }
}
