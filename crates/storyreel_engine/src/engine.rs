use std::sync::{mpsc, Arc};
use std::thread;

use storyreel_core::RunId;
use storyreel_logging::{reel_info, reel_warn};

use crate::generation::ChannelProgressSink;
use crate::{
    run_generation, Backend, BackendSettings, EngineError, EngineEvent, FixedDelayPacer,
    HttpBackend, StageDelays, StagePacer,
};

#[derive(Debug, Clone, Default)]
pub struct EngineSettings {
    pub backend: BackendSettings,
    pub stage_delays: StageDelays,
}

enum EngineCommand {
    Generate { run_id: RunId },
    StartAutomation,
    CheckStatus,
}

/// Handle to the background thread that talks to the backend.
///
/// Commands run concurrently on a tokio runtime; results come back as
/// [`EngineEvent`]s on the channel given at spawn time. Dropping every handle
/// stops the thread.
#[derive(Clone)]
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
}

impl EngineHandle {
    pub fn spawn(
        settings: EngineSettings,
        event_tx: mpsc::Sender<EngineEvent>,
    ) -> Result<Self, EngineError> {
        let backend = Arc::new(HttpBackend::new(&settings.backend)?);
        reel_info!("engine using backend {}", backend.base_url());
        let pacer = Arc::new(FixedDelayPacer::new(settings.stage_delays));
        Self::with_backend(backend, pacer, event_tx)
    }

    pub fn with_backend(
        backend: Arc<dyn Backend>,
        pacer: Arc<dyn StagePacer>,
        event_tx: mpsc::Sender<EngineEvent>,
    ) -> Result<Self, EngineError> {
        let runtime = tokio::runtime::Runtime::new()?;
        let (cmd_tx, cmd_rx) = mpsc::channel();

        thread::spawn(move || {
            while let Ok(command) = cmd_rx.recv() {
                let backend = backend.clone();
                let pacer = pacer.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    handle_command(backend.as_ref(), pacer.as_ref(), command, event_tx).await;
                });
            }
        });

        Ok(Self { cmd_tx })
    }

    pub fn generate(&self, run_id: RunId) {
        let _ = self.cmd_tx.send(EngineCommand::Generate { run_id });
    }

    pub fn start_automation(&self) {
        let _ = self.cmd_tx.send(EngineCommand::StartAutomation);
    }

    /// Probes the backend; the outcome is only logged.
    pub fn check_status(&self) {
        let _ = self.cmd_tx.send(EngineCommand::CheckStatus);
    }
}

async fn handle_command(
    backend: &dyn Backend,
    pacer: &dyn StagePacer,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    match command {
        EngineCommand::Generate { run_id } => {
            let sink = ChannelProgressSink::new(event_tx.clone());
            let result = run_generation(run_id, backend, pacer, &sink).await;
            if let Err(err) = &result {
                reel_warn!("run {} failed: {}", run_id, err);
            }
            let _ = event_tx.send(EngineEvent::GenerationCompleted { run_id, result });
        }
        EngineCommand::StartAutomation => {
            let result = backend.request_automation_start().await;
            match &result {
                Ok(()) => reel_info!("automation started"),
                Err(err) => reel_warn!("automation request failed: {}", err),
            }
            let _ = event_tx.send(EngineEvent::AutomationCompleted { result });
        }
        EngineCommand::CheckStatus => match backend.check_status().await {
            Ok(body) => reel_info!("backend status: {}", body),
            Err(err) => reel_warn!("backend status check failed: {}", err),
        },
    }
}
