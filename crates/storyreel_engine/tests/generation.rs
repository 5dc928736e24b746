use std::sync::{mpsc, Arc, Mutex};
use std::time::Duration;

use serde_json::json;
use storyreel_core::{GenerationStep, Story};
use storyreel_engine::{
    placeholder_youtube_url, run_generation, Backend, BackendError, BackendSettings, EngineEvent,
    EngineHandle, FixedDelayPacer, HttpBackend, ProgressSink, StageDelays,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Default)]
struct TestSink {
    events: Mutex<Vec<EngineEvent>>,
}

impl TestSink {
    fn steps(&self) -> Vec<GenerationStep> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter_map(|event| match event {
                EngineEvent::GenerationProgress { step, .. } => Some(step.clone()),
                _ => None,
            })
            .collect()
    }
}

impl ProgressSink for TestSink {
    fn emit(&self, event: EngineEvent) {
        self.events.lock().unwrap().push(event);
    }
}

/// Backend answering from a fixed script.
struct ScriptedBackend {
    generation: Result<Story, BackendError>,
    automation: Result<(), BackendError>,
}

impl ScriptedBackend {
    fn succeeding() -> Self {
        Self {
            generation: Ok(Story::new("The Fox and Grapes", "moral", "Sour grapes.")),
            automation: Ok(()),
        }
    }

    fn rejecting(message: &str) -> Self {
        let error = BackendError::Rejected {
            message: Some(message.to_string()),
        };
        Self {
            generation: Err(error.clone()),
            automation: Err(error),
        }
    }
}

#[async_trait::async_trait]
impl Backend for ScriptedBackend {
    async fn request_generation(&self) -> Result<Story, BackendError> {
        self.generation.clone()
    }

    async fn request_automation_start(&self) -> Result<(), BackendError> {
        self.automation.clone()
    }

    async fn check_status(&self) -> Result<serde_json::Value, BackendError> {
        Ok(json!({"status": "ok"}))
    }
}

fn no_delays() -> FixedDelayPacer {
    FixedDelayPacer::new(StageDelays::none())
}

#[tokio::test]
async fn successful_run_reports_steps_in_order() {
    let sink = TestSink::default();
    let output = run_generation(42, &ScriptedBackend::succeeding(), &no_delays(), &sink)
        .await
        .expect("run ok");

    assert_eq!(output.youtube_url, placeholder_youtube_url(42));
    assert_eq!(
        sink.steps(),
        vec![
            GenerationStep::StoryRequested,
            GenerationStep::StoryReceived(Story::new(
                "The Fox and Grapes",
                "moral",
                "Sour grapes."
            )),
            GenerationStep::AudioRendered,
            GenerationStep::VideoRendered,
        ]
    );
}

#[tokio::test]
async fn rejected_run_stops_after_story_request() {
    let sink = TestSink::default();
    let err = run_generation(7, &ScriptedBackend::rejecting("rate limited"), &no_delays(), &sink)
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "rate limited");
    assert_eq!(sink.steps(), vec![GenerationStep::StoryRequested]);
}

#[tokio::test]
async fn stage_delays_are_respected() {
    let pacer = FixedDelayPacer::new(StageDelays {
        audio: Duration::from_millis(20),
        video: Duration::from_millis(30),
        publish: Duration::from_millis(20),
    });
    let started = std::time::Instant::now();

    run_generation(1, &ScriptedBackend::succeeding(), &pacer, &TestSink::default())
        .await
        .expect("run ok");

    assert!(started.elapsed() >= Duration::from_millis(70));
}

#[tokio::test]
async fn run_against_http_backend_uses_story_from_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate-video"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "story": {"title_english": "The Fox and Grapes", "category": "moral", "moral": "..."}
        })))
        .expect(1)
        .mount(&server)
        .await;
    let backend = HttpBackend::new(&BackendSettings {
        base_url: server.uri(),
        ..BackendSettings::default()
    })
    .unwrap();
    let sink = TestSink::default();

    run_generation(3, &backend, &no_delays(), &sink)
        .await
        .expect("run ok");

    let titles: Vec<_> = sink
        .steps()
        .into_iter()
        .filter_map(|step| match step {
            GenerationStep::StoryReceived(story) => Some(story.title_english),
            _ => None,
        })
        .collect();
    assert_eq!(titles, vec!["The Fox and Grapes"]);
}

fn collect_until_done(rx: &mpsc::Receiver<EngineEvent>) -> Vec<EngineEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.recv_timeout(Duration::from_secs(5)) {
        let done = !matches!(event, EngineEvent::GenerationProgress { .. });
        events.push(event);
        if done {
            break;
        }
    }
    events
}

#[test]
fn engine_reports_progress_then_completion() {
    let (event_tx, event_rx) = mpsc::channel();
    let engine = EngineHandle::with_backend(
        Arc::new(ScriptedBackend::succeeding()),
        Arc::new(no_delays()),
        event_tx,
    )
    .expect("engine");

    engine.generate(99);
    let events = collect_until_done(&event_rx);

    assert_eq!(events.len(), 5);
    assert!(events[..4]
        .iter()
        .all(|event| matches!(event, EngineEvent::GenerationProgress { run_id: 99, .. })));
    assert_eq!(
        events[4],
        EngineEvent::GenerationCompleted {
            run_id: 99,
            result: Ok(storyreel_engine::GenerationOutput {
                youtube_url: placeholder_youtube_url(99)
            }),
        }
    );
}

#[test]
fn engine_reports_automation_result() {
    let (event_tx, event_rx) = mpsc::channel();
    let engine = EngineHandle::with_backend(
        Arc::new(ScriptedBackend::rejecting("scheduler offline")),
        Arc::new(no_delays()),
        event_tx,
    )
    .expect("engine");

    engine.start_automation();
    let event = event_rx
        .recv_timeout(Duration::from_secs(5))
        .expect("automation event");

    assert_eq!(
        event,
        EngineEvent::AutomationCompleted {
            result: Err(BackendError::Rejected {
                message: Some("scheduler offline".to_string())
            })
        }
    );
}
