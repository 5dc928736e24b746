use std::sync::Once;

use chrono::{DateTime, TimeZone, Utc};
use pretty_assertions::assert_eq;
use storyreel_core::{
    update, AppState, Effect, GenerationOutcome, GenerationStep, Msg, NoticeKind, Phase, RunId,
    Story,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(storyreel_logging::initialize_for_tests);
}

fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_735_000_000 + secs, 0).unwrap()
}

fn fox_story() -> Story {
    Story::new("The Fox and Grapes", "moral", "It is easy to despise what you cannot get.")
}

fn start(state: AppState, now: DateTime<Utc>) -> (AppState, RunId) {
    let (state, effects) = update(state, Msg::GenerateClicked { now });
    let run_id = effects
        .iter()
        .find_map(|effect| match effect {
            Effect::RequestGeneration { run_id } => Some(*run_id),
            _ => None,
        })
        .expect("request effect");
    (state, run_id)
}

fn step(state: AppState, run_id: RunId, step: GenerationStep) -> AppState {
    let (state, effects) = update(state, Msg::GenerationProgress { run_id, step });
    assert!(effects.is_empty());
    state
}

fn progress(state: &AppState) -> Option<u8> {
    state.current().map(|record| record.progress)
}

fn run_to_video_rendered(state: AppState, run_id: RunId, story: Story) -> AppState {
    let state = step(state, run_id, GenerationStep::StoryRequested);
    let state = step(state, run_id, GenerationStep::StoryReceived(story));
    let state = step(state, run_id, GenerationStep::AudioRendered);
    step(state, run_id, GenerationStep::VideoRendered)
}

fn publish(state: AppState, run_id: RunId) -> (AppState, Vec<Effect>) {
    update(
        state,
        Msg::GenerationFinished {
            run_id,
            outcome: GenerationOutcome::Published {
                youtube_url: format!("https://www.youtube.com/shorts/storyreel-{run_id}"),
            },
        },
    )
}

#[test]
fn successful_run_reports_every_checkpoint_and_persists_once() {
    init_logging();
    let now = at(0);
    let (state, run_id) = start(AppState::new(), now);
    assert_eq!(run_id, now.timestamp_millis());
    let mut observed = vec![progress(&state).unwrap()];
    assert_eq!(state.current().unwrap().status, Phase::Generating);

    let mut state = state;
    for next in [
        GenerationStep::StoryRequested,
        GenerationStep::StoryReceived(fox_story()),
        GenerationStep::AudioRendered,
        GenerationStep::VideoRendered,
    ] {
        state = step(state, run_id, next);
        observed.push(progress(&state).unwrap());
    }
    let in_flight = state.current().unwrap();
    assert_eq!(in_flight.title.as_deref(), Some("The Fox and Grapes"));
    assert_eq!(in_flight.youtube_url, None);

    let (state, effects) = publish(state, run_id);
    assert!(state.current().is_none());
    assert_eq!(state.videos().len(), 1);
    let record = &state.videos()[0];
    observed.push(record.progress);
    assert_eq!(observed, vec![0, 20, 40, 60, 80, 100]);

    assert_eq!(record.status, Phase::Completed);
    assert_eq!(record.title.as_deref(), Some("The Fox and Grapes"));
    assert_eq!(record.created_at, now);
    assert!(!record.youtube_url.as_deref().unwrap().is_empty());

    assert_eq!(effects.len(), 2);
    assert_eq!(
        effects[0],
        Effect::PersistVideos {
            videos: state.videos().to_vec()
        }
    );
    match &effects[1] {
        Effect::Notify(notice) => {
            assert_eq!(notice.kind, NoticeKind::Info);
            assert_eq!(notice.text, "Video generated: The Fox and Grapes (moral)");
        }
        other => panic!("unexpected effect {other:?}"),
    }
}

#[test]
fn second_trigger_while_in_flight_is_ignored() {
    init_logging();
    let (state, run_id) = start(AppState::new(), at(0));
    let state = step(state, run_id, GenerationStep::StoryRequested);
    let before = state.clone();

    let (state, effects) = update(state, Msg::GenerateClicked { now: at(5) });

    assert!(effects.is_empty());
    assert_eq!(state, before);
    assert_eq!(state.current().unwrap().id, run_id);
    assert!(!state.view(at(5).date_naive()).can_generate);
}

#[test]
fn rejection_is_not_persisted_and_next_trigger_proceeds() {
    init_logging();
    let (state, run_id) = start(AppState::new(), at(0));
    let state = step(state, run_id, GenerationStep::StoryRequested);

    let (state, effects) = update(
        state,
        Msg::GenerationFinished {
            run_id,
            outcome: GenerationOutcome::Failed {
                reason: "rate limited".to_string(),
            },
        },
    );

    assert!(state.videos().is_empty());
    assert!(state.current().is_none());
    assert!(!effects
        .iter()
        .any(|effect| matches!(effect, Effect::PersistVideos { .. })));
    let notice = state.notice().expect("failure notice");
    assert_eq!(notice.kind, NoticeKind::Error);
    assert!(notice.text.contains("rate limited"));
    assert_eq!(effects, vec![Effect::Notify(notice.clone())]);

    let (state, next_run) = start(state, at(10));
    assert_ne!(next_run, run_id);
    assert_eq!(progress(&state), Some(0));
}

#[test]
fn failure_after_story_keeps_record_out_of_storage() {
    init_logging();
    let (state, run_id) = start(AppState::new(), at(0));
    let state = step(state, run_id, GenerationStep::StoryRequested);
    let state = step(state, run_id, GenerationStep::StoryReceived(fox_story()));

    let (state, effects) = update(
        state,
        Msg::GenerationFinished {
            run_id,
            outcome: GenerationOutcome::Failed {
                reason: "connection reset".to_string(),
            },
        },
    );

    assert!(state.videos().is_empty());
    assert_eq!(effects.len(), 1);

    let failed = state.last_failed().expect("failed record");
    assert_eq!(failed.id, run_id);
    assert_eq!(failed.status, Phase::Failed);
    assert_eq!(failed.progress, 40);
    assert_eq!(failed.story, None);
    assert_eq!(failed.title, None);

    let (state, _) = start(state, at(10));
    assert!(state.last_failed().is_none());
}

#[test]
fn out_of_order_steps_are_ignored() {
    init_logging();
    let (state, run_id) = start(AppState::new(), at(0));
    let state = step(state, run_id, GenerationStep::StoryRequested);

    // Skipping straight to audio would jump from 20 to 60.
    let state = step(state, run_id, GenerationStep::AudioRendered);
    assert_eq!(progress(&state), Some(20));

    let state = step(state, run_id, GenerationStep::StoryReceived(fox_story()));
    assert_eq!(progress(&state), Some(40));

    // Replaying an earlier step never regresses.
    let state = step(state, run_id, GenerationStep::StoryRequested);
    assert_eq!(progress(&state), Some(40));
    assert_eq!(state.current().unwrap().status, Phase::StoryReceived);
}

#[test]
fn events_for_other_runs_are_ignored() {
    init_logging();
    let (state, run_id) = start(AppState::new(), at(0));
    let before = state.clone();

    let state = step(state, run_id + 1, GenerationStep::StoryRequested);
    assert_eq!(state, before);

    let (state, effects) = publish(state, run_id + 1);
    assert!(effects.is_empty());
    assert_eq!(state, before);
}

#[test]
fn early_completion_fails_the_run() {
    init_logging();
    let (state, run_id) = start(AppState::new(), at(0));
    let state = step(state, run_id, GenerationStep::StoryRequested);

    let (state, effects) = publish(state, run_id);

    assert!(state.videos().is_empty());
    assert!(state.current().is_none());
    assert!(matches!(
        effects.as_slice(),
        [Effect::Notify(notice)] if notice.kind == NoticeKind::Error
    ));
}

#[test]
fn successive_runs_append_in_start_order() {
    init_logging();
    let mut state = AppState::new();
    let mut ids = Vec::new();
    for i in 0..3 {
        let (next, run_id) = start(state, at(i * 60));
        let next = run_to_video_rendered(next, run_id, fox_story());
        let (next, _effects) = publish(next, run_id);
        ids.push(run_id);
        state = next;
    }

    let stored: Vec<_> = state.videos().iter().map(|record| record.id).collect();
    assert_eq!(stored, ids);
    assert!(state.videos().iter().all(|record| record.is_completed()));
}

#[test]
fn dismissing_notice_clears_it() {
    init_logging();
    let (state, run_id) = start(AppState::new(), at(0));
    let state = run_to_video_rendered(state, run_id, fox_story());
    let (mut state, _effects) = publish(state, run_id);
    assert!(state.notice().is_some());
    assert!(state.consume_dirty());

    let (mut state, effects) = update(state, Msg::NoticeDismissed);
    assert!(effects.is_empty());
    assert!(state.notice().is_none());
    assert!(state.consume_dirty());

    let (mut state, _effects) = update(state, Msg::NoticeDismissed);
    assert!(!state.consume_dirty());
}
