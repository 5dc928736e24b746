use crate::{
    AppState, AutomationOutcome, Effect, GenerationOutcome, GenerationStep, Msg, Notice, Phase, RunId,
};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::VideosLoaded(videos) => {
            let loaded = videos.len();
            if !state.restore_videos(videos) {
                return (state, Vec::new());
            }
            // Runs committed before the load would otherwise be lost on the next save.
            if state.videos().len() > loaded {
                vec![Effect::PersistVideos {
                    videos: state.videos().to_vec(),
                }]
            } else {
                Vec::new()
            }
        }
        Msg::TabSelected(tab) => {
            state.select_tab(tab);
            Vec::new()
        }
        Msg::GenerateClicked { now } => match state.begin_run(now) {
            Some(run_id) => vec![Effect::RequestGeneration { run_id }],
            None => Vec::new(),
        },
        Msg::GenerationProgress { run_id, step } => {
            let (phase, story) = match step {
                GenerationStep::StoryRequested => (Phase::RequestingStory, None),
                GenerationStep::StoryReceived(story) => (Phase::StoryReceived, Some(story)),
                GenerationStep::AudioRendered => (Phase::AudioRendered, None),
                GenerationStep::VideoRendered => (Phase::VideoRendered, None),
            };
            state.advance_run(run_id, phase, story);
            Vec::new()
        }
        Msg::GenerationFinished { run_id, outcome } => finish_run(&mut state, run_id, outcome),
        Msg::StartAutomationClicked => vec![Effect::StartAutomation],
        Msg::AutomationFinished { outcome } => {
            let notice = match outcome {
                AutomationOutcome::Started => {
                    Notice::info("Automation started! The backend will publish 4 videos per day.")
                }
                AutomationOutcome::Failed { reason } => {
                    Notice::error(format!("Automation error: {reason}"))
                }
            };
            state.set_notice(Some(notice.clone()));
            vec![Effect::Notify(notice)]
        }
        Msg::NoticeDismissed => {
            state.set_notice(None);
            Vec::new()
        }
    };

    (state, effects)
}

fn finish_run(state: &mut AppState, run_id: RunId, outcome: GenerationOutcome) -> Vec<Effect> {
    let ready = state
        .current()
        .is_some_and(|record| record.id == run_id && record.status == Phase::VideoRendered);
    let outcome = match outcome {
        GenerationOutcome::Published { .. } if !ready => GenerationOutcome::Failed {
            reason: "backend reported completion before all stages finished".to_string(),
        },
        other => other,
    };

    let Some(mut record) = state.take_run(run_id) else {
        return Vec::new();
    };

    match outcome {
        GenerationOutcome::Published { youtube_url } => {
            record.enter(Phase::Completed);
            record.youtube_url = Some(youtube_url);
            let notice = Notice::info(completion_summary(
                record.title.as_deref().unwrap_or("Untitled"),
                record.story.as_ref().map(|s| s.category.as_str()),
            ));
            state.commit(record);
            state.set_notice(Some(notice.clone()));
            vec![
                Effect::PersistVideos {
                    videos: state.videos().to_vec(),
                },
                Effect::Notify(notice),
            ]
        }
        GenerationOutcome::Failed { reason } => {
            record.fail();
            // Kept until the next run starts; it never reaches storage.
            state.discard_failed(record);
            let notice = Notice::error(format!("Error: {reason}"));
            state.set_notice(Some(notice.clone()));
            vec![Effect::Notify(notice)]
        }
    }
}

fn completion_summary(title: &str, category: Option<&str>) -> String {
    match category.filter(|c| !c.is_empty()) {
        Some(category) => format!("Video generated: {title} ({category})"),
        None => format!("Video generated: {title}"),
    }
}
