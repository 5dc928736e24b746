use std::io::{self, BufRead, Write};
use std::sync::mpsc;
use std::thread;

use anyhow::Context;
use chrono::{Local, Utc};
use clap::Parser;
use storyreel_core::{update, AppState, Msg};
use storyreel_engine::LocalStore;
use storyreel_logging::reel_info;

use super::config::{AppConfig, Cli};
use super::effects::EffectRunner;
use super::ui::input::{parse_command, UiCommand, HELP};
use super::ui::render::render;

pub enum AppEvent {
    Command(UiCommand),
    Msg(Msg),
    InputClosed,
}

pub fn run_app() -> anyhow::Result<()> {
    let config = AppConfig::from(Cli::parse());
    storyreel_logging::initialize(&config.logging);
    reel_info!("starting with data dir {:?}", config.data_dir);

    let store = LocalStore::new(&config.data_dir);
    let history = store.load();

    let (app_tx, app_rx) = mpsc::channel::<AppEvent>();
    let runner = EffectRunner::new(config.engine.clone(), store, app_tx.clone())
        .context("failed to start backend engine")?;
    runner.check_status();
    spawn_input_thread(app_tx);

    let mut app = App::new(runner);
    app.dispatch(Msg::VideosLoaded(history));
    app.redraw();

    while let Ok(event) = app_rx.recv() {
        match event {
            AppEvent::Msg(msg) => app.dispatch(msg),
            AppEvent::Command(UiCommand::Quit) | AppEvent::InputClosed => break,
            AppEvent::Command(UiCommand::Help) => app.redraw(),
            AppEvent::Command(UiCommand::Unknown(text)) => {
                println!("Unknown command {text:?}. {HELP}");
            }
            AppEvent::Command(command) => {
                if let Some(msg) = command_to_msg(command) {
                    app.dispatch(msg);
                }
            }
        }
    }

    if app.state.is_generating() {
        reel_info!("quitting with a run in flight; it will not be saved");
    }
    Ok(())
}

struct App {
    state: AppState,
    runner: EffectRunner,
}

impl App {
    fn new(runner: EffectRunner) -> Self {
        Self {
            state: AppState::new(),
            runner,
        }
    }

    fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        let was_dirty = state.consume_dirty();
        self.state = state;
        self.runner.enqueue(effects);
        if was_dirty {
            self.redraw();
        }
    }

    fn redraw(&self) {
        let view = self.state.view(Local::now().date_naive());
        let mut stdout = io::stdout().lock();
        let _ = write!(stdout, "\n{}", render(&view));
        let _ = stdout.flush();
    }
}

fn command_to_msg(command: UiCommand) -> Option<Msg> {
    match command {
        UiCommand::Generate => Some(Msg::GenerateClicked { now: Utc::now() }),
        UiCommand::StartAutomation => Some(Msg::StartAutomationClicked),
        UiCommand::ShowTab(tab) => Some(Msg::TabSelected(tab)),
        UiCommand::DismissNotice => Some(Msg::NoticeDismissed),
        UiCommand::Help | UiCommand::Quit | UiCommand::Unknown(_) => None,
    }
}

fn spawn_input_thread(app_tx: mpsc::Sender<AppEvent>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if app_tx.send(AppEvent::Command(parse_command(&line))).is_err() {
                return;
            }
        }
        let _ = app_tx.send(AppEvent::InputClosed);
    });
}
