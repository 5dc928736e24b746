//! Storyreel core: pure generation state machine and view-model helpers.
mod effect;
mod msg;
mod record;
mod state;
mod update;
mod view_model;

pub use effect::{Effect, Notice, NoticeKind};
pub use msg::{AutomationOutcome, GenerationOutcome, GenerationStep, Msg};
pub use record::{Phase, RunId, Story, VideoRecord};
pub use state::{AppState, Tab};
pub use update::update;
pub use view_model::{AppViewModel, CurrentRunView, DashboardStats, VideoRowView};
