//! Storyreel engine: backend client, durable storage and generation runs.
mod backend;
mod engine;
mod generation;
mod store;
mod types;

pub use backend::{Backend, BackendSettings, HttpBackend, DEFAULT_BASE_URL};
pub use engine::{EngineHandle, EngineSettings};
pub use generation::{
    placeholder_youtube_url, run_generation, FixedDelayPacer, ProgressSink, Stage, StageDelays,
    StagePacer,
};
pub use store::{LocalStore, StoreError, STORAGE_KEY};
pub use types::{BackendError, EngineError, EngineEvent, GenerationOutput};
