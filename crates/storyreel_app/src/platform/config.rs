use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use log::LevelFilter;
use storyreel_engine::{BackendSettings, EngineSettings, DEFAULT_BASE_URL};
use storyreel_logging::{LogDestination, LogSettings};

#[derive(Debug, Parser)]
#[command(name = "storyreel")]
#[command(about = "Dashboard for the automated animated-story YouTube channel")]
#[command(version)]
pub struct Cli {
    /// Base URL of the generation backend
    #[arg(long, env = "STORYREEL_API_URL", default_value = DEFAULT_BASE_URL)]
    pub api_url: String,

    /// Directory holding the stored video list
    #[arg(long, default_value = "data")]
    pub data_dir: PathBuf,

    /// Seconds to wait for a backend response
    #[arg(long, default_value_t = 120)]
    pub request_timeout: u64,

    /// Also log to the terminal
    #[arg(long)]
    pub log_terminal: bool,

    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub engine: EngineSettings,
    pub logging: LogSettings,
}

impl From<Cli> for AppConfig {
    fn from(cli: Cli) -> Self {
        let backend = BackendSettings {
            base_url: cli.api_url,
            request_timeout: Duration::from_secs(cli.request_timeout),
            ..BackendSettings::default()
        };
        let logging = LogSettings {
            destination: if cli.log_terminal {
                LogDestination::Both
            } else {
                LogDestination::File
            },
            level: if cli.verbose {
                LevelFilter::Debug
            } else {
                LevelFilter::Info
            },
            ..LogSettings::default()
        };

        Self {
            data_dir: cli.data_dir,
            engine: EngineSettings {
                backend,
                ..EngineSettings::default()
            },
            logging,
        }
    }
}
