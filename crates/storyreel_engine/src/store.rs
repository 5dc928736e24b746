use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use storyreel_core::VideoRecord;
use storyreel_logging::{reel_info, reel_warn};
use tempfile::NamedTempFile;
use thiserror::Error;

/// Storage key of the video list. The file is `<dir>/<key>.json`.
pub const STORAGE_KEY: &str = "automation-videos";

const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage directory unusable: {0}")]
    Dir(String),
    #[error("failed to encode video list: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

#[derive(Serialize)]
struct Envelope<'a> {
    version: u32,
    videos: &'a [VideoRecord],
}

/// Accepted on-disk shapes. Browser builds stored a bare array.
#[derive(Deserialize)]
#[serde(untagged)]
enum Stored {
    Versioned {
        version: u32,
        videos: Vec<VideoRecord>,
    },
    Legacy(Vec<VideoRecord>),
}

/// Durable key-value storage of the video list.
///
/// Every save rewrites the whole list; a failed or unreadable load yields an
/// empty list so startup is never blocked.
#[derive(Debug, Clone)]
pub struct LocalStore {
    dir: PathBuf,
}

impl LocalStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(format!("{STORAGE_KEY}.json"))
    }

    pub fn load(&self) -> Vec<VideoRecord> {
        let path = self.path();
        let content = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Vec::new(),
            Err(err) => {
                reel_warn!("Failed to read stored videos from {:?}: {}", path, err);
                return Vec::new();
            }
        };

        let videos = match serde_json::from_str::<Stored>(&content) {
            Ok(Stored::Versioned { version, videos }) if version == SCHEMA_VERSION => videos,
            Ok(Stored::Versioned { version, .. }) => {
                reel_warn!(
                    "Ignoring stored videos in {:?}: unsupported version {}",
                    path,
                    version
                );
                return Vec::new();
            }
            Ok(Stored::Legacy(videos)) => videos,
            Err(err) => {
                reel_warn!("Failed to parse stored videos from {:?}: {}", path, err);
                return Vec::new();
            }
        };

        reel_info!("Loaded {} stored videos from {:?}", videos.len(), path);
        videos
    }

    /// Where a file written with an unsupported schema `version` is kept.
    pub fn set_aside_path(&self, version: u32) -> PathBuf {
        self.dir.join(format!("{STORAGE_KEY}.v{version}.json"))
    }

    pub fn save(&self, videos: &[VideoRecord]) -> Result<(), StoreError> {
        ensure_dir(&self.dir)?;
        self.set_aside_unsupported()?;
        let content = serde_json::to_string_pretty(&Envelope {
            version: SCHEMA_VERSION,
            videos,
        })?;

        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;
        tmp.persist(self.path()).map_err(|e| StoreError::Io(e.error))?;
        Ok(())
    }

    /// Moves a file of another schema version out of the way so the next
    /// write cannot destroy history this build does not understand.
    fn set_aside_unsupported(&self) -> Result<(), StoreError> {
        let path = self.path();
        let Ok(content) = fs::read_to_string(&path) else {
            return Ok(());
        };
        let Ok(Stored::Versioned { version, .. }) = serde_json::from_str::<Stored>(&content) else {
            return Ok(());
        };
        if version == SCHEMA_VERSION {
            return Ok(());
        }
        let target = self.set_aside_path(version);
        reel_warn!(
            "Moving stored videos with version {} from {:?} to {:?}",
            version,
            path,
            target
        );
        fs::rename(&path, &target)?;
        Ok(())
    }
}

fn ensure_dir(dir: &Path) -> Result<(), StoreError> {
    if dir.exists() {
        if !dir.is_dir() {
            return Err(StoreError::Dir(format!("{dir:?} is not a directory")));
        }
        return Ok(());
    }
    fs::create_dir_all(dir).map_err(|e| StoreError::Dir(e.to_string()))
}
