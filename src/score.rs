use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{info, warn};
use serde::{Deserialize, Serialize};

pub const APP_DIR_NAME: &str = "grid-snake";
const SCORE_FILE_NAME: &str = "scores.json";

/// Durable storage for the single high-score slot.
pub trait ScoreStore {
    /// Reads the stored value; `Ok(None)` when nothing has been stored yet.
    fn load(&self) -> io::Result<Option<u32>>;

    /// Overwrites the stored value.
    fn save(&mut self, high_score: u32) -> io::Result<()>;
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct ScoreFile {
    high_score: u32,
}

/// Returns the platform-correct score file path.
#[must_use]
pub fn scores_path() -> PathBuf {
    let mut base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    base.push(APP_DIR_NAME);
    base.push(SCORE_FILE_NAME);
    base
}

/// Score slot kept as a small JSON document on disk.
#[derive(Debug, Clone)]
pub struct JsonScoreStore {
    path: PathBuf,
}

impl JsonScoreStore {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Store at [`scores_path`].
    #[must_use]
    pub fn default_location() -> Self {
        Self::new(scores_path())
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ScoreStore for JsonScoreStore {
    fn load(&self) -> io::Result<Option<u32>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e),
        };

        serde_json::from_str::<ScoreFile>(&raw)
            .map(|file| Some(file.high_score))
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    fn save(&mut self, high_score: u32) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(&ScoreFile { high_score })
            .map_err(|error| io::Error::new(io::ErrorKind::InvalidData, error))?;

        fs::write(&self.path, json)
    }
}

/// Process-local store, used with `--no-persist` and in tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryScoreStore {
    value: Option<u32>,
    failing: bool,
}

impl MemoryScoreStore {
    #[must_use]
    pub fn with_value(value: u32) -> Self {
        Self {
            value: Some(value),
            failing: false,
        }
    }

    /// A store whose reads and writes always fail.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            value: None,
            failing: true,
        }
    }

    #[must_use]
    pub fn value(&self) -> Option<u32> {
        self.value
    }

    fn unavailable() -> io::Error {
        io::Error::other("score storage unavailable")
    }
}

impl ScoreStore for MemoryScoreStore {
    fn load(&self) -> io::Result<Option<u32>> {
        if self.failing {
            return Err(Self::unavailable());
        }
        Ok(self.value)
    }

    fn save(&mut self, high_score: u32) -> io::Result<()> {
        if self.failing {
            return Err(Self::unavailable());
        }
        self.value = Some(high_score);
        Ok(())
    }
}

/// Best score seen across sessions, written through to its store.
///
/// Storage failures never reach the caller: a failed read starts from 0 and a
/// failed write is logged and skipped.
#[derive(Debug)]
pub struct HighScore<S> {
    value: u32,
    store: S,
}

impl<S: ScoreStore> HighScore<S> {
    /// Reads the stored value once.
    pub fn load(store: S) -> Self {
        let value = match store.load() {
            Ok(stored) => stored.unwrap_or(0),
            Err(error) => {
                warn!("failed to load high score, starting from 0: {error}");
                0
            }
        };

        Self { value, store }
    }

    #[must_use]
    pub fn value(&self) -> u32 {
        self.value
    }

    /// Raises the high score to `score` when it is higher, persisting immediately.
    ///
    /// Returns true when the value changed.
    pub fn record(&mut self, score: u32) -> bool {
        if score <= self.value {
            return false;
        }

        self.value = score;
        info!("new high score {score}");
        if let Err(error) = self.store.save(score) {
            warn!("failed to save high score {score}: {error}");
        }
        true
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }
}
