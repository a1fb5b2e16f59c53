use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::StorageError;

/// Key-value home for the best score across runs.
pub trait HighScoreStore {
    fn load(&self) -> Result<u32, StorageError>;
    fn save(&mut self, score: u32) -> Result<(), StorageError>;
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct HighScoreRecord {
    high_score: u32,
}

/// Stores the high score as a small JSON document on disk.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HighScoreStore for JsonFileStore {
    fn load(&self) -> Result<u32, StorageError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(0),
            Err(e) => {
                return Err(StorageError::Read {
                    path: self.path.clone(),
                    source: e,
                })
            }
        };
        let record: HighScoreRecord =
            serde_json::from_str(&content).map_err(|e| StorageError::Parse {
                path: self.path.clone(),
                source: e,
            })?;
        Ok(record.high_score)
    }

    fn save(&mut self, score: u32) -> Result<(), StorageError> {
        let json = serde_json::to_string_pretty(&HighScoreRecord { high_score: score })?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| StorageError::Write {
                path: self.path.clone(),
                source: e,
            })?;
        }
        std::fs::write(&self.path, json).map_err(|e| StorageError::Write {
            path: self.path.clone(),
            source: e,
        })
    }
}

/// Keeps the high score for the lifetime of the process only.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    high_score: u32,
}

impl MemoryStore {
    pub fn new(high_score: u32) -> Self {
        Self { high_score }
    }
}

impl HighScoreStore for MemoryStore {
    fn load(&self) -> Result<u32, StorageError> {
        Ok(self.high_score)
    }

    fn save(&mut self, score: u32) -> Result<(), StorageError> {
        self.high_score = score;
        Ok(())
    }
}
