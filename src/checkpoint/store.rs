//! The single saved checkpoint, persisted as RON.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while saving or loading the checkpoint.
#[derive(Debug, Error)]
pub enum CheckpointError {
    #[error("Checkpoint I/O failed for '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not encode checkpoint: {0}")]
    Encode(#[from] ron::Error),

    #[error("Corrupt checkpoint file '{path}': {details}")]
    Decode { path: String, details: String },
}

/// On-disk form of the checkpoint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SavedCheckpoint {
    pub position: (f32, f32, f32),
}

/// Reads and writes the last reached checkpoint.
#[derive(Resource, Debug, Clone)]
pub struct CheckpointStore {
    path: PathBuf,
}

impl CheckpointStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> CheckpointError {
        CheckpointError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }

    pub fn save(&self, position: Vec3) -> Result<(), CheckpointError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }
        let saved = SavedCheckpoint {
            position: position.into(),
        };
        let contents = ron::ser::to_string_pretty(&saved, ron::ser::PrettyConfig::default())?;
        fs::write(&self.path, contents).map_err(|e| self.io_error(e))
    }

    /// The saved position, or `None` if nothing was saved yet.
    pub fn load(&self) -> Result<Option<Vec3>, CheckpointError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_error(e)),
        };
        let saved: SavedCheckpoint = ron::from_str(&contents).map_err(|e| CheckpointError::Decode {
            path: self.path.display().to_string(),
            details: e.to_string(),
        })?;
        Ok(Some(Vec3::from(saved.position)))
    }

    /// Forget the saved checkpoint.
    pub fn clear(&self) -> Result<(), CheckpointError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error(e)),
        }
    }
}
