//! Resumable state of file jobs, stored as JSON under the checkpoint directory.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::{error, info, warn};

use crate::table::{write_xlsx, Table, TableError};

#[derive(Error, Debug)]
pub enum CheckpointError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error(transparent)]
    Table(#[from] TableError),
}

/// Result of one INN lookup, reused for duplicate INNs in the same file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedLookup {
    pub phones: String,
    pub details: String,
    /// The lookup failed for lack of money; every later row is marked the same way.
    pub balance_error: bool,
}

/// Everything needed to continue a file job after a restart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub id: String,
    pub user_id: i64,
    pub chat_id: i64,
    pub file_name: String,
    pub input_path: PathBuf,
    /// `Телефоны` column for rows `0..processed`.
    pub phones: Vec<String>,
    /// `Всё` column for rows `0..processed`.
    pub details: Vec<String>,
    pub cache: BTreeMap<String, CachedLookup>,
    pub processed: usize,
    pub balance_exhausted: bool,
}

impl Checkpoint {
    /// Fresh job state with nothing processed.
    pub fn new(id: String, user_id: i64, chat_id: i64, file_name: String, input_path: PathBuf) -> Self {
        Self {
            id,
            user_id,
            chat_id,
            file_name,
            input_path,
            phones: Vec::new(),
            details: Vec::new(),
            cache: BTreeMap::new(),
            processed: 0,
            balance_exhausted: false,
        }
    }
}

pub struct CheckpointManager {
    dir: PathBuf,
}

impl CheckpointManager {
    /// Uses `dir`, creating it if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, CheckpointError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// 12 hex chars of SHA-256 over `"{user_id}_{file_name}_{unix_secs}"`.
    pub fn create_id(&self, user_id: i64, file_name: &str) -> String {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();
        let digest = Sha256::digest(format!("{}_{}_{}", user_id, file_name, secs).as_bytes());
        hex::encode(digest)[..12].to_string()
    }

    fn path_for(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{}.json", id))
    }

    /// Writes to a temp file and renames, so a crash never leaves a half-written checkpoint.
    pub fn save(&self, checkpoint: &Checkpoint) -> Result<(), CheckpointError> {
        let path = self.path_for(&checkpoint.id);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec(checkpoint)?)?;
        fs::rename(&tmp, &path)?;
        info!(
            checkpoint_id = %checkpoint.id,
            processed = checkpoint.processed,
            "Checkpoint saved"
        );
        Ok(())
    }

    /// `None` when no checkpoint exists for `id`.
    pub fn load(&self, id: &str) -> Result<Option<Checkpoint>, CheckpointError> {
        let bytes = match fs::read(self.path_for(id)) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let checkpoint = serde_json::from_slice(&bytes)?;
        info!(checkpoint_id = %id, "Checkpoint loaded");
        Ok(Some(checkpoint))
    }

    /// Removing a missing checkpoint is not an error.
    pub fn delete(&self, id: &str) -> Result<(), CheckpointError> {
        match fs::remove_file(self.path_for(id)) {
            Ok(()) => {
                info!(checkpoint_id = %id, "Checkpoint deleted");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// All readable checkpoints; unreadable files are logged and skipped.
    pub fn list_pending(&self) -> Result<Vec<Checkpoint>, CheckpointError> {
        let mut pending = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            match fs::read(&path)
                .map_err(CheckpointError::from)
                .and_then(|b| serde_json::from_slice::<Checkpoint>(&b).map_err(Into::into))
            {
                Ok(checkpoint) => pending.push(checkpoint),
                Err(e) => warn!(path = %path.display(), error = %e, "Skipping unreadable checkpoint"),
            }
        }
        pending.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(pending)
    }

    /// Writes processed rows (with result columns) to `path` as `.xlsx`.
    pub fn save_partial(&self, table: &Table, path: &Path) -> Result<(), CheckpointError> {
        write_xlsx(table, path).map_err(|e| {
            error!(path = %path.display(), error = %e, "Failed to save partial results");
            e
        })?;
        info!(path = %path.display(), rows = table.len(), "Partial results saved");
        Ok(())
    }
}
