use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use alert_core::SeenSet;
use alert_logging::{alert_info, alert_warn};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("state directory missing or not writable: {0}")]
    StateDir(String),
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// On-disk shape. Identifiers written by older versions may be integers,
/// so loading accepts any scalar and stringifies it.
#[derive(Debug, Serialize)]
struct PersistedState {
    seen_job_ids: Vec<String>,
    last_updated: String,
}

#[derive(Debug, Deserialize)]
struct LoadedState {
    #[serde(default)]
    seen_job_ids: Vec<Value>,
    #[serde(default)]
    #[allow(dead_code)]
    last_updated: Option<String>,
}

/// Owns the seen-identifier state file.
///
/// Loading never fails: a missing file is a fresh start and a corrupt file is
/// logged and treated as empty. Saving overwrites the whole file atomically.
#[derive(Debug, Clone)]
pub struct SeenStore {
    path: PathBuf,
}

impl SeenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> SeenSet {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return SeenSet::new();
            }
            Err(err) => {
                alert_warn!("Failed to read state file {:?}: {}", self.path, err);
                return SeenSet::new();
            }
        };

        let state: LoadedState = match serde_json::from_str(&content) {
            Ok(state) => state,
            Err(err) => {
                alert_warn!("Failed to parse state file {:?}: {}", self.path, err);
                return SeenSet::new();
            }
        };

        let seen = SeenSet::from_ids(state.seen_job_ids.into_iter().filter_map(id_to_string));
        alert_info!("Loaded {} seen job ids from {:?}", seen.len(), self.path);
        seen
    }

    pub fn save(&self, seen: &SeenSet) -> Result<(), PersistError> {
        let state = PersistedState {
            seen_job_ids: seen.sorted_ids(),
            last_updated: Utc::now().to_rfc3339(),
        };
        let content = serde_json::to_string_pretty(&state)?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        ensure_state_dir(&dir)?;

        let mut tmp = NamedTempFile::new_in(&dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;

        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        tmp.persist(&self.path).map_err(|e| PersistError::Io(e.error))?;
        Ok(())
    }
}

fn ensure_state_dir(dir: &Path) -> Result<(), PersistError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| PersistError::StateDir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(PersistError::StateDir("path is not a directory".into()));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| PersistError::StateDir(e.to_string()))?;
    }
    Ok(())
}

fn id_to_string(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
