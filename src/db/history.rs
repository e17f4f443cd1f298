//! JSON-file persistence for the alert history.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

use crate::signals::dedup::AlertHistory;

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("failed to write history file: {0}")]
    Io(#[from] io::Error),

    #[error("failed to serialize history: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Stores the alert history as a pretty-printed JSON file. Loaded once at
/// run start and saved once at run end; never touched mid-run.
pub struct FileHistoryStore {
    path: PathBuf,
}

impl FileHistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the history, failing open: a missing or corrupt file yields an
    /// empty history. A duplicate alert beats losing the whole run.
    pub fn load(&self) -> AlertHistory {
        match fs::read_to_string(&self.path) {
            Ok(raw) => match serde_json::from_str::<AlertHistory>(&raw) {
                Ok(history) => {
                    info!(
                        path = %self.path.display(),
                        entries = history.len(),
                        "loaded alert history with {} entries",
                        history.len()
                    );
                    history
                }
                Err(e) => {
                    warn!(
                        path = %self.path.display(),
                        error = %e,
                        "alert history is corrupt, starting from an empty history"
                    );
                    AlertHistory::new()
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!(path = %self.path.display(), "no alert history yet, starting empty");
                AlertHistory::new()
            }
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "failed to read alert history, starting from an empty history"
                );
                AlertHistory::new()
            }
        }
    }

    pub fn save(&self, history: &AlertHistory) -> Result<(), HistoryError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(history)?;
        fs::write(&self.path, json)?;
        info!(
            path = %self.path.display(),
            entries = history.len(),
            "persisted alert history"
        );
        Ok(())
    }
}
