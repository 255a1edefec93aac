//! JSON dumps of collected component data.
//!
//! A snapshot lets a report be regenerated without access to the database.
//! The same format is written by `--dump` and read by `--snapshot`.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use crate::{
    collector::CollectedData,
    constants::SNAPSHOT_VERSION,
    error::{CallflowError, CallflowResult},
};

/// Collected data plus a little provenance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: u32,
    /// Where the data came from, e.g. `asterisk@/var/lib/mysql/mysql.sock`
    #[serde(default)]
    pub source: String,
    /// Free-form timestamp set by the writer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    pub components: CollectedData,
}

impl Snapshot {
    pub fn new(source: impl Into<String>, components: CollectedData) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            source: source.into(),
            created_at: None,
            components,
        }
    }

    pub fn created_at(mut self, timestamp: impl Into<String>) -> Self {
        self.created_at = Some(timestamp.into());
        self
    }

    pub fn to_json(&self) -> CallflowResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse and version-check a snapshot
    pub fn from_json(text: &str) -> CallflowResult<Self> {
        let snapshot: Snapshot =
            serde_json::from_str(text).map_err(|e| CallflowError::InvalidSnapshot {
                message: e.to_string(),
            })?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(CallflowError::InvalidSnapshot {
                message: format!(
                    "unsupported version {} (expected {})",
                    snapshot.version, SNAPSHOT_VERSION
                ),
            });
        }
        Ok(snapshot)
    }

    pub fn load(path: impl AsRef<Path>) -> CallflowResult<Self> {
        let path = path.as_ref();
        debug!("[SNAPSHOT] reading {}", path.display());
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> CallflowResult<()> {
        let path = path.as_ref();
        debug!("[SNAPSHOT] writing {}", path.display());
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}
