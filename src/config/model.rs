//! The `config.yaml` schema and its defaults.

use super::types::*;
use serde::{Deserialize, Serialize};

/// Settings read from `.promptlab/config.yaml`.
///
/// Missing keys take their defaults and unrecognized keys are dropped, so an
/// older binary can still open a newer store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // =========================================================================
    // Execution settings
    // =========================================================================
    /// Language-model endpoint used by `promptlab run`.
    #[serde(default)]
    pub execution: ExecutionSettings,

    // =========================================================================
    // Versioning
    // =========================================================================
    /// Whether every content edit also appends a new version.
    ///
    /// When false, edits update the live prompt only and versions are created
    /// by `publish` (or `edit --publish`).
    #[serde(default)]
    pub version_on_save: bool,

    // =========================================================================
    // Locking
    // =========================================================================
    /// Age in minutes past which `lock list` flags a lock as abandoned.
    #[serde(default = "default_lock_stale_minutes")]
    pub lock_stale_minutes: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            execution: ExecutionSettings::default(),
            version_on_save: false,
            lock_stale_minutes: default_lock_stale_minutes(),
        }
    }
}
