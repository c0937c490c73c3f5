//! Contents of a lock file: who holds it, since when, and for what.

use crate::error::{PromptlabError, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockMetadata {
    /// `user@HOST` of the process that took the lock.
    pub owner: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub pid: Option<u32>,

    pub created_at: DateTime<Utc>,

    /// Command that took the lock (create, edit, publish, run, ...).
    pub action: String,

    /// Prompt being executed, for run locks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_id: Option<String>,
}

impl LockMetadata {
    pub fn new(action: &str) -> Self {
        Self {
            owner: owner_string(),
            pid: Some(std::process::id()),
            created_at: Utc::now(),
            action: action.to_string(),
            prompt_id: None,
        }
    }

    /// Metadata for a lock held while `prompt_id` is being worked on.
    pub fn for_prompt(action: &str, prompt_id: &str) -> Self {
        Self {
            prompt_id: Some(prompt_id.to_string()),
            ..Self::new(action)
        }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let lock_err = |what: &str, detail: String| {
            PromptlabError::LockError(format!(
                "failed to {} lock file '{}': {}",
                what,
                path.display(),
                detail
            ))
        };

        let raw = std::fs::read(path).map_err(|e| lock_err("read", e.to_string()))?;
        serde_json::from_slice(&raw).map_err(|e| lock_err("parse", e.to_string()))
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| PromptlabError::LockError(format!("cannot encode lock metadata: {}", e)))
    }

    pub fn age(&self) -> Duration {
        Utc::now() - self.created_at
    }

    pub fn age_string(&self) -> String {
        format_age(self.age())
    }

    pub fn is_stale(&self, stale_minutes: u32) -> bool {
        self.age() > Duration::minutes(i64::from(stale_minutes))
    }

    /// One-line description of the holder for contention errors.
    pub fn holder(&self) -> String {
        let pid = self.pid.map(|p| format!(", pid {}", p)).unwrap_or_default();
        format!(
            "'{}' by {}{}, {} ago",
            self.action,
            self.owner,
            pid,
            self.age_string()
        )
    }
}

/// Coarse age for display: `3m`, `2h 5m` or `1d 4h`.
fn format_age(age: Duration) -> String {
    let total = age.num_minutes().max(0);
    let (days, rem) = (total / (24 * 60), total % (24 * 60));
    let (hours, minutes) = (rem / 60, rem % 60);

    match (days, hours) {
        (0, 0) => format!("{}m", minutes),
        (0, h) => format!("{}h {}m", h, minutes),
        (d, h) => format!("{}d {}h", d, h),
    }
}

fn env_user() -> String {
    ["USER", "USERNAME"]
        .iter()
        .find_map(|var| std::env::var(var).ok().filter(|v| !v.is_empty()))
        .unwrap_or_else(|| "unknown".to_string())
}

/// `user@HOST` for lock metadata and event actors.
pub(crate) fn owner_string() -> String {
    let host = hostname::get()
        .ok()
        .map(|h| h.to_string_lossy().into_owned())
        .unwrap_or_else(|| "unknown".to_string());
    format!("{}@{}", env_user(), host)
}
