//! Append-only version history for a single prompt.
//!
//! A [`VersionHistory`] owns the immutable [`PromptVersion`] snapshots of one
//! prompt. Version numbers are assigned here, never by the caller, and the
//! only mutation is [`VersionHistory::append`]. Both invariants hold by
//! construction:
//!
//! - version numbers are exactly `1..=n` with no gaps
//! - `created_at` never decreases from one version to the next
//!
//! Histories read back from the store go through
//! [`VersionHistory::from_versions`], which checks the same invariants once at
//! the boundary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[cfg(test)]
mod tests;

/// Errors raised by history lookups and by loading stored histories.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HistoryError {
    /// No version with the requested number exists.
    #[error("version {version} not found")]
    NotFound {
        /// The requested version number.
        version: u32,
    },

    /// Stored records break the numbering or timestamp invariants.
    #[error("corrupt version history: {0}")]
    Corrupt(String),
}

/// An immutable snapshot of a prompt's content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptVersion {
    /// Identity within the prompt, `v{version_number}`.
    pub id: String,

    /// Position in the history, starting at 1.
    pub version_number: u32,

    /// The template text at the time of the snapshot.
    pub content: String,

    /// When the snapshot was taken.
    pub created_at: DateTime<Utc>,

    /// Free-text notes, possibly empty.
    #[serde(default)]
    pub notes: String,
}

/// Format the id for a version number.
pub fn version_id(version_number: u32) -> String {
    format!("v{}", version_number)
}

/// Parse a version reference such as `v3`, `V3` or `3`.
pub fn parse_version_ref(reference: &str) -> Option<u32> {
    let digits = reference
        .strip_prefix('v')
        .or_else(|| reference.strip_prefix('V'))
        .unwrap_or(reference);
    digits.parse().ok().filter(|n| *n > 0)
}

/// Ordered revision log for one prompt.
///
/// Versions are stored oldest first, so the element at index `i` always has
/// version number `i + 1`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionHistory {
    versions: Vec<PromptVersion>,
}

impl VersionHistory {
    /// Create an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a history from stored records in ascending order.
    pub fn from_versions(versions: Vec<PromptVersion>) -> Result<Self, HistoryError> {
        for (index, version) in versions.iter().enumerate() {
            let expected = index as u32 + 1;
            if version.version_number != expected {
                return Err(HistoryError::Corrupt(format!(
                    "expected version {} at position {}, found version {}",
                    expected, index, version.version_number
                )));
            }
            if version.id != version_id(expected) {
                return Err(HistoryError::Corrupt(format!(
                    "version {} has id '{}'",
                    expected, version.id
                )));
            }
            if index > 0 && version.created_at < versions[index - 1].created_at {
                return Err(HistoryError::Corrupt(format!(
                    "version {} was created before version {}",
                    expected,
                    expected - 1
                )));
            }
        }

        Ok(Self { versions })
    }

    /// Append a new snapshot and return a copy of it.
    ///
    /// The version number is one past the current head (1 for an empty
    /// history). A `now` earlier than the head's timestamp is raised to the
    /// head's timestamp.
    pub fn append(
        &mut self,
        content: impl Into<String>,
        notes: impl Into<String>,
        now: DateTime<Utc>,
    ) -> PromptVersion {
        let version_number = self.versions.len() as u32 + 1;
        let created_at = match self.head() {
            Some(head) if now < head.created_at => head.created_at,
            _ => now,
        };

        let version = PromptVersion {
            id: version_id(version_number),
            version_number,
            content: content.into(),
            created_at,
            notes: notes.into(),
        };
        self.versions.push(version.clone());
        version
    }

    /// All versions, newest first.
    pub fn list(&self) -> Vec<PromptVersion> {
        self.versions.iter().rev().cloned().collect()
    }

    /// Look up a version by number.
    pub fn get(&self, version_number: u32) -> Result<&PromptVersion, HistoryError> {
        version_number
            .checked_sub(1)
            .and_then(|index| self.versions.get(index as usize))
            .ok_or(HistoryError::NotFound {
                version: version_number,
            })
    }

    /// Look up a version by id (`v3`).
    pub fn get_by_id(&self, id: &str) -> Option<&PromptVersion> {
        parse_version_ref(id).and_then(|n| self.get(n).ok())
    }

    /// The newest version.
    pub fn head(&self) -> Option<&PromptVersion> {
        self.versions.last()
    }

    pub fn len(&self) -> usize {
        self.versions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }
}
