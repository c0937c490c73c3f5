//! Lock type definitions.

use super::metadata::LockMetadata;
use std::path::PathBuf;

/// Suffix of a run lock's file stem (`PROMPT-001.run`).
pub(super) const RUN_SUFFIX: &str = ".run";

/// Kind of lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockType {
    /// Serializes store mutations.
    Store,
    /// Serializes runs of a single prompt.
    Run,
}

impl LockType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LockType::Store => "store",
            LockType::Run => "run",
        }
    }

    /// Classify a lock file stem.
    pub(super) fn from_stem(stem: &str) -> Option<(Self, String)> {
        if stem == "store" {
            Some((LockType::Store, stem.to_string()))
        } else {
            stem.strip_suffix(RUN_SUFFIX)
                .filter(|id| !id.is_empty())
                .map(|id| (LockType::Run, id.to_string()))
        }
    }
}

/// An active lock as reported by `lock list`.
#[derive(Debug, Clone)]
pub struct LockInfo {
    pub path: PathBuf,

    /// `store`, or the prompt id a run lock belongs to.
    pub name: String,

    pub lock_type: LockType,

    pub metadata: LockMetadata,

    pub is_stale: bool,
}

impl std::fmt::Display for LockInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{}]: {}", self.name, self.lock_type.as_str(), self.metadata.holder())?;
        if self.is_stale {
            f.write_str(" STALE")?;
        }
        Ok(())
    }
}
