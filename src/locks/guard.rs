//! Scoped ownership of a lock file.

use crate::error::{PromptlabError, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Holds a lock file for as long as it lives.
///
/// Dropping the guard deletes the file; a failed delete there only logs.
/// Call [`LockGuard::release`] to see the error instead.
#[derive(Debug)]
pub struct LockGuard {
    path: Option<PathBuf>,
}

impl LockGuard {
    pub(super) fn new(path: PathBuf) -> Self {
        Self { path: Some(path) }
    }

    pub fn path(&self) -> &Path {
        self.path.as_deref().unwrap_or(Path::new(""))
    }

    pub fn release(mut self) -> Result<()> {
        match self.path.take() {
            Some(path) => remove_lock_file(&path),
            None => Ok(()),
        }
    }
}

fn remove_lock_file(path: &Path) -> Result<()> {
    std::fs::remove_file(path).map_err(|e| {
        PromptlabError::LockError(format!("could not remove lock '{}': {}", path.display(), e))
    })?;
    debug!(path = %path.display(), "lock released");
    Ok(())
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        if let Some(path) = self.path.take()
            && let Err(e) = remove_lock_file(&path)
        {
            warn!(error = %e, "lock left behind");
        }
    }
}
