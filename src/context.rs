//! Store context resolution for promptlab.
//!
//! Every command locates its state through [`StoreContext`]. The store root is
//! the `.promptlab/` directory: `PROMPTLAB_HOME` names it directly when set,
//! otherwise it is found by walking up from the working directory.

use crate::error::{PromptlabError, Result};
use std::env;
use std::path::{Path, PathBuf};

/// Name of the store directory created by `promptlab init`.
pub const STORE_DIR_NAME: &str = ".promptlab";

/// Environment variable that overrides store discovery.
pub const HOME_ENV_VAR: &str = "PROMPTLAB_HOME";

/// Resolved paths for a promptlab store. All paths are absolute.
#[derive(Debug, Clone)]
pub struct StoreContext {
    /// The `.promptlab/` directory.
    pub store_root: PathBuf,

    /// Prompt files (`PROMPT-NNN-slug.md`).
    pub prompts_dir: PathBuf,

    /// Version histories (`PROMPT-NNN.ndjson`).
    pub versions_dir: PathBuf,

    /// Saved comparison selections (`PROMPT-NNN.json`).
    pub selections_dir: PathBuf,

    /// Lock files.
    pub locks_dir: PathBuf,
}

impl StoreContext {
    /// Build a context for an explicit store root.
    pub fn at<P: AsRef<Path>>(store_root: P) -> Self {
        let store_root = store_root.as_ref().to_path_buf();
        Self {
            prompts_dir: store_root.join("prompts"),
            versions_dir: store_root.join("versions"),
            selections_dir: store_root.join("selections"),
            locks_dir: store_root.join("locks"),
            store_root,
        }
    }

    /// Resolve the store from `PROMPTLAB_HOME` or the current working directory.
    pub fn resolve() -> Result<Self> {
        let cwd = env::current_dir().map_err(|e| {
            PromptlabError::UserError(format!("failed to get current working directory: {}", e))
        })?;

        let home = env::var_os(HOME_ENV_VAR)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        Ok(Self::resolve_from(&cwd, home))
    }

    /// Resolve the store from a specific directory and optional override.
    ///
    /// When no ancestor contains a store, the context points at
    /// `{cwd}/.promptlab` so `init` knows where to create one.
    pub fn resolve_from<P: AsRef<Path>>(cwd: P, home: Option<PathBuf>) -> Self {
        let cwd = cwd.as_ref();

        if let Some(home) = home {
            let home = if home.is_absolute() {
                home
            } else {
                cwd.join(home)
            };
            return Self::at(home);
        }

        let root = find_store_root(cwd).unwrap_or_else(|| cwd.join(STORE_DIR_NAME));
        Self::at(root)
    }

    /// Check whether the store has been initialized.
    pub fn is_initialized(&self) -> bool {
        self.store_root.is_dir() && self.prompts_dir.is_dir()
    }

    /// Return an error pointing at `promptlab init` if the store is missing.
    pub fn ensure_initialized(&self) -> Result<()> {
        if !self.is_initialized() {
            return Err(PromptlabError::UserError(format!(
                "promptlab store not initialized.\n\
                 Expected store at: {}\n\n\
                 Run `promptlab init` to create one, or set {} to an existing store.",
                self.store_root.display(),
                HOME_ENV_VAR
            )));
        }
        Ok(())
    }

    /// Directories created by `init`.
    pub fn required_dirs(&self) -> [&Path; 5] {
        [
            &self.store_root,
            &self.prompts_dir,
            &self.versions_dir,
            &self.selections_dir,
            &self.locks_dir,
        ]
    }

    pub fn config_path(&self) -> PathBuf {
        self.store_root.join("config.yaml")
    }

    pub fn events_file(&self) -> PathBuf {
        self.store_root.join("events.ndjson")
    }

    /// Version history file for a prompt.
    pub fn versions_path(&self, prompt_id: &str) -> PathBuf {
        self.versions_dir.join(format!("{}.ndjson", prompt_id))
    }

    /// Saved selection file for a prompt.
    pub fn selection_path(&self, prompt_id: &str) -> PathBuf {
        self.selections_dir.join(format!("{}.json", prompt_id))
    }

    /// Lock guarding all store mutations.
    pub fn store_lock_path(&self) -> PathBuf {
        self.locks_dir.join("store.lock")
    }

    /// Lock held while a prompt is being run against the model.
    pub fn run_lock_path(&self, prompt_id: &str) -> PathBuf {
        self.locks_dir.join(format!("{}.run.lock", prompt_id))
    }
}

/// Walk up from `start` looking for a `.promptlab/` directory.
fn find_store_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(STORE_DIR_NAME))
        .find(|candidate| candidate.is_dir())
}

/// Resolve the store and ensure it is initialized.
///
/// Used by every command except `init`.
pub fn require_initialized_store() -> Result<StoreContext> {
    let ctx = StoreContext::resolve()?;
    ctx.ensure_initialized()?;
    Ok(ctx)
}
