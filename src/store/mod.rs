//! Prompt persistence.
//!
//! [`PromptStore`] is the boundary the rest of the crate talks to; numbering
//! and ordering of versions are delegated to [`VersionHistory`], so every
//! implementation hands out the same `1..=n` sequence.
//!
//! [`FileStore`] keeps everything under the `.promptlab/` store root and takes
//! the store lock around each mutation.

use crate::error::{PromptlabError, Result};
use crate::history::PromptVersion;
use crate::prompt::{Prompt, PromptUpdate, TagSet};

mod file;

pub use file::FileStore;

/// Notes recorded on the version created together with a prompt.
pub const INITIAL_VERSION_NOTES: &str = "Initial version";

/// Input for [`PromptStore::create`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewPrompt {
    pub title: String,
    pub description: String,
    pub content: String,
    pub tags: TagSet,
}

impl NewPrompt {
    /// Reject blank titles and blank content.
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(PromptlabError::UserError(
                "title must not be empty".to_string(),
            ));
        }
        if self.content.trim().is_empty() {
            return Err(PromptlabError::UserError(
                "content must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

pub trait PromptStore {
    /// Create a prompt with its first version (`v1`).
    fn create(&self, new: NewPrompt) -> Result<Prompt>;

    /// Change fields of an existing prompt. Does not create a version.
    fn update(&self, id: &str, update: &PromptUpdate) -> Result<Prompt>;

    /// Append a version and make its content the prompt's current content.
    fn append_version(&self, id: &str, content: &str, notes: &str) -> Result<PromptVersion>;

    /// All versions of a prompt, newest first.
    fn list_versions(&self, id: &str) -> Result<Vec<PromptVersion>>;

    fn get(&self, id: &str) -> Result<Prompt>;

    /// All prompts, ordered by id number.
    fn list(&self) -> Result<Vec<Prompt>>;
}
