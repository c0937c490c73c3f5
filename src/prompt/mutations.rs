//! Field updates applied to a prompt.

use super::Prompt;
use crate::error::{PromptlabError, Result};
use chrono::{DateTime, Utc};

/// Fields to change on an existing prompt. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PromptUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
    pub add_tags: Vec<String>,
    pub remove_tags: Vec<String>,
}

impl PromptUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.content.is_none()
            && self.add_tags.is_empty()
            && self.remove_tags.is_empty()
    }
}

impl Prompt {
    /// Apply `update`, bumping `updated_at` if anything changed.
    ///
    /// Blank titles and blank content are rejected before any field is
    /// touched. Tags are removed before new ones are added. Returns whether
    /// the prompt changed.
    pub fn apply(&mut self, update: &PromptUpdate, now: DateTime<Utc>) -> Result<bool> {
        if let Some(title) = &update.title
            && title.trim().is_empty()
        {
            return Err(PromptlabError::UserError(
                "title must not be empty".to_string(),
            ));
        }
        if let Some(content) = &update.content
            && content.trim().is_empty()
        {
            return Err(PromptlabError::UserError(
                "content must not be empty".to_string(),
            ));
        }

        let fm = &mut self.frontmatter;
        let mut changed = false;

        if let Some(title) = &update.title {
            changed |= replace_if_different(&mut fm.title, title.trim());
        }
        if let Some(description) = &update.description {
            changed |= replace_if_different(&mut fm.description, description.trim());
        }
        if let Some(content) = &update.content {
            changed |= replace_if_different(&mut self.current_content, content);
        }
        for tag in &update.remove_tags {
            changed |= fm.tags.remove(tag);
        }
        for tag in &update.add_tags {
            changed |= fm.tags.insert(tag);
        }

        if changed {
            fm.updated_at = now.max(fm.updated_at);
        }
        Ok(changed)
    }
}

fn replace_if_different(field: &mut String, value: &str) -> bool {
    if field == value {
        return false;
    }
    *field = value.to_string();
    true
}
