//! Prompt file model for promptlab.
//!
//! A prompt is stored as YAML frontmatter followed by its live template text:
//!
//! ```text
//! ---
//! id: PROMPT-001
//! title: Product description
//! description: Short marketing blurb
//! tags:
//! - marketing
//! created_at: 2026-01-13T10:00:00Z
//! updated_at: 2026-01-13T10:00:00Z
//! ---
//! Write a description of [product] for [audience].
//! ```
//!
//! The body is the prompt's current content, preserved byte for byte.
//! Published snapshots live in the prompt's version history, not here.

use crate::error::{PromptlabError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

mod id;
mod io;
mod mutations;
mod tags;
#[cfg(test)]
mod tests;

pub use id::{
    generate_prompt_id, prompt_filename, prompt_id_from_path, prompt_number, slugify_title,
    validate_prompt_id,
};
pub use mutations::PromptUpdate;
pub use tags::TagSet;

#[derive(Debug, Clone, PartialEq)]
pub struct Prompt {
    pub frontmatter: PromptFrontmatter,
    /// The template currently being edited.
    pub current_content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptFrontmatter {
    /// Prompt identifier (e.g., "PROMPT-001").
    pub id: String,

    pub title: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    #[serde(default, skip_serializing_if = "TagSet::is_empty")]
    pub tags: TagSet,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,

    /// Fields this version does not know about, kept for round-tripping.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

impl Prompt {
    pub fn new(
        id: String,
        title: &str,
        description: &str,
        content: &str,
        tags: TagSet,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            frontmatter: PromptFrontmatter {
                id,
                title: title.trim().to_string(),
                description: description.trim().to_string(),
                tags,
                created_at: now,
                updated_at: now,
                extra: BTreeMap::new(),
            },
            current_content: content.to_string(),
        }
    }

    pub fn id(&self) -> &str {
        &self.frontmatter.id
    }

    pub fn title(&self) -> &str {
        &self.frontmatter.title
    }

    /// Parse a prompt file.
    ///
    /// LF and CRLF delimiters are both accepted; the body is kept exactly as
    /// written.
    pub fn parse(content: &str) -> Result<Self> {
        let (yaml, body) = split_frontmatter(content)?;

        let frontmatter: PromptFrontmatter = serde_yaml::from_str(yaml).map_err(|e| {
            PromptlabError::StoreError(format!("failed to parse prompt frontmatter: {}", e))
        })?;

        Ok(Self {
            frontmatter,
            current_content: body.to_string(),
        })
    }
}

/// Split `---\n{yaml}---\n{body}` into its YAML and body.
fn split_frontmatter(content: &str) -> Result<(&str, &str)> {
    let rest = content
        .strip_prefix("---\r\n")
        .or_else(|| content.strip_prefix("---\n"))
        .ok_or_else(|| {
            PromptlabError::StoreError(
                "prompt file must start with '---' frontmatter delimiter".to_string(),
            )
        })?;

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end_matches(['\r', '\n']) == "---" {
            let yaml = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return Ok((yaml, body));
        }
        offset += line.len();
    }

    Err(PromptlabError::StoreError(
        "prompt file missing closing '---' frontmatter delimiter".to_string(),
    ))
}
