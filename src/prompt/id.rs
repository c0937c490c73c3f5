//! Prompt identifiers and file naming.
//!
//! Prompt ids look like `PROMPT-001`; files are `PROMPT-001-{slug}.md`.

use crate::error::{PromptlabError, Result};
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

const PREFIX: &str = "PROMPT-";

static PROMPT_ID_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^PROMPT-\d{3,}$").expect("Invalid prompt ID regex"));

/// Validate a prompt id and return it in canonical (uppercase) form.
///
/// Ids must match `PROMPT-NNN` with at least three digits. Path separators
/// and `..` are rejected before the format check.
pub fn validate_prompt_id(prompt_id: &str) -> Result<String> {
    if prompt_id.contains('/') || prompt_id.contains('\\') || prompt_id.contains("..") {
        return Err(PromptlabError::UserError(format!(
            "invalid prompt ID '{}': contains path traversal characters.\n\
             Prompt IDs must be in the format PROMPT-NNN (e.g., PROMPT-001).",
            prompt_id
        )));
    }

    let normalized = prompt_id.trim().to_uppercase();

    if !PROMPT_ID_REGEX.is_match(&normalized) {
        return Err(PromptlabError::UserError(format!(
            "invalid prompt ID '{}': must be in the format PROMPT-NNN (e.g., PROMPT-001).",
            prompt_id
        )));
    }

    Ok(normalized)
}

/// `PROMPT-NNN`, zero-padded to three digits.
pub fn generate_prompt_id(number: u32) -> String {
    format!("{}{:03}", PREFIX, number)
}

/// Numeric part of a canonical prompt id.
pub fn prompt_number(prompt_id: &str) -> Option<u32> {
    prompt_id.strip_prefix(PREFIX)?.parse().ok()
}

/// Lowercase, hyphen-separated slug of at most 50 bytes.
pub fn slugify_title(title: &str) -> String {
    let mut slug = String::new();
    let mut last_was_hyphen = false;

    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_was_hyphen = false;
        } else if !last_was_hyphen && !slug.is_empty() {
            slug.push('-');
            last_was_hyphen = true;
        }
    }

    while slug.ends_with('-') {
        slug.pop();
    }

    if slug.len() > 50 {
        match slug[..50].rfind('-') {
            Some(pos) => slug.truncate(pos),
            None => slug.truncate(50),
        }
    }

    if slug.is_empty() {
        slug = "untitled".to_string();
    }

    slug
}

/// File name for a prompt: `PROMPT-001-hello-world.md`.
pub fn prompt_filename(prompt_id: &str, title: &str) -> String {
    format!("{}-{}.md", prompt_id, slugify_title(title))
}

/// Extract the prompt id from a `PROMPT-NNN[-slug].md` path.
pub fn prompt_id_from_path(path: &Path) -> Option<String> {
    if path.extension().and_then(|e| e.to_str()) != Some("md") {
        return None;
    }

    let stem = path.file_stem()?.to_str()?;
    let rest = stem.strip_prefix(PREFIX)?;
    let digits = rest.split('-').next()?;

    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    Some(format!("{}{}", PREFIX, digits))
}
