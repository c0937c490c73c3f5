//! File I/O for prompt files.

use super::Prompt;
use crate::error::{PromptlabError, Result};
use std::path::Path;

impl Prompt {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            PromptlabError::StoreError(format!(
                "failed to read prompt file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::parse(&content).map_err(|e| match e {
            PromptlabError::StoreError(msg) => {
                PromptlabError::StoreError(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })
    }

    /// Atomically save the prompt file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        crate::fs::atomic_write_file(path, &self.to_file_string()?)
    }

    /// Render the file contents: frontmatter, then the live content verbatim.
    pub fn to_file_string(&self) -> Result<String> {
        let yaml = serde_yaml::to_string(&self.frontmatter).map_err(|e| {
            PromptlabError::StoreError(format!("failed to serialize prompt frontmatter: {}", e))
        })?;

        let mut output = String::with_capacity(yaml.len() + self.current_content.len() + 8);
        output.push_str("---\n");
        output.push_str(&yaml);
        output.push_str("---\n");
        output.push_str(&self.current_content);
        Ok(output)
    }
}
