//! File-backed prompt store.

use super::{INITIAL_VERSION_NOTES, NewPrompt, PromptStore};
use crate::compare::SelectionState;
use crate::context::StoreContext;
use crate::error::{PromptlabError, Result};
use crate::events::{Event, EventAction, append_event};
use crate::fs::{append_json_line, atomic_write_file, read_json_lines};
use crate::history::{PromptVersion, VersionHistory};
use crate::locks::acquire_store_lock;
use crate::prompt::{
    Prompt, PromptUpdate, generate_prompt_id, prompt_filename, prompt_id_from_path,
    prompt_number, validate_prompt_id,
};
use chrono::Utc;
use serde_json::json;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info};

/// Prompt store rooted at a `.promptlab/` directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    ctx: StoreContext,
}

impl FileStore {
    pub fn new(ctx: StoreContext) -> Self {
        Self { ctx }
    }

    pub fn context(&self) -> &StoreContext {
        &self.ctx
    }

    /// Load a prompt's version history, checking its invariants.
    pub fn history(&self, id: &str) -> Result<VersionHistory> {
        let id = validate_prompt_id(id)?;
        self.find_prompt_path(&id)?;
        self.load_history(&id)
    }

    /// Saved comparison selection for a prompt (empty if none was saved).
    pub fn load_selection(&self, id: &str) -> Result<SelectionState> {
        let id = validate_prompt_id(id)?;
        let path = self.ctx.selection_path(&id);

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(SelectionState::default());
            }
            Err(e) => {
                return Err(PromptlabError::StoreError(format!(
                    "failed to read selection '{}': {}",
                    path.display(),
                    e
                )));
            }
        };

        serde_json::from_str(&content).map_err(|e| {
            PromptlabError::StoreError(format!(
                "failed to parse selection '{}': {}",
                path.display(),
                e
            ))
        })
    }

    /// Persist a prompt's comparison selection.
    pub fn save_selection(&self, id: &str, state: &SelectionState) -> Result<()> {
        let id = validate_prompt_id(id)?;
        let json = serde_json::to_string_pretty(state).map_err(|e| {
            PromptlabError::StoreError(format!("failed to serialize selection: {}", e))
        })?;

        let _lock = acquire_store_lock(&self.ctx, "select")?;
        atomic_write_file(self.ctx.selection_path(&id), &json)
    }

    fn load_history(&self, id: &str) -> Result<VersionHistory> {
        let path = self.ctx.versions_path(id);
        let versions: Vec<PromptVersion> = read_json_lines(&path)?;
        VersionHistory::from_versions(versions).map_err(|e| {
            PromptlabError::StoreError(format!("{}: {}", path.display(), e))
        })
    }

    /// Locate `PROMPT-NNN-*.md` for a canonical id.
    fn find_prompt_path(&self, id: &str) -> Result<PathBuf> {
        self.prompt_paths()?
            .into_iter()
            .find_map(|(found, path)| (found == id).then_some(path))
            .ok_or_else(|| PromptlabError::NotFound(format!("prompt '{}' not found", id)))
    }

    /// Every prompt file in the store, paired with its id.
    fn prompt_paths(&self) -> Result<Vec<(String, PathBuf)>> {
        let dir = &self.ctx.prompts_dir;
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(dir).map_err(|e| {
            PromptlabError::StoreError(format!(
                "failed to read prompts directory '{}': {}",
                dir.display(),
                e
            ))
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                PromptlabError::StoreError(format!("failed to read directory entry: {}", e))
            })?;
            let path = entry.path();
            if let Some(id) = prompt_id_from_path(&path) {
                paths.push((id, path));
            }
        }

        paths.sort_by_key(|(id, _)| prompt_number(id).unwrap_or(u32::MAX));
        Ok(paths)
    }

    fn next_prompt_number(&self) -> Result<u32> {
        let max = self
            .prompt_paths()?
            .iter()
            .filter_map(|(id, _)| prompt_number(id))
            .max()
            .unwrap_or(0);
        Ok(max + 1)
    }

    /// Write a prompt under its current title's file name, removing the old
    /// file if the name changed.
    fn write_prompt(&self, prompt: &Prompt, old_path: Option<&PathBuf>) -> Result<PathBuf> {
        let path = self
            .ctx
            .prompts_dir
            .join(prompt_filename(prompt.id(), prompt.title()));
        prompt.save(&path)?;

        if let Some(old) = old_path
            && old != &path
        {
            fs::remove_file(old).map_err(|e| {
                PromptlabError::StoreError(format!(
                    "failed to remove old prompt file '{}': {}",
                    old.display(),
                    e
                ))
            })?;
        }
        Ok(path)
    }
}

impl PromptStore for FileStore {
    fn create(&self, new: NewPrompt) -> Result<Prompt> {
        new.validate()?;

        let _lock = acquire_store_lock(&self.ctx, "create")?;

        let id = generate_prompt_id(self.next_prompt_number()?);
        let now = Utc::now();
        let prompt = Prompt::new(
            id.clone(),
            &new.title,
            &new.description,
            &new.content,
            new.tags,
            now,
        );

        let mut history = VersionHistory::new();
        let version = history.append(prompt.current_content.clone(), INITIAL_VERSION_NOTES, now);

        self.write_prompt(&prompt, None)?;
        append_json_line(self.ctx.versions_path(&id), &version)?;

        append_event(
            &self.ctx,
            &Event::new(EventAction::Create)
                .with_prompt(&id)
                .with_details(json!({
                    "title": prompt.title(),
                    "version": version.id,
                })),
        )?;

        info!(prompt = %id, "prompt created");
        Ok(prompt)
    }

    fn update(&self, id: &str, update: &PromptUpdate) -> Result<Prompt> {
        let id = validate_prompt_id(id)?;

        let _lock = acquire_store_lock(&self.ctx, "edit")?;

        let path = self.find_prompt_path(&id)?;
        let mut prompt = Prompt::load(&path)?;

        if !prompt.apply(update, Utc::now())? {
            debug!(prompt = %id, "update changed nothing");
            return Ok(prompt);
        }

        self.write_prompt(&prompt, Some(&path))?;

        append_event(
            &self.ctx,
            &Event::new(EventAction::Update)
                .with_prompt(&id)
                .with_details(json!({
                    "title": update.title.is_some(),
                    "description": update.description.is_some(),
                    "content": update.content.is_some(),
                    "add_tags": update.add_tags,
                    "remove_tags": update.remove_tags,
                })),
        )?;

        info!(prompt = %id, "prompt updated");
        Ok(prompt)
    }

    fn append_version(&self, id: &str, content: &str, notes: &str) -> Result<PromptVersion> {
        let id = validate_prompt_id(id)?;

        let _lock = acquire_store_lock(&self.ctx, "publish")?;

        let path = self.find_prompt_path(&id)?;
        let mut prompt = Prompt::load(&path)?;
        let mut history = self.load_history(&id)?;

        let now = Utc::now();
        let version = history.append(content, notes.trim(), now);
        append_json_line(self.ctx.versions_path(&id), &version)?;

        let update = PromptUpdate {
            content: Some(content.to_string()),
            ..Default::default()
        };
        // Blank content is still a valid snapshot; only sync the live copy
        // when it can be applied.
        if !content.trim().is_empty() && prompt.apply(&update, now)? {
            self.write_prompt(&prompt, Some(&path))?;
        }

        append_event(
            &self.ctx,
            &Event::new(EventAction::Publish)
                .with_prompt(&id)
                .with_details(json!({
                    "version": version.id,
                    "notes": version.notes,
                })),
        )?;

        info!(prompt = %id, version = %version.id, "version published");
        Ok(version)
    }

    fn list_versions(&self, id: &str) -> Result<Vec<PromptVersion>> {
        Ok(self.history(id)?.list())
    }

    fn get(&self, id: &str) -> Result<Prompt> {
        let id = validate_prompt_id(id)?;
        let path = self.find_prompt_path(&id)?;
        Prompt::load(path)
    }

    fn list(&self) -> Result<Vec<Prompt>> {
        self.prompt_paths()?
            .into_iter()
            .map(|(_, path)| Prompt::load(path))
            .collect()
    }
}
