//! Lock acquisition, listing, and clearing.

use super::guard::LockGuard;
use super::metadata::LockMetadata;
use super::types::{LockInfo, LockType, RUN_SUFFIX};
use crate::config::Config;
use crate::context::StoreContext;
use crate::error::{PromptlabError, Result};
use crate::prompt::validate_prompt_id;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Create `lock_path` exclusively and write its metadata.
///
/// Fails with `LockError` if the file already exists.
fn acquire_lock(lock_path: &Path, metadata: &LockMetadata) -> Result<LockGuard> {
    if let Some(parent) = lock_path.parent()
        && !parent.exists()
    {
        fs::create_dir_all(parent).map_err(|e| {
            PromptlabError::StoreError(format!(
                "failed to create locks directory '{}': {}",
                parent.display(),
                e
            ))
        })?;
    }

    let mut file = match OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(lock_path)
    {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
            let held_by = LockMetadata::from_file(lock_path)
                .map(|meta| format!(" (held for {})", meta.holder()))
                .unwrap_or_default();
            return Err(PromptlabError::LockError(format!(
                "'{}' is locked{}; wait for it to finish or see `promptlab lock list`",
                lock_path.display(),
                held_by
            )));
        }
        Err(e) => {
            return Err(PromptlabError::LockError(format!(
                "failed to acquire lock '{}': {}",
                lock_path.display(),
                e
            )));
        }
    };

    let json = metadata.to_json()?;
    if let Err(e) = file.write_all(json.as_bytes()).and_then(|_| file.sync_all()) {
        let _ = fs::remove_file(lock_path);
        return Err(PromptlabError::LockError(format!(
            "failed to write lock metadata: {}",
            e
        )));
    }

    debug!(path = %lock_path.display(), action = %metadata.action, "lock acquired");
    Ok(LockGuard::new(lock_path.to_path_buf()))
}

/// Acquire the store lock for a mutating command.
pub fn acquire_store_lock(ctx: &StoreContext, action: &str) -> Result<LockGuard> {
    acquire_lock(&ctx.store_lock_path(), &LockMetadata::new(action))
}

/// Acquire the run lock for one prompt.
pub fn acquire_run_lock(ctx: &StoreContext, prompt_id: &str) -> Result<LockGuard> {
    let metadata = LockMetadata::for_prompt("run", prompt_id);
    acquire_lock(&ctx.run_lock_path(prompt_id), &metadata)
}

/// List active locks, sorted by name.
///
/// Files that are not lock files or whose metadata cannot be parsed are
/// skipped.
pub fn list_locks(ctx: &StoreContext, config: &Config) -> Result<Vec<LockInfo>> {
    let entries = match fs::read_dir(&ctx.locks_dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => {
            return Err(PromptlabError::StoreError(format!(
                "cannot list '{}': {}",
                ctx.locks_dir.display(),
                e
            )));
        }
    };

    let mut locks = Vec::new();
    for entry in entries {
        let path = entry
            .map_err(|e| PromptlabError::StoreError(format!("cannot list locks: {}", e)))?
            .path();
        if path.extension().is_none_or(|ext| ext != "lock") {
            continue;
        }
        let classified = path
            .file_stem()
            .and_then(|s| s.to_str())
            .and_then(LockType::from_stem);
        if let Some((lock_type, name)) = classified
            && let Ok(info) = inspect(path, name, lock_type, config)
        {
            locks.push(info);
        }
    }

    locks.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(locks)
}

fn inspect(
    path: PathBuf,
    name: String,
    lock_type: LockType,
    config: &Config,
) -> Result<LockInfo> {
    let metadata = LockMetadata::from_file(&path)?;
    Ok(LockInfo {
        is_stale: metadata.is_stale(config.lock_stale_minutes),
        path,
        name,
        lock_type,
        metadata,
    })
}

/// Remove a lock by name.
///
/// `name` is `store`, or a prompt id (optionally with the `.run` suffix)
/// naming that prompt's run lock. Returns the removed lock's info for the
/// audit log.
pub fn clear_lock(ctx: &StoreContext, name: &str, config: &Config) -> Result<LockInfo> {
    let (lock_type, name, lock_path) = resolve_lock_name(ctx, name)?;

    if !lock_path.exists() {
        return Err(PromptlabError::UserError(format!(
            "lock '{}' does not exist at: {}",
            name,
            lock_path.display()
        )));
    }

    let info = inspect(lock_path, name, lock_type, config)?;
    fs::remove_file(&info.path).map_err(|e| {
        PromptlabError::LockError(format!("cannot remove '{}': {}", info.path.display(), e))
    })?;
    Ok(info)
}

fn resolve_lock_name(ctx: &StoreContext, name: &str) -> Result<(LockType, String, PathBuf)> {
    if name.eq_ignore_ascii_case("store") {
        return Ok((LockType::Store, "store".to_string(), ctx.store_lock_path()));
    }

    let id = name.strip_suffix(RUN_SUFFIX).unwrap_or(name);
    let id = validate_prompt_id(id).map_err(|_| {
        PromptlabError::UserError(format!(
            "unknown lock '{}': expected 'store' or a prompt id such as PROMPT-001",
            name
        ))
    })?;

    let path = ctx.run_lock_path(&id);
    Ok((LockType::Run, id, path))
}
