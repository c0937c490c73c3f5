//! Implementation of the `promptlab init` command.
//!
//! Creates the store layout under `.promptlab/` and a default `config.yaml`.
//! Running it again is harmless: existing prompts, versions and config are
//! left alone.

use crate::config::Config;
use crate::context::StoreContext;
use crate::error::{PromptlabError, Result};
use crate::events::{Event, EventAction, append_event};
use crate::locks::acquire_store_lock;
use serde_json::json;
use std::fs;
use tracing::info;

/// Execute the `promptlab init` command.
pub fn cmd_init() -> Result<()> {
    let ctx = StoreContext::resolve()?;
    let created = init_store(&ctx)?;

    if created {
        println!("Initialized promptlab store.");
    } else {
        println!("promptlab store already initialized.");
    }
    println!();
    println!("Store:  {}", ctx.store_root.display());
    println!("Config: {}", ctx.config_path().display());
    println!();
    println!("Create a prompt with `promptlab create \"title\" --content \"...\"`.");

    Ok(())
}

/// Create any missing store directories and the default config.
///
/// Returns `true` when the store did not exist before.
pub(super) fn init_store(ctx: &StoreContext) -> Result<bool> {
    let existed = ctx.is_initialized();

    for dir in ctx.required_dirs() {
        fs::create_dir_all(dir).map_err(|e| {
            PromptlabError::StoreError(format!(
                "failed to create directory '{}': {}",
                dir.display(),
                e
            ))
        })?;
    }

    let _lock = acquire_store_lock(ctx, "init")?;

    let config_path = ctx.config_path();
    if !config_path.exists() {
        Config::default().save(&config_path)?;
    }

    if !existed {
        append_event(
            ctx,
            &Event::new(EventAction::Init).with_details(json!({
                "store": ctx.store_root.display().to_string(),
            })),
        )?;
        info!(store = %ctx.store_root.display(), "store initialized");
    }

    Ok(!existed)
}
