//! Command implementations for promptlab.
//!
//! This module provides the dispatcher that routes CLI commands to their
//! implementations, plus the small helpers most commands share: opening the
//! store and picking which text of a prompt to work with.

mod compare;
mod config_cmd;
mod init;
mod lock;
mod prompts;
mod render;
mod run;

use crate::cli::{Command, ConfigAction, LockAction};
use crate::config::Config;
use crate::context::require_initialized_store;
use crate::error::{PromptlabError, Result};
use crate::history::parse_version_ref;
use crate::prompt::Prompt;
use crate::store::{FileStore, PromptStore};

/// Dispatch a command to its implementation.
///
/// `run` is the only command that awaits; everything else is synchronous.
pub async fn dispatch(command: Command) -> Result<()> {
    match command {
        Command::Init => init::cmd_init(),
        Command::Create(args) => prompts::cmd_create(args),
        Command::List => prompts::cmd_list(),
        Command::Show(args) => prompts::cmd_show(args),
        Command::Edit(args) => prompts::cmd_edit(args),
        Command::Publish(args) => prompts::cmd_publish(args),
        Command::History(args) => prompts::cmd_history(args),
        Command::Restore(args) => prompts::cmd_restore(args),
        Command::Vars(args) => render::cmd_vars(args),
        Command::Render(args) => render::cmd_render(args),
        Command::Run(args) => run::cmd_run(args).await,
        Command::Select(args) => compare::cmd_select(args),
        Command::Compare(args) => compare::cmd_compare(args),
        Command::Config(cmd) => match cmd.action {
            ConfigAction::Show => config_cmd::cmd_config_show(),
            ConfigAction::SetKey(args) => config_cmd::cmd_config_set_key(args),
        },
        Command::Lock(cmd) => match cmd.action {
            LockAction::List => lock::cmd_lock_list(),
            LockAction::Clear(args) => lock::cmd_lock_clear(args),
        },
    }
}

/// Open the store found from the working directory (or `PROMPTLAB_HOME`).
fn open_store() -> Result<FileStore> {
    Ok(FileStore::new(require_initialized_store()?))
}

fn load_config(store: &FileStore) -> Result<Config> {
    Config::load_or_default(store.context().config_path())
}

/// The text of a prompt that a command operates on.
#[derive(Debug, Clone)]
struct TemplateSource {
    prompt: Prompt,

    /// `current`, or the version id when `--version` was given.
    label: String,

    text: String,
}

/// Load the current content of a prompt, or one of its stored versions.
fn load_template(
    store: &FileStore,
    prompt_id: &str,
    version: Option<&str>,
) -> Result<TemplateSource> {
    let prompt = store.get(prompt_id)?;

    let Some(reference) = version else {
        let text = prompt.current_content.clone();
        return Ok(TemplateSource {
            prompt,
            label: "current".to_string(),
            text,
        });
    };

    let number = parse_version_ref(reference).ok_or_else(|| {
        PromptlabError::UserError(format!(
            "invalid version '{}': expected a version such as 2 or v2",
            reference
        ))
    })?;

    let history = store.history(prompt.id())?;
    let stored = history.get(number)?;

    Ok(TemplateSource {
        label: stored.id.clone(),
        text: stored.content.clone(),
        prompt,
    })
}

/// Print a list of placeholder names, one per line.
fn print_placeholders(names: &[String]) {
    if names.is_empty() {
        println!("  (none)");
        return;
    }
    for name in names {
        println!("  [{}]", name);
    }
}
