//! CLI argument parsing for promptlab.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module.

use clap::{Parser, Subcommand};

/// Promptlab: file-based prompt authoring with placeholder templates.
///
/// Prompts are templates containing `[placeholder]` variables. Each prompt
/// keeps an append-only version history that can be compared side by side,
/// and a filled-in template can be sent to an OpenAI-compatible model.
#[derive(Parser, Debug)]
#[command(name = "promptlab")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Log level for diagnostics on stderr (error, warn, info, debug, trace).
    ///
    /// `RUST_LOG` directives are applied on top of this level.
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: tracing::Level,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands for promptlab.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a prompt store (`.promptlab/`) in the current directory.
    Init,

    /// Create a new prompt. Its content becomes version v1.
    Create(CreateArgs),

    /// List all prompts.
    List,

    /// Show a prompt's metadata, current content and placeholders.
    Show(PromptArgs),

    /// Change a prompt's title, description, content or tags.
    ///
    /// Editing the content does not create a version unless `--publish` is
    /// given or `version_on_save` is enabled in config.yaml.
    Edit(EditArgs),

    /// Snapshot the prompt's current content as a new version.
    Publish(PublishArgs),

    /// List a prompt's versions, newest first.
    History(PromptArgs),

    /// Copy a stored version's content back into the prompt.
    ///
    /// The history is left alone unless `--publish` is given, in which case
    /// the restored content is recorded as a new version.
    Restore(RestoreArgs),

    /// List the placeholders of a prompt (or one of its versions).
    Vars(VarsArgs),

    /// Fill in placeholders and print the rendered prompt.
    Render(RenderArgs),

    /// Fill in placeholders and send the rendered prompt to the model.
    Run(RenderArgs),

    /// Toggle a version in the comparison selection (at most two).
    Select(SelectArgs),

    /// Compare the two selected versions, newest first.
    Compare(CompareArgs),

    /// Configuration commands.
    Config(ConfigCommand),

    /// Lock management commands.
    ///
    /// List or clear store and run locks.
    Lock(LockCommand),
}

/// Arguments for the `create` command.
#[derive(Parser, Debug)]
pub struct CreateArgs {
    /// Title for the new prompt.
    pub title: String,

    /// Template text, with placeholders written as `[name]`.
    #[arg(short, long)]
    pub content: String,

    /// Short description.
    #[arg(short, long, default_value = "")]
    pub description: String,

    /// Tags for categorization.
    #[arg(long, value_delimiter = ',')]
    pub tags: Vec<String>,
}

/// A command that takes only a prompt id.
#[derive(Parser, Debug)]
pub struct PromptArgs {
    /// Prompt ID (e.g., PROMPT-001).
    pub prompt_id: String,
}

/// Arguments for the `edit` command.
#[derive(Parser, Debug)]
pub struct EditArgs {
    /// Prompt ID to edit.
    pub prompt_id: String,

    #[arg(long)]
    pub title: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    /// New template text.
    #[arg(long)]
    pub content: Option<String>,

    /// Tags to add (comma-separated or repeated).
    #[arg(long, value_delimiter = ',')]
    pub add_tag: Vec<String>,

    /// Tags to remove (comma-separated or repeated).
    #[arg(long, value_delimiter = ',')]
    pub remove_tag: Vec<String>,

    /// Also publish the edited content as a new version.
    #[arg(long)]
    pub publish: bool,

    /// Notes for the published version.
    #[arg(long, requires = "publish")]
    pub notes: Option<String>,
}

/// Arguments for the `publish` command.
#[derive(Parser, Debug)]
pub struct PublishArgs {
    /// Prompt ID to publish.
    pub prompt_id: String,

    /// Notes describing the change.
    #[arg(short, long, default_value = "")]
    pub notes: String,
}

/// Arguments for the `restore` command.
#[derive(Parser, Debug)]
pub struct RestoreArgs {
    /// Prompt ID.
    pub prompt_id: String,

    /// Version to restore (e.g., v2 or 2).
    #[arg(id = "version_ref", value_name = "VERSION")]
    pub version: String,

    /// Also publish the restored content as a new version.
    #[arg(long)]
    pub publish: bool,

    /// Notes for the published version (default: "Restored from vN").
    #[arg(long, requires = "publish")]
    pub notes: Option<String>,
}

/// Arguments for the `vars` command.
#[derive(Parser, Debug)]
#[command(disable_version_flag = true)]
pub struct VarsArgs {
    /// Prompt ID.
    pub prompt_id: String,

    /// Use a stored version (e.g., 2 or v2) instead of the current content.
    #[arg(id = "version_ref", long = "version")]
    pub version: Option<String>,
}

/// Arguments for the `render` and `run` commands.
#[derive(Parser, Debug)]
#[command(disable_version_flag = true)]
pub struct RenderArgs {
    /// Prompt ID.
    pub prompt_id: String,

    /// Placeholder value as `name=value`; repeat for each placeholder.
    #[arg(long = "var", value_name = "NAME=VALUE")]
    pub vars: Vec<String>,

    /// Use a stored version (e.g., 2 or v2) instead of the current content.
    #[arg(id = "version_ref", long = "version")]
    pub version: Option<String>,
}

/// Arguments for the `select` command.
#[derive(Parser, Debug)]
pub struct SelectArgs {
    /// Prompt ID.
    pub prompt_id: String,

    /// Version to toggle (e.g., v2 or 2).
    #[arg(id = "version_ref", value_name = "VERSION")]
    pub version: String,
}

/// Arguments for the `compare` command.
#[derive(Parser, Debug)]
pub struct CompareArgs {
    /// Prompt ID.
    pub prompt_id: String,

    /// Clear the selection and leave comparison mode.
    #[arg(long)]
    pub cancel: bool,
}

/// Config subcommands.
#[derive(Parser, Debug)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the effective configuration (the API key is masked).
    Show,

    /// Store an API key in config.yaml.
    ///
    /// The environment variable named by `execution.api_key_env` still takes
    /// precedence when set.
    SetKey(SetKeyArgs),
}

#[derive(Parser, Debug)]
pub struct SetKeyArgs {
    /// The API key.
    pub key: String,
}

/// Lock subcommands.
#[derive(Parser, Debug)]
pub struct LockCommand {
    #[command(subcommand)]
    pub action: LockAction,
}

#[derive(Subcommand, Debug)]
pub enum LockAction {
    /// List all active locks.
    List,

    /// Clear a stale lock.
    Clear(LockClearArgs),
}

/// Arguments for the `lock clear` command.
#[derive(Parser, Debug)]
pub struct LockClearArgs {
    /// `store`, or a prompt ID to clear its run lock.
    pub lock_id: String,

    /// Required: confirms the lock holder is gone.
    #[arg(long)]
    pub force: bool,
}

impl Cli {
    /// Parse command line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
