//! Prompt authoring commands: `create`, `list`, `show`, `edit`, `publish`,
//! `history` and `restore`.

use super::{load_config, load_template, open_store, print_placeholders};
use crate::cli::{CreateArgs, EditArgs, PromptArgs, PublishArgs, RestoreArgs};
use crate::config::Config;
use crate::error::{PromptlabError, Result};
use crate::history::PromptVersion;
use crate::prompt::{Prompt, PromptUpdate, validate_prompt_id};
use crate::store::{FileStore, NewPrompt, PromptStore};
use crate::template::extract_placeholders;
use tracing::debug;

const RULE: &str =
    "================================================================================";

/// Execute the `promptlab create` command.
pub fn cmd_create(args: CreateArgs) -> Result<()> {
    let store = open_store()?;

    let prompt = store.create(NewPrompt {
        title: args.title,
        description: args.description,
        content: args.content,
        tags: args.tags.iter().collect(),
    })?;

    println!("Created {}: {}", prompt.id(), prompt.title());
    println!("  Version: v1");
    println!("  Placeholders:");
    print_placeholders(&extract_placeholders(&prompt.current_content));

    Ok(())
}

/// Execute the `promptlab list` command.
pub fn cmd_list() -> Result<()> {
    let store = open_store()?;
    let prompts = store.list()?;

    if prompts.is_empty() {
        println!("No prompts yet. Create one with `promptlab create`.");
        return Ok(());
    }

    for prompt in &prompts {
        let versions = store.history(prompt.id())?.len();
        let tags = &prompt.frontmatter.tags;
        if tags.is_empty() {
            println!("{:<12} v{:<4} {}", prompt.id(), versions, prompt.title());
        } else {
            println!(
                "{:<12} v{:<4} {}  [{}]",
                prompt.id(),
                versions,
                prompt.title(),
                tags
            );
        }
    }

    Ok(())
}

/// Execute the `promptlab show` command.
pub fn cmd_show(args: PromptArgs) -> Result<()> {
    let store = open_store()?;
    let prompt = store.get(&args.prompt_id)?;
    let history = store.history(prompt.id())?;
    let fm = &prompt.frontmatter;

    println!("{}", RULE);
    println!("{}", prompt.id());
    println!("{}", RULE);
    println!();
    println!("Title:       {}", fm.title);
    if !fm.description.is_empty() {
        println!("Description: {}", fm.description);
    }
    if !fm.tags.is_empty() {
        println!("Tags:        {}", fm.tags);
    }
    println!("Created:     {}", fm.created_at.format("%Y-%m-%d %H:%M:%S UTC"));
    println!("Updated:     {}", fm.updated_at.format("%Y-%m-%d %H:%M:%S UTC"));

    match history.head() {
        Some(head) => println!("Versions:    {} (latest {})", history.len(), head.id),
        None => println!("Versions:    0"),
    }
    if has_unpublished_changes(&prompt, history.head()) {
        println!(
            "Status:      unpublished changes (run `promptlab publish {}`)",
            prompt.id()
        );
    }

    println!();
    println!("Placeholders:");
    print_placeholders(&extract_placeholders(&prompt.current_content));

    println!();
    println!("Content:");
    println!("{}", RULE);
    println!("{}", prompt.current_content);

    Ok(())
}

/// Whether the live content differs from the newest version.
fn has_unpublished_changes(prompt: &Prompt, head: Option<&PromptVersion>) -> bool {
    head.is_none_or(|head| head.content != prompt.current_content)
}

/// Execute the `promptlab edit` command.
pub fn cmd_edit(args: EditArgs) -> Result<()> {
    let store = open_store()?;
    let config = load_config(&store)?;

    let outcome = edit_prompt(&store, &config, args)?;

    println!("Updated {}: {}", outcome.prompt.id(), outcome.prompt.title());
    match &outcome.version {
        Some(version) => println!("  Published {}", version.id),
        None if outcome.content_changed => println!(
            "  Content changed. Run `promptlab publish {}` to record a version.",
            outcome.prompt.id()
        ),
        None => {}
    }

    Ok(())
}

#[derive(Debug)]
struct EditOutcome {
    prompt: Prompt,
    content_changed: bool,
    version: Option<PromptVersion>,
}

/// Apply an edit, publishing a version when asked to or when
/// `version_on_save` is set and the content changed.
fn edit_prompt(store: &FileStore, config: &Config, args: EditArgs) -> Result<EditOutcome> {
    let update = PromptUpdate {
        title: args.title,
        description: args.description,
        content: args.content,
        add_tags: args.add_tag,
        remove_tags: args.remove_tag,
    };

    if update.is_empty() && !args.publish {
        return Err(PromptlabError::UserError(
            "nothing to change: pass --title, --description, --content, --add-tag, \
             --remove-tag or --publish"
                .to_string(),
        ));
    }

    let before = store.get(&args.prompt_id)?;
    let prompt = store.update(before.id(), &update)?;
    let content_changed = prompt.current_content != before.current_content;

    let publish = args.publish || (config.version_on_save && content_changed);
    debug!(
        prompt = %prompt.id(),
        content_changed,
        publish,
        "edit applied"
    );

    let version = if publish {
        let notes = args.notes.as_deref().unwrap_or("");
        Some(store.append_version(prompt.id(), &prompt.current_content, notes)?)
    } else {
        None
    };

    Ok(EditOutcome {
        prompt,
        content_changed,
        version,
    })
}

/// Execute the `promptlab publish` command.
pub fn cmd_publish(args: PublishArgs) -> Result<()> {
    let store = open_store()?;
    let version = publish_prompt(&store, &args)?;

    println!(
        "Published {} {} ({})",
        validate_prompt_id(&args.prompt_id)?,
        version.id,
        version.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    Ok(())
}

fn publish_prompt(store: &FileStore, args: &PublishArgs) -> Result<PromptVersion> {
    let prompt = store.get(&args.prompt_id)?;
    store.append_version(prompt.id(), &prompt.current_content, &args.notes)
}

/// Execute the `promptlab history` command.
pub fn cmd_history(args: PromptArgs) -> Result<()> {
    let store = open_store()?;
    let versions = store.list_versions(&args.prompt_id)?;
    let selection = store.load_selection(&args.prompt_id)?;

    for version in &versions {
        let marker = if selection.selected.contains(&version.id) {
            '*'
        } else {
            ' '
        };
        let notes = if version.notes.is_empty() {
            "(no notes)"
        } else {
            version.notes.as_str()
        };
        println!(
            "{} {:<5} {}  {}",
            marker,
            version.id,
            version.created_at.format("%Y-%m-%d %H:%M:%S UTC"),
            notes
        );
    }

    if !selection.selected.is_empty() {
        println!();
        println!("* selected for comparison");
    }

    Ok(())
}

/// Execute the `promptlab restore` command.
pub fn cmd_restore(args: RestoreArgs) -> Result<()> {
    let store = open_store()?;
    let outcome = restore_version(&store, &args)?;

    println!(
        "Restored {} to {}",
        outcome.prompt.id(),
        outcome.restored_from
    );
    match &outcome.version {
        Some(version) => println!("  Published {}", version.id),
        None if outcome.content_changed => println!(
            "  Run `promptlab publish {}` to record it as a new version.",
            outcome.prompt.id()
        ),
        None => println!("  Content was already identical."),
    }
    Ok(())
}

#[derive(Debug)]
struct RestoreOutcome {
    prompt: Prompt,
    restored_from: String,
    content_changed: bool,
    version: Option<PromptVersion>,
}

/// Make a stored version's content the live content again.
fn restore_version(store: &FileStore, args: &RestoreArgs) -> Result<RestoreOutcome> {
    let source = load_template(store, &args.prompt_id, Some(args.version.as_str()))?;
    let content_changed = source.text != source.prompt.current_content;

    let update = PromptUpdate {
        content: Some(source.text),
        ..PromptUpdate::default()
    };
    let prompt = store.update(source.prompt.id(), &update)?;
    debug!(prompt = %prompt.id(), from = %source.label, content_changed, "version restored");

    let version = if args.publish {
        let notes = args
            .notes
            .clone()
            .unwrap_or_else(|| format!("Restored from {}", source.label));
        Some(store.append_version(prompt.id(), &prompt.current_content, &notes)?)
    } else {
        None
    };

    Ok(RestoreOutcome {
        prompt,
        restored_from: source.label,
        content_changed,
        version,
    })
}
