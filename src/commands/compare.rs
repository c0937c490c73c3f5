//! Version comparison commands: `select` and `compare`.
//!
//! The selection for each prompt is saved between invocations, so picking two
//! versions and comparing them can be spread over several commands. Requests
//! the selector cannot honor (a third version, an unknown id, comparing with
//! fewer than two selected) print a note and succeed.

use super::open_store;
use crate::cli::{CompareArgs, SelectArgs};
use crate::compare::{ComparisonSelector, MAX_SELECTED, SelectionState, ToggleOutcome};
use crate::error::Result;
use crate::history::PromptVersion;
use crate::store::{FileStore, PromptStore};
use tracing::debug;

/// Execute the `promptlab select` command.
pub fn cmd_select(args: SelectArgs) -> Result<()> {
    let store = open_store()?;
    let (outcome, state) = toggle_selection(&store, &args.prompt_id, &args.version)?;

    match outcome {
        ToggleOutcome::Selected => println!("Selected {}.", args.version),
        ToggleOutcome::Deselected => println!("Deselected {}.", args.version),
        ToggleOutcome::SelectionFull => println!(
            "Two versions are already selected; deselect one first. Nothing changed."
        ),
        ToggleOutcome::UnknownVersion => {
            println!("No version '{}' in history. Nothing changed.", args.version)
        }
    }

    if state.selected.is_empty() {
        println!("Selection: (none)");
    } else {
        println!("Selection: {}", state.selected.join(", "));
    }
    if state.selected.len() == MAX_SELECTED {
        println!("Run `promptlab compare {}` to compare them.", args.prompt_id);
    }
    Ok(())
}

/// Toggle `version` in the saved selection for a prompt.
fn toggle_selection(
    store: &FileStore,
    prompt_id: &str,
    version: &str,
) -> Result<(ToggleOutcome, SelectionState)> {
    let prompt = store.get(prompt_id)?;
    let history = store.history(prompt.id())?;
    let saved = store.load_selection(prompt.id())?;

    let mut selector = ComparisonSelector::restore(&history, saved.clone());
    let outcome = selector.toggle(version);
    let state = selector.into_state();

    if state != saved {
        store.save_selection(prompt.id(), &state)?;
    }
    debug!(prompt = %prompt.id(), ?outcome, selected = ?state.selected, "selection toggled");

    Ok((outcome, state))
}

/// Execute the `promptlab compare` command.
pub fn cmd_compare(args: CompareArgs) -> Result<()> {
    let store = open_store()?;

    if args.cancel {
        cancel_comparison(&store, &args.prompt_id)?;
        println!("Comparison cancelled; selection cleared.");
        return Ok(());
    }

    let Some((newer, older)) = start_comparison(&store, &args.prompt_id)? else {
        println!(
            "Select two versions first with `promptlab select {} <version>`. Nothing to compare.",
            args.prompt_id
        );
        return Ok(());
    };

    print_version("Newer", &newer);
    println!();
    print_version("Older", &older);
    Ok(())
}

fn print_version(heading: &str, version: &PromptVersion) {
    println!(
        "--- {}: {} ({}) ---",
        heading,
        version.id,
        version.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    if !version.notes.is_empty() {
        println!("Notes: {}", version.notes);
    }
    println!("{}", version.content);
}

/// Enter comparison mode and return the pair, newest first.
///
/// Returns `None`, leaving the selection as it was, unless exactly two
/// versions are selected.
fn start_comparison(
    store: &FileStore,
    prompt_id: &str,
) -> Result<Option<(PromptVersion, PromptVersion)>> {
    let prompt = store.get(prompt_id)?;
    let history = store.history(prompt.id())?;
    let saved = store.load_selection(prompt.id())?;

    let mut selector = ComparisonSelector::restore(&history, saved.clone());
    if !selector.start_comparison() {
        return Ok(None);
    }

    let pair = selector
        .comparison_pair()
        .map(|pair| (pair.newer.clone(), pair.older.clone()));

    if selector.state() != &saved {
        store.save_selection(prompt.id(), selector.state())?;
    }
    Ok(pair)
}

/// Clear the selection and leave comparison mode.
fn cancel_comparison(store: &FileStore, prompt_id: &str) -> Result<()> {
    let prompt = store.get(prompt_id)?;
    let history = store.history(prompt.id())?;
    let saved = store.load_selection(prompt.id())?;

    let mut selector = ComparisonSelector::restore(&history, saved.clone());
    selector.cancel_comparison();

    if selector.state() != &saved {
        store.save_selection(prompt.id(), selector.state())?;
    }
    Ok(())
}
