//! Lock management commands: `lock list` and `lock clear`.

use super::{load_config, open_store};
use crate::cli::LockClearArgs;
use crate::config::Config;
use crate::error::{PromptlabError, Result};
use crate::events::{Event, EventAction, append_event};
use crate::locks::{self, LockInfo};
use crate::store::FileStore;
use serde_json::json;

/// Execute the `promptlab lock list` command.
pub fn cmd_lock_list() -> Result<()> {
    let store = open_store()?;
    let config = load_config(&store)?;

    let locks = locks::list_locks(store.context(), &config)?;

    if locks.is_empty() {
        println!("No active locks.");
        return Ok(());
    }

    println!("Active locks ({}):", locks.len());
    println!();

    for lock in &locks {
        println!("  {} ({}):", lock.name, lock.lock_type.as_str());
        println!("    Owner:      {}", lock.metadata.owner);
        if let Some(pid) = lock.metadata.pid {
            println!("    PID:        {}", pid);
        }
        println!(
            "    Created:    {}",
            lock.metadata.created_at.format("%Y-%m-%d %H:%M:%S UTC")
        );
        println!("    Age:        {}", lock.metadata.age_string());
        println!("    Action:     {}", lock.metadata.action);
        if lock.is_stale {
            println!(
                "    Status:     STALE (exceeds {} min threshold)",
                config.lock_stale_minutes
            );
        }
        println!("    Path:       {}", lock.path.display());
        println!();
    }

    let stale_count = locks.iter().filter(|l| l.is_stale).count();
    if stale_count > 0 {
        println!(
            "Note: {} lock(s) are stale. Use `promptlab lock clear <name> --force` to clear.",
            stale_count
        );
    }

    Ok(())
}

/// Execute the `promptlab lock clear` command.
pub fn cmd_lock_clear(args: LockClearArgs) -> Result<()> {
    let store = open_store()?;
    let config = load_config(&store)?;

    let cleared = clear_named_lock(&store, &config, &args)?;

    println!("Cleared lock: {}", cleared);
    println!("  Path: {}", cleared.path.display());
    Ok(())
}

fn clear_named_lock(store: &FileStore, config: &Config, args: &LockClearArgs) -> Result<LockInfo> {
    if !args.force {
        return Err(PromptlabError::UserError(format!(
            "refusing to clear lock without --force flag.\n\n\
             Clearing a lock while its holder is still running can corrupt the store.\n\
             Only clear locks whose holder has crashed.\n\n\
             To clear the lock, run:\n  promptlab lock clear {} --force",
            args.lock_id
        )));
    }

    let cleared = locks::clear_lock(store.context(), &args.lock_id, config)?;

    let event = Event::new(EventAction::LockClear).with_details(json!({
        "lock_id": cleared.name,
        "lock_type": cleared.lock_type.as_str(),
        "age_minutes": cleared.metadata.age().num_minutes(),
        "was_stale": cleared.is_stale,
        "owner": cleared.metadata.owner,
        "original_action": cleared.metadata.action,
    }));

    // The store lock is not taken here: clearing it is usually the point.
    if let Err(e) = append_event(store.context(), &event) {
        eprintln!("Warning: failed to log lock_clear event: {}", e);
    }

    Ok(cleared)
}
