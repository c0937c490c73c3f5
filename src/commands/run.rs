//! Implementation of the `promptlab run` command.
//!
//! Renders a prompt, sends it to the configured model, and prints the reply.
//! The per-prompt run lock keeps a second `run` of the same prompt from
//! starting until this one has its answer. A failed request is reported once
//! and never retried.

use super::render::{RenderedPrompt, render_prompt, warn_unfilled};
use super::{load_config, open_store};
use crate::cli::RenderArgs;
use crate::error::{PromptlabError, Result};
use crate::events::{Event, EventAction, append_event};
use crate::execution::{Dispatcher, ExecutionResponse, OpenAiClient};
use crate::locks::acquire_run_lock;
use crate::store::FileStore;
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};

/// Execute the `promptlab run` command.
pub async fn cmd_run(args: RenderArgs) -> Result<()> {
    let store = open_store()?;
    let config = load_config(&store)?;

    let settings = config.execution.resolve()?;
    let client = OpenAiClient::from_config(&settings)?;
    let dispatcher = Dispatcher::new(Arc::new(client));

    let response = run_with_client(&store, &args, &dispatcher).await?;
    println!("{}", response.text);
    Ok(())
}

/// Render `args` and send the result through `dispatcher`.
///
/// The outcome is recorded as a `run` or `run_failed` event. Releasing the
/// run lock and logging the event are best-effort; the response (or error)
/// is returned either way.
pub(super) async fn run_with_client(
    store: &FileStore,
    args: &RenderArgs,
    dispatcher: &Dispatcher,
) -> Result<ExecutionResponse> {
    let rendered = render_prompt(store, args)?;
    warn_unfilled(&rendered.unfilled);

    let prompt_id = rendered.source.prompt.id().to_string();
    let lock = acquire_run_lock(store.context(), &prompt_id)?;

    eprintln!("Running {} ({})...", prompt_id, rendered.source.label);
    let result = dispatcher
        .dispatch(&prompt_id, rendered.text.clone())
        .await
        .map_err(PromptlabError::from);

    let lock_path = lock.path().to_path_buf();
    if let Err(e) = lock.release() {
        warn!(path = %lock_path.display(), error = %e, "run lock already gone");
    }

    record_run(store, &rendered, &result);
    result
}

fn record_run(store: &FileStore, rendered: &RenderedPrompt, result: &Result<ExecutionResponse>) {
    let prompt_id = rendered.source.prompt.id();
    let event = match result {
        Ok(response) => {
            info!(prompt = %prompt_id, text_len = response.text.len(), "run succeeded");
            Event::new(EventAction::Run).with_details(json!({
                "version": rendered.source.label,
                "unfilled": rendered.unfilled,
                "response_chars": response.text.chars().count(),
            }))
        }
        Err(e) => {
            warn!(prompt = %prompt_id, error = %e, "run failed");
            Event::new(EventAction::RunFailed).with_details(json!({
                "version": rendered.source.label,
                "error": e.to_string(),
            }))
        }
    };

    if let Err(e) = append_event(store.context(), &event.with_prompt(prompt_id)) {
        eprintln!("Warning: failed to log run event: {}", e);
    }
}
