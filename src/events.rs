//! Audit event log for promptlab.
//!
//! Every state-changing command appends one JSON line to
//! `.promptlab/events.ndjson`:
//!
//! - `ts`: RFC3339 timestamp
//! - `action`: what happened (`init`, `create`, `update`, `publish`, ...)
//! - `actor`: `user@HOST`
//! - `prompt`: prompt id, for prompt-specific events
//! - `details`: freeform object
//!
//! Events are appended while the store lock is held so the log and the prompt
//! files move together. `run` events are the exception: they are written after
//! the run lock is released.

use crate::context::StoreContext;
use crate::error::{PromptlabError, Result};
use crate::fs::append_json_line;
use crate::locks::owner_string;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventAction {
    /// Store initialized.
    Init,
    /// Prompt created (with its first version).
    Create,
    /// Prompt metadata or live content changed.
    Update,
    /// New version appended.
    Publish,
    /// Rendered prompt executed successfully.
    Run,
    /// Execution failed; the error message is in `details`.
    RunFailed,
    /// Lock removed by hand.
    LockClear,
}

impl fmt::Display for EventAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EventAction::Init => "init",
            EventAction::Create => "create",
            EventAction::Update => "update",
            EventAction::Publish => "publish",
            EventAction::Run => "run",
            EventAction::RunFailed => "run_failed",
            EventAction::LockClear => "lock_clear",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub ts: DateTime<Utc>,

    pub action: EventAction,

    pub actor: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,

    pub details: Value,
}

impl Event {
    /// New event stamped with the current time and actor.
    pub fn new(action: EventAction) -> Self {
        Self {
            ts: Utc::now(),
            action,
            actor: owner_string(),
            prompt: None,
            details: Value::Object(serde_json::Map::new()),
        }
    }

    pub fn with_prompt(mut self, prompt_id: impl Into<String>) -> Self {
        self.prompt = Some(prompt_id.into());
        self
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = details;
        self
    }

    /// Serialize to a single JSON line.
    pub fn to_ndjson_line(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| {
            PromptlabError::StoreError(format!("failed to serialize event to JSON: {}", e))
        })
    }
}

/// Append an event to the store's log, creating the file if needed.
pub fn append_event(ctx: &StoreContext, event: &Event) -> Result<()> {
    append_json_line(ctx.events_file(), event)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::read_json_lines;
    use serde_json::json;
    use tempfile::TempDir;

    fn create_test_store() -> (TempDir, StoreContext) {
        let temp_dir = TempDir::new().unwrap();
        let ctx = StoreContext::at(temp_dir.path().join(".promptlab"));
        (temp_dir, ctx)
    }

    #[test]
    fn test_event_creation() {
        let event = Event::new(EventAction::Init);

        assert_eq!(event.action, EventAction::Init);
        assert!(event.actor.contains('@'));
        assert!(event.prompt.is_none());
        assert!(Utc::now().signed_duration_since(event.ts).num_minutes() < 1);
    }

    #[test]
    fn test_event_builder() {
        let event = Event::new(EventAction::Publish)
            .with_prompt("PROMPT-001")
            .with_details(json!({"version": "v2", "notes": "tighter wording"}));

        assert_eq!(event.prompt.as_deref(), Some("PROMPT-001"));
        assert_eq!(event.details["version"], "v2");
    }

    #[test]
    fn test_event_is_single_line_snake_case() {
        let event = Event::new(EventAction::RunFailed)
            .with_prompt("PROMPT-002")
            .with_details(json!({"error": "line one\nline two"}));

        let line = event.to_ndjson_line().unwrap();
        assert!(!line.contains('\n'));
        assert!(line.contains("\"run_failed\""));
    }

    #[test]
    fn test_event_without_prompt_omits_field() {
        let line = Event::new(EventAction::Init).to_ndjson_line().unwrap();
        let parsed: Value = serde_json::from_str(&line).unwrap();
        assert!(parsed.get("prompt").is_none());
    }

    #[test]
    fn test_append_event_creates_and_appends() {
        let (_temp_dir, ctx) = create_test_store();
        assert!(!ctx.events_file().exists());

        append_event(&ctx, &Event::new(EventAction::Init)).unwrap();
        append_event(
            &ctx,
            &Event::new(EventAction::Create).with_prompt("PROMPT-001"),
        )
        .unwrap();

        let content = std::fs::read_to_string(ctx.events_file()).unwrap();
        assert!(content.ends_with('\n'));

        let events: Vec<Event> = read_json_lines(ctx.events_file()).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].action, EventAction::Init);
        assert_eq!(events[1].action, EventAction::Create);
        assert_eq!(events[1].prompt.as_deref(), Some("PROMPT-001"));
    }

    #[test]
    fn test_event_action_display_matches_serde() {
        let actions = [
            EventAction::Init,
            EventAction::Create,
            EventAction::Update,
            EventAction::Publish,
            EventAction::Run,
            EventAction::RunFailed,
            EventAction::LockClear,
        ];
        for action in actions {
            let json = serde_json::to_string(&action).unwrap();
            assert_eq!(json, format!("\"{}\"", action));
        }
    }
}
