//! Tests for prompt parsing, serialization, and updates.

use super::*;
use chrono::{Duration, TimeZone};
use tempfile::TempDir;

const PROMPT_FILE: &str = "---
id: PROMPT-001
title: Product blurb
description: Marketing copy
tags:
- marketing
- short
created_at: 2026-01-13T10:00:00Z
updated_at: 2026-01-14T09:30:00Z
---
Write a description of [product] for [audience].
";

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 13, 10, 0, 0).unwrap()
}

fn sample() -> Prompt {
    Prompt::new(
        "PROMPT-001".to_string(),
        "  Greeting ",
        "",
        "Hello [name]",
        TagSet::from_iter(["a", "b"]),
        t0(),
    )
}

#[test]
fn test_parse_prompt_file() {
    let prompt = Prompt::parse(PROMPT_FILE).unwrap();

    assert_eq!(prompt.id(), "PROMPT-001");
    assert_eq!(prompt.title(), "Product blurb");
    assert_eq!(prompt.frontmatter.description, "Marketing copy");
    assert_eq!(
        prompt.frontmatter.tags.iter().collect::<Vec<_>>(),
        vec!["marketing", "short"]
    );
    assert_eq!(prompt.frontmatter.created_at, t0());
    assert_eq!(
        prompt.current_content,
        "Write a description of [product] for [audience].\n"
    );
}

#[test]
fn test_roundtrip_preserves_body_exactly() {
    let mut prompt = sample();
    prompt.current_content = "line one\n\n---\n  [indented]\nno trailing newline".to_string();

    let text = prompt.to_file_string().unwrap();
    let reparsed = Prompt::parse(&text).unwrap();

    assert_eq!(reparsed, prompt);
}

#[test]
fn test_roundtrip_preserves_unknown_fields() {
    let content = "---
id: PROMPT-002
title: T
created_at: 2026-01-13T10:00:00Z
updated_at: 2026-01-13T10:00:00Z
model_hint: gpt-4o
---
body";
    let prompt = Prompt::parse(content).unwrap();
    assert!(prompt.frontmatter.extra.contains_key("model_hint"));

    let text = prompt.to_file_string().unwrap();
    assert!(text.contains("model_hint: gpt-4o"));
}

#[test]
fn test_parse_crlf_delimiters() {
    let content = "---\r\nid: PROMPT-003\r\ntitle: T\r\ncreated_at: 2026-01-13T10:00:00Z\r\nupdated_at: 2026-01-13T10:00:00Z\r\n---\r\nHi [x]\r\n";
    let prompt = Prompt::parse(content).unwrap();

    assert_eq!(prompt.id(), "PROMPT-003");
    assert_eq!(prompt.current_content, "Hi [x]\r\n");
}

#[test]
fn test_parse_missing_delimiters() {
    assert!(Prompt::parse("id: PROMPT-001\n").is_err());
    assert!(Prompt::parse("---\nid: PROMPT-001\ntitle: x\n").is_err());
}

#[test]
fn test_serialize_skips_empty_fields() {
    let mut prompt = sample();
    prompt.frontmatter.tags = TagSet::new();

    let text = prompt.to_file_string().unwrap();
    assert!(!text.contains("description:"));
    assert!(!text.contains("tags:"));
    assert!(text.contains("title: Greeting\n"));
}

#[test]
fn test_apply_updates_fields() {
    let mut prompt = sample();
    let later = t0() + Duration::minutes(5);

    let update = PromptUpdate {
        title: Some("Welcome".to_string()),
        content: Some("Hi [name]!".to_string()),
        add_tags: vec!["c".to_string(), "a".to_string()],
        remove_tags: vec!["b".to_string()],
        ..Default::default()
    };

    assert!(prompt.apply(&update, later).unwrap());
    assert_eq!(prompt.title(), "Welcome");
    assert_eq!(prompt.current_content, "Hi [name]!");
    assert_eq!(prompt.frontmatter.tags.iter().collect::<Vec<_>>(), vec!["a", "c"]);
    assert_eq!(prompt.frontmatter.updated_at, later);
    assert_eq!(prompt.frontmatter.created_at, t0());
}

#[test]
fn test_apply_noop_keeps_timestamp() {
    let mut prompt = sample();
    let update = PromptUpdate {
        content: Some("Hello [name]".to_string()),
        remove_tags: vec!["missing".to_string()],
        ..Default::default()
    };

    assert!(!prompt.apply(&update, t0() + Duration::hours(1)).unwrap());
    assert_eq!(prompt.frontmatter.updated_at, t0());
}

#[test]
fn test_apply_rejects_blank_fields() {
    let mut prompt = sample();
    let before = prompt.clone();

    let update = PromptUpdate {
        title: Some("   ".to_string()),
        description: Some("new".to_string()),
        ..Default::default()
    };
    assert!(prompt.apply(&update, t0()).is_err());

    let update = PromptUpdate {
        content: Some("\n".to_string()),
        ..Default::default()
    };
    assert!(prompt.apply(&update, t0()).is_err());

    assert_eq!(prompt, before);
}

#[test]
fn test_save_and_load() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("prompts").join("PROMPT-001-greeting.md");

    let prompt = sample();
    prompt.save(&path).unwrap();

    assert_eq!(Prompt::load(&path).unwrap(), prompt);
}

#[test]
fn test_load_nonexistent_file() {
    let err = Prompt::load("/nonexistent/PROMPT-001-x.md").unwrap_err();
    assert!(matches!(err, PromptlabError::StoreError(_)));
}
