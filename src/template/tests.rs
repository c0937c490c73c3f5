//! Tests for placeholder extraction and rendering.

use super::*;

/// Templates used by the property-style checks below.
const CORPUS: &[&str] = &[
    "",
    "Just plain text",
    "Hello [name], you found a [item].",
    "Create a short story about [character] who discovers [item] and how it changes their life.",
    "[a][b][a]",
    "[ spaced name ] and [spaced name]",
    "unmatched [open and close] then [dangling",
    "stray ] bracket [x]",
    "[]empty[] and [ok]",
    "multi\nline [first]\n[second]\n",
    "unicode [名前] and [emoji 🎉]",
    "outer [a [b] c]",
];

fn complete_bindings(template: &str) -> Bindings {
    extract_placeholders(template)
        .into_iter()
        .enumerate()
        .map(|(i, name)| (name, format!("value{}", i)))
        .collect()
}

#[test]
fn test_extract_in_order_of_first_appearance() {
    let names = extract_placeholders("Hi [name], [name] found [item] near [place]");
    assert_eq!(names, vec!["name", "item", "place"]);
}

#[test]
fn test_extract_empty_template() {
    assert!(extract_placeholders("").is_empty());
}

#[test]
fn test_extract_keeps_whitespace_verbatim() {
    let names = extract_placeholders("[ first name ] [first name]");
    assert_eq!(names, vec![" first name ", "first name"]);
}

#[test]
fn test_extract_adjacent_duplicates_collapse() {
    assert_eq!(extract_placeholders("[a][a][b]"), vec!["a", "b"]);
}

#[test]
fn test_extract_ignores_malformed_brackets() {
    assert!(extract_placeholders("no [closing").is_empty());
    assert!(extract_placeholders("no opening]").is_empty());
    assert!(extract_placeholders("empty [] brackets").is_empty());
    assert_eq!(extract_placeholders("] [x] ["), vec!["x"]);
}

#[test]
fn test_extract_inner_open_bracket_is_part_of_name() {
    // `[^\]]+` admits `[`, so the match runs to the first `]`.
    assert_eq!(extract_placeholders("outer [a [b] c]"), vec!["a [b"]);
}

#[test]
fn test_render_partial_bindings_scenario() {
    let bindings = Bindings::from_pairs([("name", "Ada")]);
    let rendered = render("Hello [name], you found a [item].", &bindings);
    assert_eq!(rendered, "Hello Ada, you found a [item].");
    assert!(!is_complete(&rendered));
    assert_eq!(unfilled(&rendered), vec!["item"]);
}

#[test]
fn test_render_replaces_every_occurrence() {
    let bindings = Bindings::from_pairs([("x", "X")]);
    assert_eq!(render("[x]-[x]-[x]", &bindings), "X-X-X");
}

#[test]
fn test_render_empty_value_is_unfilled() {
    let bindings = Bindings::from_pairs([("name", "")]);
    assert_eq!(render("Hi [name]", &bindings), "Hi [name]");
}

#[test]
fn test_render_ignores_extra_bindings() {
    let bindings = Bindings::from_pairs([("name", "Ada"), ("unused", "zzz")]);
    assert_eq!(render("Hi [name]", &bindings), "Hi Ada");
}

#[test]
fn test_render_does_not_rescan_values() {
    let bindings = Bindings::from_pairs([("a", "[b]"), ("b", "B")]);
    let rendered = render("[a] and [b]", &bindings);
    assert_eq!(rendered, "[b] and B");
    // The literal `[b]` typed as a value is reported as unfilled.
    assert!(!is_complete(&rendered));
}

#[test]
fn test_render_name_must_match_exactly() {
    let bindings = Bindings::from_pairs([("name", "Ada")]);
    assert_eq!(render("[ name ] [Name]", &bindings), "[ name ] [Name]");
}

#[test]
fn test_render_values_with_regex_metacharacters() {
    let bindings = Bindings::from_pairs([("code", "$1 \\d+ (.*)"), ("a.b", "dot")]);
    assert_eq!(render("[code] [a.b] [aXb]", &bindings), "$1 \\d+ (.*) dot [aXb]");
}

#[test]
fn test_render_unicode() {
    let bindings = Bindings::from_pairs([("名前", "太郎")]);
    assert_eq!(render("こんにちは [名前]!", &bindings), "こんにちは 太郎!");
}

#[test]
fn test_is_complete() {
    assert!(is_complete(""));
    assert!(is_complete("no placeholders here"));
    assert!(is_complete("a lone [ bracket"));
    assert!(is_complete("[] is not a placeholder"));
    assert!(!is_complete("still [open]"));
}

#[test]
fn test_complete_bindings_yield_complete_output() {
    for template in CORPUS {
        let bindings = complete_bindings(template);
        let rendered = render(template, &bindings);
        assert!(
            is_complete(&rendered),
            "template {:?} rendered to {:?}",
            template,
            rendered
        );
    }
}

#[test]
fn test_empty_bindings_change_nothing() {
    let empty = Bindings::new();
    for template in CORPUS {
        let rendered = render(template, &empty);
        assert_eq!(&rendered, template);
        assert_eq!(
            extract_placeholders(&rendered),
            extract_placeholders(template)
        );
    }
}

#[test]
fn test_rerender_of_complete_output_is_identity() {
    for template in CORPUS {
        let rendered = render(template, &complete_bindings(template));
        let other = Bindings::from_pairs([("value0", "nope"), ("name", "again")]);
        assert_eq!(render(&rendered, &other), rendered);
    }
}

#[test]
fn test_bindings_get_treats_empty_as_missing() {
    let bindings = Bindings::from_pairs([("a", "1"), ("b", "")]);
    assert_eq!(bindings.get("a"), Some("1"));
    assert_eq!(bindings.get("b"), None);
    assert_eq!(bindings.get("c"), None);
    assert_eq!(bindings.len(), 2);
}

#[test]
fn test_bindings_missing_preserves_placeholder_order() {
    let bindings = Bindings::from_pairs([("item", "lamp"), ("place", "")]);
    let placeholders = extract_placeholders("[name] [item] [place]");
    assert_eq!(bindings.missing(&placeholders), vec!["name", "place"]);
}

#[test]
fn test_parse_assignments() {
    let bindings =
        Bindings::parse_assignments(&["name=Ada", "eq=a=b", "first name=Grace", "blank="])
            .unwrap();
    assert_eq!(bindings.get("name"), Some("Ada"));
    assert_eq!(bindings.get("eq"), Some("a=b"));
    assert_eq!(bindings.get("first name"), Some("Grace"));
    assert_eq!(bindings.get("blank"), None);
}

#[test]
fn test_parse_assignments_rejects_malformed() {
    assert!(Bindings::parse_assignments(&["novalue"]).is_err());
    assert!(Bindings::parse_assignments(&["=value"]).is_err());
}
