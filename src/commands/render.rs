//! Template commands: `vars` and `render`.

use super::{TemplateSource, load_template, open_store, print_placeholders};
use crate::cli::{RenderArgs, VarsArgs};
use crate::error::Result;
use crate::store::FileStore;
use crate::template::{Bindings, extract_placeholders, is_complete, render, unfilled};
use tracing::debug;

/// Execute the `promptlab vars` command.
pub fn cmd_vars(args: VarsArgs) -> Result<()> {
    let store = open_store()?;
    let source = load_template(&store, &args.prompt_id, args.version.as_deref())?;

    println!("{} ({}):", source.prompt.id(), source.label);
    print_placeholders(&extract_placeholders(&source.text));
    Ok(())
}

/// Execute the `promptlab render` command.
///
/// The rendered text goes to stdout; the unfilled-placeholder warning goes to
/// stderr so the output can be piped.
pub fn cmd_render(args: RenderArgs) -> Result<()> {
    let store = open_store()?;
    let rendered = render_prompt(&store, &args)?;

    warn_unfilled(&rendered.unfilled);
    println!("{}", rendered.text);
    Ok(())
}

/// A prompt with bindings applied.
#[derive(Debug, Clone)]
pub(super) struct RenderedPrompt {
    pub source: TemplateSource,
    pub text: String,

    /// Placeholder-shaped names left in `text`.
    pub unfilled: Vec<String>,
}

/// Load the requested template and apply the `--var` bindings.
pub(super) fn render_prompt(store: &FileStore, args: &RenderArgs) -> Result<RenderedPrompt> {
    let bindings = Bindings::parse_assignments(&args.vars)?;
    let source = load_template(store, &args.prompt_id, args.version.as_deref())?;

    let placeholders = extract_placeholders(&source.text);
    let unused: Vec<&str> = args
        .vars
        .iter()
        .filter_map(|raw| raw.split_once('=').map(|(name, _)| name))
        .filter(|name| !placeholders.iter().any(|p| p == name))
        .collect();
    if !unused.is_empty() {
        debug!(?unused, "render: bindings without a matching placeholder");
    }

    let text = render(&source.text, &bindings);
    let remaining = if is_complete(&text) {
        Vec::new()
    } else {
        unfilled(&text)
    };

    Ok(RenderedPrompt {
        source,
        text,
        unfilled: remaining,
    })
}

/// Tell the user which placeholders are still unfilled.
pub(super) fn warn_unfilled(names: &[String]) {
    if names.is_empty() {
        return;
    }
    let list: Vec<String> = names.iter().map(|n| format!("[{}]", n)).collect();
    eprintln!("Warning: unfilled placeholders: {}", list.join(", "));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PromptlabError;
    use crate::store::PromptStore;
    use crate::test_support::{add_prompt, create_test_store};

    fn render_args(id: &str, vars: &[&str], version: Option<&str>) -> RenderArgs {
        RenderArgs {
            prompt_id: id.to_string(),
            vars: vars.iter().map(|v| v.to_string()).collect(),
            version: version.map(str::to_string),
        }
    }

    #[test]
    fn test_render_fills_all_bindings() {
        let (_temp_dir, store) = create_test_store();
        let id = add_prompt(&store, "Greeting", "Hi [name], [name] likes [food].");

        let rendered =
            render_prompt(&store, &render_args(&id, &["name=Ada", "food=tea"], None)).unwrap();

        assert_eq!(rendered.text, "Hi Ada, Ada likes tea.");
        assert!(rendered.unfilled.is_empty());
        assert_eq!(rendered.source.label, "current");
    }

    #[test]
    fn test_render_reports_unfilled_and_empty_values() {
        let (_temp_dir, store) = create_test_store();
        let id = add_prompt(&store, "Greeting", "Hi [name] from [place]");

        let rendered = render_prompt(&store, &render_args(&id, &["place="], None)).unwrap();

        assert_eq!(rendered.text, "Hi [name] from [place]");
        assert_eq!(rendered.unfilled, vec!["name", "place"]);
    }

    #[test]
    fn test_render_value_shaped_like_placeholder_is_flagged() {
        let (_temp_dir, store) = create_test_store();
        let id = add_prompt(&store, "Echo", "Say [word]");

        let rendered = render_prompt(&store, &render_args(&id, &["word=[x]"], None)).unwrap();

        assert_eq!(rendered.text, "Say [x]");
        assert_eq!(rendered.unfilled, vec!["x"]);
    }

    #[test]
    fn test_render_stored_version() {
        let (_temp_dir, store) = create_test_store();
        let id = add_prompt(&store, "Greeting", "Hello [name]");
        store.append_version(&id, "Bye [name]", "").unwrap();

        let rendered = render_prompt(&store, &render_args(&id, &["name=Bo"], Some("v1"))).unwrap();
        assert_eq!(rendered.text, "Hello Bo");
        assert_eq!(rendered.source.label, "v1");
    }

    #[test]
    fn test_render_rejects_malformed_assignment() {
        let (_temp_dir, store) = create_test_store();
        let id = add_prompt(&store, "Greeting", "Hello [name]");

        let err = render_prompt(&store, &render_args(&id, &["name"], None)).unwrap_err();
        assert!(matches!(err, PromptlabError::UserError(_)));
    }
}
