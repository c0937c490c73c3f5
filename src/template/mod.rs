//! Placeholder engine for prompt templates.
//!
//! Templates mark variable parts with square brackets:
//!
//! ```text
//! Create a short story about [character] who discovers [item].
//! ```
//!
//! # Syntax
//!
//! A placeholder is any text matching `\[[^\]]+\]`. The name is the text
//! strictly between the brackets, kept verbatim (inner whitespace included).
//! There is no escaping, no nesting and no default-value syntax. An unmatched
//! `[` or `]` is plain text.
//!
//! # Error Handling
//!
//! Nothing here fails. A placeholder without a value is a normal state: it
//! stays in the rendered output as literal `[name]` and [`is_complete`]
//! reports `false` so the caller can warn before sending the prompt anywhere.

use crate::error::{PromptlabError, Result};
use regex::{Captures, Regex};
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

#[cfg(test)]
mod tests;

/// Regex for a single placeholder occurrence; group 1 is the name.
static PLACEHOLDER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]").expect("Invalid placeholder regex"));

/// Values supplied for a template's placeholders.
///
/// Keys may be a subset or a superset of the template's placeholder names.
/// A key that is absent and a key bound to the empty string mean the same
/// thing: the placeholder is unfilled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bindings {
    values: HashMap<String, String>,
}

impl Bindings {
    /// Create an empty set of bindings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build bindings from key-value pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Parse `name=value` assignments as given on the command line.
    ///
    /// The split happens at the first `=`, so values may contain `=`.
    /// Names are taken verbatim, matching placeholder names exactly.
    pub fn parse_assignments<S: AsRef<str>>(assignments: &[S]) -> Result<Self> {
        let mut bindings = Self::new();
        for raw in assignments {
            let raw = raw.as_ref();
            let (name, value) = raw.split_once('=').ok_or_else(|| {
                PromptlabError::UserError(format!(
                    "invalid variable assignment '{}': expected NAME=VALUE",
                    raw
                ))
            })?;
            if name.is_empty() {
                return Err(PromptlabError::UserError(format!(
                    "invalid variable assignment '{}': name must not be empty",
                    raw
                )));
            }
            bindings.insert(name, value);
        }
        Ok(bindings)
    }

    /// Bind `name` to `value`, replacing any previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    /// Value for `name`, or `None` when absent or empty.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// Placeholders from `placeholders` that have no usable value.
    pub fn missing(&self, placeholders: &[String]) -> Vec<String> {
        placeholders
            .iter()
            .filter(|name| self.get(name).is_none())
            .cloned()
            .collect()
    }

    /// Number of keys, filled or not.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Bindings
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from_pairs(iter)
    }
}

/// Extract the distinct placeholder names from a template.
///
/// Names are returned in order of first appearance. Repeated placeholders
/// collapse to one entry.
///
/// # Examples
///
/// ```text
/// extract_placeholders("Hi [name], [name] found [item]") == ["name", "item"]
/// ```
pub fn extract_placeholders(template: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut names = Vec::new();

    for caps in PLACEHOLDER_REGEX.captures_iter(template) {
        let name = &caps[1];
        if seen.insert(name.to_string()) {
            names.push(name.to_string());
        }
    }

    names
}

/// Render a template by substituting bound placeholders.
///
/// Every `[name]` whose binding is present and non-empty is replaced by the
/// value; every other occurrence is left untouched. All occurrences of the
/// same name are replaced. Values are inserted as-is and never re-scanned, so
/// a value that itself looks like `[x]` survives into the output.
pub fn render(template: &str, bindings: &Bindings) -> String {
    PLACEHOLDER_REGEX
        .replace_all(template, |caps: &Captures| match bindings.get(&caps[1]) {
            Some(value) => value.to_string(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

/// Whether `rendered` is free of placeholder-shaped text.
///
/// This looks at the text only. A value the user typed that happens to look
/// like `[text]` makes this return `false`.
pub fn is_complete(rendered: &str) -> bool {
    !PLACEHOLDER_REGEX.is_match(rendered)
}

/// Placeholders still present in a rendered string.
pub fn unfilled(rendered: &str) -> Vec<String> {
    extract_placeholders(rendered)
}
