// src/core/template.rs

use crate::core::parameters;
use anyhow::{Result, anyhow};
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use serde_json::Value;
use std::collections::{BTreeSet, HashMap};

lazy_static! {
    static ref VARIABLE_RE: Regex =
        Regex::new(r"\{\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*\}\}").unwrap();
}

/// Checks that every `{{ variable }}` a script template references is
/// declared by the parameter context.
///
/// This must run, and succeed, strictly before the automaton starts
/// stepping: a half-executed build that dies on a missing variable is far
/// worse than a rejected submission. A context entry bound to the empty
/// string does not count as declared. Checking truthiness instead would be
/// wrong, because `false` is a valid value; the empty string is the one
/// value treated as absent.
pub fn check_sanity(template: &str, context: &HashMap<String, Value>) -> Result<()> {
    let undeclared: BTreeSet<&str> = VARIABLE_RE
        .captures_iter(template)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .filter(|name| !is_declared(context, name))
        .collect();

    if !undeclared.is_empty() {
        return Err(anyhow!(
            "Undeclared variables: {}",
            undeclared.into_iter().collect::<Vec<_>>().join(", ")
        ));
    }
    Ok(())
}

/// Renders a script template against the parameter context, substituting
/// every `{{ variable }}` token. Fails (before touching the script) if the
/// template references anything the context does not declare.
pub fn render_script(template: &str, context: &HashMap<String, Value>) -> Result<String> {
    check_sanity(template, context)?;

    let rendered = VARIABLE_RE.replace_all(template, |caps: &Captures<'_>| {
        let name = caps.get(1).map_or("", |m| m.as_str());
        context
            .get(name)
            .map(parameters::context_value_text)
            .unwrap_or_default()
    });
    Ok(rendered.into_owned())
}

fn is_declared(context: &HashMap<String, Value>, name: &str) -> bool {
    match context.get(name) {
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
        None => false,
    }
}

// MARK: --- UNIT TESTS ---
