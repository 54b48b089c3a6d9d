//! Placeholder substitution for the product page template.
//!
//! `{{key}}` inserts the HTML-escaped value, `{{{key}}}` inserts it raw.
//! Keys missing from the variable set render as an empty string.

use crate::render::escape_html;
use crate::utils::error::{GeneratorError, Result};
use regex::{Captures, Regex};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::OnceLock;

fn placeholder_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\{\{\{\s*([A-Za-z0-9_]+)\s*\}\}\}|\{\{\s*([A-Za-z0-9_]+)\s*\}\}")
            .expect("static regex")
    })
}

#[derive(Debug, Clone, Default)]
pub struct TemplateVars {
    values: BTreeMap<String, String>,
}

impl TemplateVars {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) -> &mut Self {
        self.values.insert(key.to_string(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }
}

#[derive(Debug, Clone)]
pub struct Template {
    source: String,
}

impl Template {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    pub async fn load(path: &Path) -> Result<Self> {
        match tokio::fs::read_to_string(path).await {
            Ok(source) => Ok(Self::new(source)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(GeneratorError::TemplateNotFound {
                    path: path.display().to_string(),
                })
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn placeholders(&self) -> BTreeSet<String> {
        placeholder_re()
            .captures_iter(&self.source)
            .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)))
            .map(|m| m.as_str().to_string())
            .collect()
    }

    /// Placeholders the template uses that `vars` does not provide.
    pub fn unknown_keys(&self, vars: &TemplateVars) -> Vec<String> {
        self.placeholders()
            .into_iter()
            .filter(|key| !vars.contains(key))
            .collect()
    }

    pub fn render(&self, vars: &TemplateVars) -> String {
        placeholder_re()
            .replace_all(&self.source, |caps: &Captures| {
                if let Some(raw) = caps.get(1) {
                    vars.get(raw.as_str()).unwrap_or_default().to_string()
                } else {
                    let key = caps.get(2).map(|m| m.as_str()).unwrap_or_default();
                    escape_html(vars.get(key).unwrap_or_default())
                }
            })
            .into_owned()
    }
}
