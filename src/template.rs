//! Resource templates with `<token>` placeholders.
//!
//! Rendering is textual and knows nothing about the document format. It is
//! a single left-to-right pass over the template: each placeholder is looked
//! up once and the substituted text is never scanned again, so a value that
//! happens to look like another placeholder is emitted as-is. Values may not
//! contain `<` or `>`.
//!
//! The caller names the reserved tokens. A reserved placeholder without a
//! value is an error. Any other `<word>` without a value is ordinary template
//! text (markup in a field default, say) and is emitted unchanged.

use regex::{Captures, Regex};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use thiserror::Error;

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<([A-Za-z_][A-Za-z0-9_]*)>").expect("placeholder pattern is valid")
});

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("could not read template {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("'{0}' is not a valid token name")]
    InvalidTokenName(String),

    #[error("value for <{token}> contains '<' or '>': {value}")]
    InvalidValue { token: String, value: String },

    #[error("template {template} has unresolved placeholders: {}", format_tokens(.tokens))]
    Unresolved {
        template: String,
        tokens: Vec<String>,
    },
}

fn format_tokens(tokens: &[String]) -> String {
    tokens
        .iter()
        .map(|t| format!("<{t}>"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Token name to substitution value.
///
/// Names are stored without the angle brackets: `search_index_name`
/// fills `<search_index_name>`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tokens {
    values: BTreeMap<String, String>,
}

impl Tokens {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: &str, value: impl Into<String>) -> Self {
        self.values.insert(name.to_string(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Check every name is a valid placeholder identifier and no value
    /// contains a placeholder delimiter.
    pub fn validate(&self) -> Result<(), TemplateError> {
        for (name, value) in &self.values {
            let wrapped = format!("<{name}>");
            if !PLACEHOLDER
                .find(&wrapped)
                .is_some_and(|m| m.as_str() == wrapped)
            {
                return Err(TemplateError::InvalidTokenName(name.clone()));
            }
            if value.contains(['<', '>']) {
                return Err(TemplateError::InvalidValue {
                    token: name.clone(),
                    value: value.clone(),
                });
            }
        }
        Ok(())
    }
}

/// A template loaded from disk (or built in memory).
#[derive(Debug, Clone)]
pub struct Template {
    /// Display name, usually the file path.
    name: String,
    text: String,
}

impl Template {
    pub fn load(path: &Path) -> Result<Self, TemplateError> {
        let text = fs::read_to_string(path).map_err(|source| TemplateError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self {
            name: path.display().to_string(),
            text,
        })
    }

    pub fn from_text(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Placeholder names used by this template.
    pub fn placeholders(&self) -> BTreeSet<String> {
        PLACEHOLDER
            .captures_iter(&self.text)
            .map(|c| c[1].to_string())
            .collect()
    }

    /// Substitute every placeholder that has a value.
    ///
    /// Placeholders named in `reserved` must have one. Tokens the template
    /// does not use are ignored.
    pub fn render(&self, tokens: &Tokens, reserved: &[&str]) -> Result<String, TemplateError> {
        tokens.validate()?;

        let mut missing = BTreeSet::new();
        let rendered = PLACEHOLDER.replace_all(&self.text, |caps: &Captures| {
            match tokens.get(&caps[1]) {
                Some(value) => value.to_string(),
                None => {
                    if reserved.contains(&&caps[1]) {
                        missing.insert(caps[1].to_string());
                    }
                    caps[0].to_string()
                }
            }
        });

        if !missing.is_empty() {
            return Err(TemplateError::Unresolved {
                template: self.name.clone(),
                tokens: missing.into_iter().collect(),
            });
        }

        Ok(rendered.into_owned())
    }
}
