// src/render/templates.rs

//! Page templates and their source.
//!
//! Templates use `{{key}}` placeholders. Values are inserted verbatim, so
//! callers escape anything that is not already HTML.

use std::collections::HashMap;
use std::path::PathBuf;

use crate::error::{AppError, Result};

const BUNDLED: &[(&str, &str)] = &[
    ("index.html", include_str!("../../templates/index.html")),
    ("index_row.html", include_str!("../../templates/index_row.html")),
    ("repo.html", include_str!("../../templates/repo.html")),
    ("commit_row.html", include_str!("../../templates/commit_row.html")),
    ("style.css", include_str!("../../templates/style.css")),
];

/// Where page templates come from. Resolved once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    /// Templates compiled into the binary
    Bundled,
    /// Templates read from a directory
    Directory(PathBuf),
}

impl TemplateSource {
    /// Directory override if given, bundled set otherwise.
    pub fn from_dir(dir: Option<PathBuf>) -> Self {
        dir.map_or(Self::Bundled, Self::Directory)
    }

    /// Load the raw text of a template by file name.
    pub fn load(&self, name: &str) -> Result<String> {
        match self {
            Self::Bundled => BUNDLED
                .iter()
                .find(|(file, _)| *file == name)
                .map(|(_, text)| (*text).to_string())
                .ok_or_else(|| AppError::template(name, "no bundled template with this name")),
            Self::Directory(dir) => {
                let path = dir.join(name);
                log::debug!("Loading template from disk: {}", path.display());
                std::fs::read_to_string(&path)
                    .map_err(|e| AppError::template(name, format!("{}: {e}", path.display())))
            }
        }
    }
}

/// A parsed template with `{{key}}` placeholders.
#[derive(Debug, Clone)]
pub struct Template {
    name: String,
    text: String,
}

impl Template {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }

    /// Load a template from the given source.
    pub fn load(source: &TemplateSource, name: &str) -> Result<Self> {
        Ok(Self::new(name, source.load(name)?))
    }

    /// Substitute placeholders in a single pass.
    ///
    /// Inserted values are never rescanned. Unknown keys render empty.
    pub fn render(&self, values: &[(&str, String)]) -> String {
        let lookup: HashMap<&str, &str> = values.iter().map(|(k, v)| (*k, v.as_str())).collect();
        let mut out = String::with_capacity(self.text.len());
        let mut rest = self.text.as_str();

        while let Some(start) = rest.find("{{") {
            out.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            let Some(end) = after.find("}}") else {
                out.push_str(&rest[start..]);
                return out;
            };
            let key = after[..end].trim();
            match lookup.get(key) {
                Some(value) => out.push_str(value),
                None => log::debug!("Template {} has no value for '{}'", self.name, key),
            }
            rest = &after[end + 2..];
        }
        out.push_str(rest);
        out
    }

    /// Raw template text.
    pub fn text(&self) -> &str {
        &self.text
    }
}
