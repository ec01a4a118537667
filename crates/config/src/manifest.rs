// Snippet manifests: the props of one snippet, written as TOML
//
//   src = "code/mod2/structs.go"
//   file_name = "structs.go"
//   allow_execute = false

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::snippet::SnippetOptions;
use crate::ConfigError;

/// Where a snippet's initial content comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentSpec {
    /// Literal source text
    Inline(String),
    /// Reference to a static file, relative to the static directory
    File(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnippetManifest {
    /// Inline source literal
    #[serde(default)]
    pub code: Option<String>,
    /// Static file reference
    #[serde(default)]
    pub src: Option<String>,
    #[serde(flatten)]
    pub options: SnippetOptions,
}

impl SnippetManifest {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|e| ConfigError::Toml(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Content source. A file reference wins over an inline literal; with
    /// neither, the snippet starts empty.
    pub fn content(&self) -> ContentSpec {
        match (&self.src, &self.code) {
            (Some(src), _) => ContentSpec::File(src.clone()),
            (None, Some(code)) => ContentSpec::Inline(code.clone()),
            (None, None) => ContentSpec::Inline(String::new()),
        }
    }
}
