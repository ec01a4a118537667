// Per-snippet options, fixed when a widget is constructed

use serde::{Deserialize, Serialize};

/// File name offered for downloads when a snippet does not name one.
pub const DEFAULT_FILE_NAME: &str = "main.go";

/// Immutable per-instance settings of a snippet widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnippetOptions {
    /// Display / download file name
    pub file_name: String,
    /// Whether the Run control is exposed
    pub allow_execute: bool,
    /// Whether the Edit toggle is exposed
    pub allow_edit: bool,
}

impl Default for SnippetOptions {
    fn default() -> Self {
        Self {
            file_name: DEFAULT_FILE_NAME.to_string(),
            allow_execute: true,
            allow_edit: true,
        }
    }
}

impl SnippetOptions {
    pub fn with_file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = name.into();
        self
    }

    pub fn with_execute(mut self, allow: bool) -> Self {
        self.allow_execute = allow;
        self
    }

    pub fn with_edit(mut self, allow: bool) -> Self {
        self.allow_edit = allow;
        self
    }
}
