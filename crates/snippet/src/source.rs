//! Initial buffer content: inline literals and static file references.

use std::path::{Component, Path, PathBuf};

use letsgo_config::manifest::ContentSpec;

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("failed to read {reference}: {source}")]
    Io {
        reference: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{0} points outside the static directory")]
    OutsideRoot(String),
}

/// Resolves a file reference to its raw text.
pub trait SourceResolver {
    fn resolve(&self, reference: &str) -> Result<String, SourceError>;
}

/// Resolves references relative to a static content directory.
#[derive(Debug, Clone)]
pub struct StaticDir {
    root: PathBuf,
}

impl StaticDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl SourceResolver for StaticDir {
    fn resolve(&self, reference: &str) -> Result<String, SourceError> {
        if !stays_within(reference) {
            return Err(SourceError::OutsideRoot(reference.to_string()));
        }

        std::fs::read_to_string(self.root.join(reference)).map_err(|source| SourceError::Io {
            reference: reference.to_string(),
            source,
        })
    }
}

/// True when `relative`, joined onto any directory, stays inside it:
/// no `..`, no root, no drive prefix.
pub fn stays_within(relative: &str) -> bool {
    !Path::new(relative).components().any(|c| {
        matches!(c, Component::ParentDir | Component::RootDir | Component::Prefix(_))
    })
}

/// Placeholder shown in place of content that could not be loaded.
pub fn load_failure_placeholder(reference: &str) -> String {
    format!("Error loading {}.", reference)
}

/// Compute a widget's initial buffer. Inline literals are taken verbatim; a
/// file reference that fails to resolve yields [`load_failure_placeholder`].
pub fn initial_code(content: &ContentSpec, resolver: &dyn SourceResolver) -> String {
    match content {
        ContentSpec::Inline(code) => code.clone(),
        ContentSpec::File(reference) => match resolver.resolve(reference) {
            Ok(text) => text,
            Err(e) => {
                log::error!("Failed to load snippet source {}: {}", reference, e);
                load_failure_placeholder(reference)
            }
        },
    }
}
