//! Terminal implementations of the widget's host capabilities.

use std::cell::RefCell;
use std::collections::HashMap;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use letsgo_snippet::{
    stays_within, Blob, ClipboardError, ClipboardWriter, FileSaver, ObjectUrl, SaveError,
    SizeObserver,
};
use tempfile::NamedTempFile;

// ============================================================================
// Clipboard
// ============================================================================

/// Clipboard tools in preference order, with the args that make them read stdin.
const CLIPBOARD_TOOLS: &[(&str, &[&str])] = &[
    ("wl-copy", &[]),
    ("xclip", &["-selection", "clipboard"]),
    ("xsel", &["--clipboard", "--input"]),
    ("pbcopy", &[]),
    ("clip", &[]),
];

/// Writes to the system clipboard by piping into a platform tool.
pub struct SystemClipboard {
    program: PathBuf,
    args: &'static [&'static str],
}

impl SystemClipboard {
    /// First clipboard tool found on PATH.
    pub fn detect() -> Option<Self> {
        CLIPBOARD_TOOLS.iter().find_map(|(name, args)| {
            which::which(name).ok().map(|program| {
                log::debug!("using clipboard tool {}", program.display());
                Self { program, args }
            })
        })
    }
}

impl ClipboardWriter for SystemClipboard {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        let mut child = Command::new(&self.program)
            .args(self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| ClipboardError(format!("{}: {}", self.program.display(), e)))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(text.as_bytes())
                .map_err(|e| ClipboardError(e.to_string()))?;
        }

        let output = child
            .wait_with_output()
            .map_err(|e| ClipboardError(e.to_string()))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ClipboardError(format!(
                "{} exited with {}: {}",
                self.program.display(),
                output.status,
                stderr.trim()
            )));
        }
        Ok(())
    }
}

/// Stand-in for commands that never copy.
pub struct NoClipboard;

impl ClipboardWriter for NoClipboard {
    fn write_text(&self, _text: &str) -> Result<(), ClipboardError> {
        Err(ClipboardError("no clipboard tool available".into()))
    }
}

// ============================================================================
// Downloads
// ============================================================================

/// Saves downloads into a directory.
///
/// The "object URL" is a staged temp file in the target directory. Triggering
/// copies it to its final name; revoking deletes the staged file.
pub struct DirectorySaver {
    dir: PathBuf,
    staged: RefCell<HashMap<String, NamedTempFile>>,
}

impl DirectorySaver {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into(), staged: RefCell::new(HashMap::new()) }
    }

    /// Number of staged files not yet revoked.
    pub fn staged_count(&self) -> usize {
        self.staged.borrow().len()
    }
}

impl FileSaver for DirectorySaver {
    fn create_object_url(&self, blob: Blob) -> Result<ObjectUrl, SaveError> {
        let mut file = tempfile::Builder::new()
            .prefix(".letsgo-download-")
            .tempfile_in(&self.dir)
            .map_err(|e| SaveError::Stage(format!("{}: {}", self.dir.display(), e)))?;
        file.write_all(&blob.data)
            .and_then(|_| file.flush())
            .map_err(|e| SaveError::Stage(e.to_string()))?;

        let url = ObjectUrl(format!("file://{}", file.path().display()));
        log::debug!("staged {} ({})", url.as_str(), blob.mime);
        self.staged.borrow_mut().insert(url.0.clone(), file);
        Ok(url)
    }

    fn trigger_download(&self, url: &ObjectUrl, file_name: &str) -> Result<(), SaveError> {
        if !stays_within(file_name) {
            return Err(SaveError::Trigger {
                file_name: file_name.to_string(),
                message: format!("file name leaves {}", self.dir.display()),
            });
        }

        let staged = self.staged.borrow();
        let file = staged.get(url.as_str()).ok_or_else(|| SaveError::Trigger {
            file_name: file_name.to_string(),
            message: format!("unknown object URL {}", url.as_str()),
        })?;

        let target = self.dir.join(file_name);
        std::fs::copy(file.path(), &target).map_err(|e| SaveError::Trigger {
            file_name: file_name.to_string(),
            message: format!("{}: {}", target.display(), e),
        })?;
        Ok(())
    }

    fn revoke_object_url(&self, url: &ObjectUrl) {
        if self.staged.borrow_mut().remove(url.as_str()).is_none() {
            log::debug!("revoke of unknown object URL {}", url.as_str());
        }
    }
}

// ============================================================================
// Layout
// ============================================================================

/// Sizes the code area to its line count, in terminal rows.
#[derive(Debug, Default)]
pub struct TerminalSurface {
    rows: Option<u32>,
    connected: bool,
}

impl TerminalSurface {
    pub fn new() -> Self {
        Self { rows: None, connected: true }
    }
}

impl SizeObserver for TerminalSurface {
    fn measure(&self, content: &str) -> Option<u32> {
        if !self.connected {
            return None;
        }
        Some(content.lines().count().max(1) as u32)
    }

    fn apply_height(&mut self, height: u32) {
        self.rows = Some(height);
    }

    fn disconnect(&mut self) {
        self.connected = false;
    }
}
