//! Render model: what a host draws for a widget.

use crate::highlight::Span;

pub const HEADER: &str = "Source (Go)";
pub const FALLBACK_TEXT: &str = "Loading interactive editor...";
pub const RESULT_HEADER: &str = "Result";
pub const LOADING_TEXT: &str = "Waiting...";

pub const RUN_LABEL: &str = "▶ Run";
pub const RUNNING_LABEL: &str = "▶ Running...";
pub const EDIT_LABEL: &str = "✎ Edit";
pub const DONE_LABEL: &str = "✓ Done";
pub const COPY_LABEL: &str = "⎘ Copy";
pub const COPIED_LABEL: &str = "✓ Copied!";
pub const DOWNLOAD_LABEL: &str = "⤓ Download";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnippetView {
    /// Shown until the widget is mounted
    Fallback(&'static str),
    Editor(EditorView),
}

impl SnippetView {
    pub fn editor(&self) -> Option<&EditorView> {
        match self {
            SnippetView::Editor(editor) => Some(editor),
            SnippetView::Fallback(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorView {
    pub header: &'static str,
    pub spans: Vec<Span>,
    pub read_only: bool,
    /// Height applied by the last resize pass
    pub height: Option<u32>,
    pub controls: Vec<Control>,
    pub result: Option<ResultPanel>,
}

impl EditorView {
    pub fn control(&self, pred: impl Fn(&Control) -> bool) -> Option<&Control> {
        self.controls.iter().find(|c| pred(c))
    }

    pub fn has_run_control(&self) -> bool {
        self.control(|c| matches!(c, Control::Run { .. })).is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Run { busy: bool },
    Edit { editing: bool },
    Copy { copied: bool },
    Download,
}

impl Control {
    pub fn label(&self) -> &'static str {
        match self {
            Control::Run { busy: false } => RUN_LABEL,
            Control::Run { busy: true } => RUNNING_LABEL,
            Control::Edit { editing: false } => EDIT_LABEL,
            Control::Edit { editing: true } => DONE_LABEL,
            Control::Copy { copied: false } => COPY_LABEL,
            Control::Copy { copied: true } => COPIED_LABEL,
            Control::Download => DOWNLOAD_LABEL,
        }
    }

    /// Run is disabled while a run is in flight.
    pub fn is_enabled(&self) -> bool {
        !matches!(self, Control::Run { busy: true })
    }
}

/// Result panel contents. Output and error are never shown together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultPanel {
    Loading,
    Output(String),
    Error(String),
}

impl ResultPanel {
    pub fn header(&self) -> &'static str {
        RESULT_HEADER
    }

    pub fn text(&self) -> &str {
        match self {
            ResultPanel::Loading => LOADING_TEXT,
            ResultPanel::Output(text) | ResultPanel::Error(text) => text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels() {
        assert_eq!(Control::Run { busy: true }.label(), "▶ Running...");
        assert!(!Control::Run { busy: true }.is_enabled());
        assert!(Control::Copy { copied: true }.is_enabled());
        assert_eq!(Control::Edit { editing: true }.label(), "✓ Done");
    }

    #[test]
    fn test_panel_text() {
        assert_eq!(ResultPanel::Loading.text(), "Waiting...");
        assert_eq!(ResultPanel::Error("boom".into()).text(), "boom");
    }
}
