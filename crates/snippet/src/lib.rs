//! Interactive code snippet widget.
//!
//! Owns an editable source buffer and three side-effecting actions: run the
//! buffer on a remote execution endpoint, copy it to the clipboard, and save
//! it as a file. Every environment-specific collaborator (clipboard, file
//! saving, size observation, highlighting, the endpoint itself) is injected
//! through the traits in [`capability`] and [`highlight`], so the widget runs
//! the same way in a browser shell, a terminal host, or a test.
//!
//! The widget is single-threaded. Suspending work is split into a `begin_*`
//! call that snapshots the buffer and a `finish_*` call that applies the
//! result, so a host event loop can interleave a run and a copy freely.

pub mod capability;
pub mod copy;
pub mod highlight;
pub mod layout;
pub mod run;
pub mod source;
pub mod view;
mod widget;

pub use capability::{
    Blob, ClipboardError, ClipboardWriter, CodeRunner, FileSaver, ObjectUrl, SaveError,
    SizeObserver,
};
pub use copy::{CopyFeedback, PendingCopy, COPY_FEEDBACK_WINDOW};
pub use highlight::{GoHighlighter, Highlighter, Span, TokenKind};
pub use run::{
    CompletedRun, FailureKind, PendingRun, RunFailure, RunOutcome, RunRejected, RunState,
    COMMUNICATION_PREFIX,
};
pub use source::{
    initial_code, load_failure_placeholder, stays_within, SourceError, SourceResolver, StaticDir,
};
pub use view::{Control, EditorView, ResultPanel, SnippetView};
pub use widget::{Capabilities, SnippetError, SnippetWidget};
