//! Environment capabilities the widget consumes but does not own.
//!
//! Each trait stands in for one browser-level service. Hosts provide real
//! implementations; tests provide recording fakes.

use letsgo_exec_client::{ExecClient, ExecError};
use letsgo_protocol::RunReply;

/// MIME type of downloaded snippet files.
pub const SNIPPET_MIME: &str = "text/plain;charset=utf-8";

/// Remote execution of a source snapshot.
///
/// Implementations block; the widget moves calls onto a blocking pool.
pub trait CodeRunner: Send + Sync {
    fn run(&self, code: &str) -> Result<RunReply, ExecError>;
}

impl CodeRunner for ExecClient {
    fn run(&self, code: &str) -> Result<RunReply, ExecError> {
        ExecClient::run(self, code)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("clipboard write failed: {0}")]
pub struct ClipboardError(pub String);

/// System clipboard (write-only). Blocking.
pub trait ClipboardWriter: Send + Sync {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}

#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error("failed to stage download: {0}")]
    Stage(String),
    #[error("failed to save {file_name}: {message}")]
    Trigger { file_name: String, message: String },
}

/// In-memory file contents handed to a [`FileSaver`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    pub data: Vec<u8>,
    pub mime: &'static str,
}

impl Blob {
    pub fn text(text: &str) -> Self {
        Self { data: text.as_bytes().to_vec(), mime: SNIPPET_MIME }
    }
}

/// Handle to a staged blob. Must be revoked once the download is triggered.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectUrl(pub String);

impl ObjectUrl {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// File download: stage a blob behind a URL, save it under a name, release the URL.
pub trait FileSaver {
    fn create_object_url(&self, blob: Blob) -> Result<ObjectUrl, SaveError>;
    fn trigger_download(&self, url: &ObjectUrl, file_name: &str) -> Result<(), SaveError>;
    fn revoke_object_url(&self, url: &ObjectUrl);
}

/// Revokes its URL when dropped, whichever way the download went.
pub(crate) struct ObjectUrlLease<'a> {
    saver: &'a dyn FileSaver,
    url: ObjectUrl,
}

impl<'a> ObjectUrlLease<'a> {
    pub(crate) fn acquire(saver: &'a dyn FileSaver, blob: Blob) -> Result<Self, SaveError> {
        let url = saver.create_object_url(blob)?;
        Ok(Self { saver, url })
    }

    pub(crate) fn url(&self) -> &ObjectUrl {
        &self.url
    }
}

impl Drop for ObjectUrlLease<'_> {
    fn drop(&mut self) {
        self.saver.revoke_object_url(&self.url);
    }
}

/// Measures and resizes the rendered code area.
pub trait SizeObserver {
    /// Intrinsic content height of the rendered code. `None` while the
    /// element is not laid out (zero height), in which case no resize happens.
    fn measure(&self, content: &str) -> Option<u32>;

    /// Resize the input surface to `height`.
    fn apply_height(&mut self, height: u32);

    /// Stop observing. Called once on unmount or when replaced.
    fn disconnect(&mut self);
}
