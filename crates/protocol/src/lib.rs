//! Remote Execution Protocol - Frozen Wire Format
//!
//! This crate defines the request/response types exchanged with the remote
//! execution endpoint. The wire format is a single JSON object per HTTP body.
//!
//! ```text
//! POST <endpoint>
//! Request:        { "code": "<source>" }
//! Response (2xx): { "output": "<string>" } | { "error": "<string>" }
//! Response (else): arbitrary text, surfaced verbatim
//! ```
//!
//! Changes to these shapes require new golden vectors in `tests/golden/`.
//!
//! # Usage
//!
//! ```ignore
//! use letsgo_protocol::{RunRequest, RunReply};
//!
//! let body = serde_json::to_string(&RunRequest::new(code))?;
//! let reply: RunReply = serde_json::from_str(&text)?;
//! ```

use serde::{Deserialize, Serialize};

/// MIME type of request bodies.
pub const CONTENT_TYPE: &str = "application/json";

// =============================================================================
// Client → Endpoint
// =============================================================================

/// Body of a run request: the snapshot of the snippet buffer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRequest {
    pub code: String,
}

impl RunRequest {
    pub fn new(code: impl Into<String>) -> Self {
        Self { code: code.into() }
    }
}

// =============================================================================
// Endpoint → Client
// =============================================================================

/// Body of a successful (2xx) response.
///
/// Exactly one field is expected. When `error` is present and non-empty it
/// wins over `output`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReply {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// What a 2xx reply means for the program that was run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyVerdict {
    /// Program ran; text is its output (possibly empty).
    Output(String),
    /// Program failed to build or run; text is the reported error.
    ProgramError(String),
}

impl RunReply {
    pub fn output(text: impl Into<String>) -> Self {
        Self { output: Some(text.into()), error: None }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self { output: None, error: Some(text.into()) }
    }

    /// Collapse the reply into exactly one displayable value.
    pub fn into_verdict(self) -> ReplyVerdict {
        match self.error {
            Some(err) if !err.is_empty() => ReplyVerdict::ProgramError(err),
            _ => ReplyVerdict::Output(self.output.unwrap_or_default()),
        }
    }
}
