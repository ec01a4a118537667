//! Execution endpoint HTTP client.
//!
//! Blocking reqwest client (no Tokio runtime required). Async callers move
//! calls onto a blocking pool themselves.

use letsgo_protocol::{RunReply, RunRequest, CONTENT_TYPE};

/// Execution endpoint client (blocking).
#[derive(Clone)]
pub struct ExecClient {
    http: reqwest::blocking::Client,
    endpoint: String,
}

/// Error type for execution requests.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExecError {
    /// Request never produced a response
    #[error("{0}")]
    Network(String),
    /// Endpoint answered with a non-success status
    #[error("API error ({0}): {1}")]
    Http(u16, String),
    /// Success status but the body is not a run reply
    #[error("invalid response body: {0}")]
    Parse(String),
    /// HTTP client could not be constructed
    #[error("failed to create HTTP client: {0}")]
    Client(String),
}

impl ExecError {
    /// True when the failure happened before a usable reply came back.
    pub fn is_communication(&self) -> bool {
        !matches!(self, ExecError::Http(..))
    }
}

impl ExecClient {
    /// Create a client for the given endpoint URL.
    ///
    /// No request timeout is configured: a run completes when the endpoint
    /// answers or the connection fails.
    pub fn new(endpoint: impl Into<String>) -> Result<Self, ExecError> {
        let http = reqwest::blocking::Client::builder()
            .user_agent(format!("letsgo-snippet/{}", env!("CARGO_PKG_VERSION")))
            .timeout(None::<std::time::Duration>)
            .build()
            .map_err(|e| ExecError::Client(e.to_string()))?;

        Ok(Self {
            http,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Submit source code and wait for the endpoint's reply.
    pub fn run(&self, code: &str) -> Result<RunReply, ExecError> {
        let request = RunRequest::new(code);
        log::debug!("POST {} ({} bytes of source)", self.endpoint, request.code.len());

        let response = self.http.post(&self.endpoint)
            .header(reqwest::header::CONTENT_TYPE, CONTENT_TYPE)
            .json(&request)
            .send()
            .map_err(|e| ExecError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            log::debug!("execution endpoint returned HTTP {}", status);
            let body = response.text()
                .map_err(|e| ExecError::Network(e.to_string()))?;
            return Err(ExecError::Http(status, body));
        }

        let body = response.text()
            .map_err(|e| ExecError::Network(e.to_string()))?;
        serde_json::from_str::<RunReply>(&body)
            .map_err(|e| ExecError::Parse(e.to_string()))
    }
}

impl std::fmt::Debug for ExecClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecClient")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}
