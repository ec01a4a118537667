//! Run lifecycle: Idle → Running → Succeeded | Failed.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Weak};

use letsgo_exec_client::ExecError;
use letsgo_protocol::{ReplyVerdict, RunReply, RunRequest};

use crate::capability::CodeRunner;

/// Prefix that marks a failure to reach the endpoint, as opposed to a
/// program that ran and failed.
pub const COMMUNICATION_PREFIX: &str = "Failed to communicate with the execution environment: ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Running,
    Succeeded(String),
    Failed(RunFailure),
}

impl RunState {
    pub fn is_running(&self) -> bool {
        matches!(self, RunState::Running)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// No usable reply: transport failure or undecodable body
    Communication,
    /// Endpoint answered with a non-success status
    Api,
    /// Endpoint ran the program and reported its error
    Program,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunFailure {
    pub kind: FailureKind,
    pub message: String,
}

/// Terminal result of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Succeeded(String),
    Failed(RunFailure),
}

impl RunOutcome {
    fn failed(kind: FailureKind, message: String) -> Self {
        RunOutcome::Failed(RunFailure { kind, message })
    }

    fn communication(detail: impl std::fmt::Display) -> Self {
        Self::failed(FailureKind::Communication, format!("{}{}", COMMUNICATION_PREFIX, detail))
    }

    pub fn into_state(self) -> RunState {
        match self {
            RunOutcome::Succeeded(output) => RunState::Succeeded(output),
            RunOutcome::Failed(failure) => RunState::Failed(failure),
        }
    }
}

impl From<Result<RunReply, ExecError>> for RunOutcome {
    fn from(result: Result<RunReply, ExecError>) -> Self {
        match result {
            Ok(reply) => match reply.into_verdict() {
                ReplyVerdict::Output(output) => RunOutcome::Succeeded(output),
                ReplyVerdict::ProgramError(err) => Self::failed(FailureKind::Program, err),
            },
            Err(err) if err.is_communication() => Self::communication(err),
            Err(err) => Self::failed(FailureKind::Api, err.to_string()),
        }
    }
}

/// Why a run could not start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RunRejected {
    #[error("execution is not enabled for this snippet")]
    NotPermitted,
    #[error("a run is already in progress")]
    AlreadyRunning,
}

/// Identifies the run a completion belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RunTicket(pub(crate) u64);

/// A started run: the request snapshot plus the runner to send it with.
///
/// Dropping it (or the `CompletedRun` it resolves to) before the result is
/// applied abandons the run; the widget then returns to `Idle`.
pub struct PendingRun {
    pub(crate) ticket: RunTicket,
    request: RunRequest,
    runner: Arc<dyn CodeRunner>,
    alive: Arc<()>,
}

/// A finished run, ready to be applied with `SnippetWidget::finish_run`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedRun {
    pub(crate) ticket: RunTicket,
    pub outcome: RunOutcome,
    pub(crate) alive: Arc<()>,
}

impl PendingRun {
    pub(crate) fn new(ticket: RunTicket, code: String, runner: Arc<dyn CodeRunner>) -> Self {
        Self { ticket, request: RunRequest::new(code), runner, alive: Arc::new(()) }
    }

    /// Goes dead once every handle to this run is gone.
    pub(crate) fn liveness(&self) -> Weak<()> {
        Arc::downgrade(&self.alive)
    }

    /// Snapshot being submitted.
    pub fn code(&self) -> &str {
        &self.request.code
    }

    /// Send the request on the blocking pool. Always resolves to an outcome;
    /// a panicking runner is reported as a communication failure.
    pub async fn send(self) -> CompletedRun {
        let PendingRun { ticket, request, runner, alive } = self;
        let outcome = smol::unblock(move || {
            catch_unwind(AssertUnwindSafe(|| runner.run(&request.code)))
        })
        .await;

        let outcome = match outcome {
            Ok(result) => RunOutcome::from(result),
            Err(_) => {
                log::error!("Code runner panicked");
                RunOutcome::communication("execution backend crashed")
            }
        };
        CompletedRun { ticket, outcome, alive }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_reply() {
        let outcome = RunOutcome::from(Ok(RunReply::output("ok")));
        assert_eq!(outcome, RunOutcome::Succeeded("ok".into()));
    }

    #[test]
    fn test_program_error_is_verbatim() {
        let outcome = RunOutcome::from(Ok(RunReply::error("exit status 2")));
        assert_eq!(
            outcome,
            RunOutcome::Failed(RunFailure {
                kind: FailureKind::Program,
                message: "exit status 2".into(),
            })
        );
    }

    #[test]
    fn test_http_error_embeds_status_and_body() {
        let outcome = RunOutcome::from(Err(ExecError::Http(500, "panic: boom".into())));
        match outcome {
            RunOutcome::Failed(RunFailure { kind: FailureKind::Api, message }) => {
                assert!(message.contains("500"));
                assert!(message.contains("panic: boom"));
                assert!(!message.starts_with(COMMUNICATION_PREFIX));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_transport_error_is_prefixed() {
        let outcome = RunOutcome::from(Err(ExecError::Network("connection refused".into())));
        assert_eq!(
            outcome,
            RunOutcome::Failed(RunFailure {
                kind: FailureKind::Communication,
                message: format!("{}connection refused", COMMUNICATION_PREFIX),
            })
        );
    }

    #[test]
    fn test_undecodable_body_is_communication_failure() {
        let outcome = RunOutcome::from(Err(ExecError::Parse("expected value".into())));
        match outcome {
            RunOutcome::Failed(failure) => {
                assert_eq!(failure.kind, FailureKind::Communication);
                assert!(failure.message.starts_with(COMMUNICATION_PREFIX));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    struct Panicking;

    impl CodeRunner for Panicking {
        fn run(&self, _code: &str) -> Result<RunReply, ExecError> {
            panic!("backend exploded");
        }
    }

    #[test]
    fn test_panicking_runner_still_completes() {
        let pending = PendingRun::new(RunTicket(7), "package main".into(), Arc::new(Panicking));
        let completed = smol::block_on(pending.send());
        assert_eq!(completed.ticket, RunTicket(7));
        assert_eq!(Arc::strong_count(&completed.alive), 1);
        assert!(matches!(
            completed.outcome,
            RunOutcome::Failed(RunFailure { kind: FailureKind::Communication, .. })
        ));
    }
}
