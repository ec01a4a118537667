//! The snippet widget: buffer, edit flag, run lifecycle and side effects.

use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};

use letsgo_config::manifest::ContentSpec;
use letsgo_config::snippet::SnippetOptions;

use crate::capability::{
    Blob, ClipboardError, ClipboardWriter, CodeRunner, FileSaver, ObjectUrlLease, SaveError,
    SizeObserver,
};
use crate::copy::{CopyFeedback, PendingCopy};
use crate::highlight::Highlighter;
use crate::layout::AutoResize;
use crate::run::{CompletedRun, PendingRun, RunRejected, RunState, RunTicket};
use crate::source::{initial_code, SourceResolver};
use crate::view::{Control, EditorView, ResultPanel, SnippetView, FALLBACK_TEXT, HEADER};

/// Everything the widget needs from its environment.
pub struct Capabilities {
    pub runner: Arc<dyn CodeRunner>,
    pub clipboard: Arc<dyn ClipboardWriter>,
    pub saver: Box<dyn FileSaver>,
    pub highlighter: Box<dyn Highlighter>,
}

#[derive(Debug, thiserror::Error)]
pub enum SnippetError {
    #[error("editing is not enabled for this snippet")]
    EditNotPermitted,
    #[error("snippet is read-only; toggle edit first")]
    ReadOnly,
    #[error(transparent)]
    Run(#[from] RunRejected),
    #[error(transparent)]
    Save(#[from] SaveError),
}

/// The run currently owed a result.
struct InFlight {
    ticket: RunTicket,
    alive: Weak<()>,
}

pub struct SnippetWidget {
    options: SnippetOptions,
    code: String,
    editing: bool,
    run: RunState,
    in_flight: Option<InFlight>,
    next_ticket: u64,
    copy: CopyFeedback,
    resize: AutoResize,
    mounted: bool,
    caps: Capabilities,
}

impl SnippetWidget {
    /// Create an unmounted widget whose buffer starts as `code`.
    pub fn new(options: SnippetOptions, code: impl Into<String>, caps: Capabilities) -> Self {
        Self {
            options,
            code: code.into(),
            editing: false,
            run: RunState::Idle,
            in_flight: None,
            next_ticket: 0,
            copy: CopyFeedback::default(),
            resize: AutoResize::new(),
            mounted: false,
            caps,
        }
    }

    /// Create a widget from an inline literal or a static file reference.
    pub fn from_content(
        options: SnippetOptions,
        content: &ContentSpec,
        resolver: &dyn SourceResolver,
        caps: Capabilities,
    ) -> Self {
        Self::new(options, initial_code(content, resolver), caps)
    }

    /// Override the copy confirmation window.
    pub fn with_copy_feedback(mut self, window: Duration) -> Self {
        self.copy = CopyFeedback::new(window);
        self
    }

    pub fn options(&self) -> &SnippetOptions {
        &self.options
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    // ── Editing ─────────────────────────────────────────────────────

    pub fn is_read_only(&self) -> bool {
        !self.options.allow_edit || !self.editing
    }

    /// Flip the edit flag. Returns the new value.
    pub fn toggle_edit(&mut self) -> Result<bool, SnippetError> {
        if !self.options.allow_edit {
            return Err(SnippetError::EditNotPermitted);
        }
        self.editing = !self.editing;
        Ok(self.editing)
    }

    /// Replace the buffer with an edited value.
    pub fn set_code(&mut self, code: impl Into<String>) -> Result<(), SnippetError> {
        if self.is_read_only() {
            return Err(SnippetError::ReadOnly);
        }
        self.code = code.into();
        self.resize.schedule();
        Ok(())
    }

    // ── Running ─────────────────────────────────────────────────────

    pub fn run_state(&self) -> &RunState {
        &self.run
    }

    /// Enter `Running` and snapshot the buffer. Clears the previous result.
    pub fn begin_run(&mut self) -> Result<PendingRun, RunRejected> {
        self.reap_abandoned_run();
        if !self.options.allow_execute {
            return Err(RunRejected::NotPermitted);
        }
        if self.run.is_running() {
            return Err(RunRejected::AlreadyRunning);
        }

        self.next_ticket += 1;
        let ticket = RunTicket(self.next_ticket);
        self.run = RunState::Running;
        log::debug!("run #{} started for {}", ticket.0, self.options.file_name);

        let pending = PendingRun::new(ticket, self.code.clone(), self.caps.runner.clone());
        self.in_flight = Some(InFlight { ticket, alive: pending.liveness() });
        Ok(pending)
    }

    /// Apply a finished run. Returns false for a completion that does not
    /// belong to the run in flight.
    pub fn finish_run(&mut self, completed: CompletedRun) -> bool {
        if self.in_flight.as_ref().map(|f| f.ticket) != Some(completed.ticket) {
            log::debug!("ignoring stale run #{}", completed.ticket.0);
            return false;
        }
        self.in_flight = None;
        self.run = completed.outcome.into_state();
        log::debug!("run #{} finished: {:?}", completed.ticket.0, self.run);
        true
    }

    /// Return to `Idle` if the run in flight was dropped before its result
    /// was applied. Returns true when that happened.
    fn reap_abandoned_run(&mut self) -> bool {
        let abandoned = matches!(&self.in_flight, Some(flight) if flight.alive.strong_count() == 0);
        if !abandoned {
            return false;
        }
        if let Some(flight) = self.in_flight.take() {
            log::debug!("run #{} abandoned", flight.ticket.0);
        }
        self.run = RunState::Idle;
        true
    }

    /// Run the current buffer to completion.
    pub async fn execute(&mut self) -> Result<&RunState, RunRejected> {
        let pending = self.begin_run()?;
        let completed = pending.send().await;
        self.finish_run(completed);
        Ok(&self.run)
    }

    // ── Copy ────────────────────────────────────────────────────────

    pub fn copy_feedback(&self) -> &CopyFeedback {
        &self.copy
    }

    pub fn begin_copy(&self) -> PendingCopy {
        PendingCopy::new(self.code.clone(), self.caps.clipboard.clone())
    }

    /// Apply a finished clipboard write. Failures are logged only.
    pub fn finish_copy(&mut self, result: Result<(), ClipboardError>, now: Instant) {
        match result {
            Ok(()) => self.copy.confirm(now),
            Err(e) => log::warn!("Failed to copy code: {}", e),
        }
    }

    pub async fn copy(&mut self) -> Result<(), ClipboardError> {
        let result = self.begin_copy().write().await;
        self.finish_copy(result.clone(), Instant::now());
        result
    }

    /// Advance timers. Returns true when anything visible changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let reverted = self.copy.tick(now);
        let reaped = self.reap_abandoned_run();
        reverted || reaped
    }

    /// Earliest pending timer deadline.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.copy.revert_at()
    }

    // ── Download ────────────────────────────────────────────────────

    /// Save the buffer under the configured file name.
    pub fn download(&self) -> Result<(), SaveError> {
        let saver = self.caps.saver.as_ref();
        let lease = ObjectUrlLease::acquire(saver, Blob::text(&self.code))?;
        saver.trigger_download(lease.url(), &self.options.file_name)?;
        log::info!("Downloaded {} ({} bytes)", self.options.file_name, self.code.len());
        Ok(())
    }

    // ── Mount lifecycle ─────────────────────────────────────────────

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Attach to a rendered element and schedule the first resize.
    pub fn mount(&mut self, observer: Box<dyn SizeObserver>) {
        self.resize.attach(observer);
        self.mounted = true;
    }

    /// Release the observer and any pending copy revert.
    pub fn unmount(&mut self) {
        self.resize.detach();
        self.copy.cancel();
        self.reap_abandoned_run();
        self.mounted = false;
    }

    /// Next paint: run the pending resize pass, if any.
    pub fn on_frame(&mut self) -> Option<u32> {
        self.resize.on_frame(&self.code)
    }

    // ── Render ──────────────────────────────────────────────────────

    pub fn render(&self) -> SnippetView {
        if !self.mounted {
            return SnippetView::Fallback(FALLBACK_TEXT);
        }

        let mut controls = Vec::with_capacity(4);
        if self.options.allow_execute {
            controls.push(Control::Run { busy: self.run.is_running() });
        }
        if self.options.allow_edit {
            controls.push(Control::Edit { editing: self.editing });
        }
        controls.push(Control::Copy { copied: self.copy.is_copied() });
        controls.push(Control::Download);

        let result = match &self.run {
            RunState::Idle => None,
            RunState::Running => Some(ResultPanel::Loading),
            RunState::Succeeded(output) => Some(ResultPanel::Output(output.clone())),
            RunState::Failed(failure) => Some(ResultPanel::Error(failure.message.clone())),
        };

        SnippetView::Editor(EditorView {
            header: HEADER,
            spans: self.caps.highlighter.highlight(&self.code),
            read_only: self.is_read_only(),
            height: self.resize.height(),
            controls,
            result,
        })
    }
}
