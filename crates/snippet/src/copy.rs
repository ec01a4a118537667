//! Copy-to-clipboard with a self-reverting confirmation label.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::capability::{ClipboardError, ClipboardWriter};

/// How long the "copied" label stays up after a successful copy.
pub const COPY_FEEDBACK_WINDOW: Duration = Duration::from_secs(2);

/// Transient "copied" state. At most one revert deadline is pending; a new
/// confirmation replaces it.
#[derive(Debug, Clone)]
pub struct CopyFeedback {
    window: Duration,
    revert_at: Option<Instant>,
}

impl CopyFeedback {
    pub fn new(window: Duration) -> Self {
        Self { window, revert_at: None }
    }

    pub fn is_copied(&self) -> bool {
        self.revert_at.is_some()
    }

    /// When the pending revert fires, if any.
    pub fn revert_at(&self) -> Option<Instant> {
        self.revert_at
    }

    /// Show the confirmation and (re)start the revert window at `now`.
    pub fn confirm(&mut self, now: Instant) {
        self.revert_at = Some(now + self.window);
    }

    /// Fire the revert if its deadline has passed. Returns true when the label changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.revert_at {
            Some(deadline) if now >= deadline => {
                self.revert_at = None;
                true
            }
            _ => false,
        }
    }

    /// Drop the pending revert and show the default label.
    pub fn cancel(&mut self) {
        self.revert_at = None;
    }
}

impl Default for CopyFeedback {
    fn default() -> Self {
        Self::new(COPY_FEEDBACK_WINDOW)
    }
}

/// A started copy: the buffer snapshot and the clipboard to write it to.
pub struct PendingCopy {
    text: String,
    clipboard: Arc<dyn ClipboardWriter>,
}

impl PendingCopy {
    pub(crate) fn new(text: String, clipboard: Arc<dyn ClipboardWriter>) -> Self {
        Self { text, clipboard }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Write the snapshot on the blocking pool.
    pub async fn write(self) -> Result<(), ClipboardError> {
        let PendingCopy { text, clipboard } = self;
        smol::unblock(move || clipboard.write_text(&text)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reverts_after_exactly_the_window() {
        let t0 = Instant::now();
        let mut feedback = CopyFeedback::default();
        feedback.confirm(t0);

        assert!(!feedback.tick(t0 + Duration::from_millis(1999)));
        assert!(feedback.is_copied());
        assert!(feedback.tick(t0 + Duration::from_millis(2000)));
        assert!(!feedback.is_copied());
    }

    #[test]
    fn test_second_confirm_restarts_window() {
        let t0 = Instant::now();
        let mut feedback = CopyFeedback::default();
        feedback.confirm(t0);
        feedback.confirm(t0 + Duration::from_secs(1));

        assert_eq!(feedback.revert_at(), Some(t0 + Duration::from_secs(3)));
        assert!(!feedback.tick(t0 + Duration::from_secs(2)));
        assert!(feedback.is_copied());
        assert!(feedback.tick(t0 + Duration::from_secs(3)));
        // Only one revert ever fires
        assert!(!feedback.tick(t0 + Duration::from_secs(10)));
    }

    #[test]
    fn test_cancel() {
        let mut feedback = CopyFeedback::new(Duration::from_millis(10));
        feedback.confirm(Instant::now());
        feedback.cancel();
        assert!(!feedback.is_copied());
        assert_eq!(feedback.revert_at(), None);
    }
}
