//! Auto-growing code area.
//!
//! Every buffer change schedules one resize pass for the next frame; changes
//! that land before that frame coalesce into the same pass.

use crate::capability::SizeObserver;

#[derive(Default)]
pub struct AutoResize {
    observer: Option<Box<dyn SizeObserver>>,
    pending: bool,
    height: Option<u32>,
}

impl AutoResize {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start observing. A previous observer is disconnected first.
    pub fn attach(&mut self, observer: Box<dyn SizeObserver>) {
        self.detach();
        self.observer = Some(observer);
        self.schedule();
    }

    /// Stop observing and drop any pending pass.
    pub fn detach(&mut self) {
        if let Some(mut observer) = self.observer.take() {
            observer.disconnect();
        }
        self.pending = false;
    }

    pub fn is_attached(&self) -> bool {
        self.observer.is_some()
    }

    /// Request a pass on the next frame. Returns false when one is already pending.
    pub fn schedule(&mut self) -> bool {
        if self.observer.is_none() || self.pending {
            return false;
        }
        self.pending = true;
        true
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Last applied height.
    pub fn height(&self) -> Option<u32> {
        self.height
    }

    /// Run the pending pass, if any. Returns the height applied.
    pub fn on_frame(&mut self, content: &str) -> Option<u32> {
        if !self.pending {
            return None;
        }
        self.pending = false;

        let observer = self.observer.as_mut()?;
        let height = observer.measure(content)?;
        observer.apply_height(height);
        self.height = Some(height);
        Some(height)
    }
}

impl std::fmt::Debug for AutoResize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AutoResize")
            .field("attached", &self.observer.is_some())
            .field("pending", &self.pending)
            .field("height", &self.height)
            .finish()
    }
}
