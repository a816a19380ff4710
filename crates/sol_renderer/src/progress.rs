//! Pixel-completion progress shared between render workers and a consumer.

use std::sync::atomic::{AtomicUsize, Ordering};

/// Counts finished pixels for one render.
///
/// Workers only ever add; readers get an approximate, eventually-consistent
/// view with no further synchronization.
#[derive(Debug, Default)]
pub struct RenderProgress {
    completed: AtomicUsize,
    total: AtomicUsize,
}

impl RenderProgress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start counting toward `total` pixels.
    pub fn reset(&self, total: usize) {
        self.completed.store(0, Ordering::Relaxed);
        self.total.store(total, Ordering::Relaxed);
    }

    #[inline]
    pub fn advance(&self, pixels: usize) {
        self.completed.fetch_add(pixels, Ordering::Relaxed);
    }

    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::Relaxed)
    }

    pub fn total(&self) -> usize {
        self.total.load(Ordering::Relaxed)
    }

    /// Whole percentage finished, 0 when nothing has been scheduled.
    pub fn percent(&self) -> usize {
        match self.total() {
            0 => 0,
            total => 100 * self.completed() / total,
        }
    }

    pub fn is_complete(&self) -> bool {
        let total = self.total();
        total > 0 && self.completed() >= total
    }

    /// Human-readable status, e.g. `"Progress 42%"`.
    pub fn message(&self) -> String {
        format!("Progress {}%", self.percent())
    }
}
