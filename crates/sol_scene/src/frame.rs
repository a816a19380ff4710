//! Hand-off of finished frames from the renderer to display or export.

use std::sync::{Arc, PoisonError, RwLock};

use sol_renderer::RenderTarget;

/// The most recently published frame.
///
/// Publishing swaps the snapshot under the write lock; readers hold an
/// `Arc` to an immutable frame, so replacing it never frees a frame that
/// is still being read.
#[derive(Debug)]
pub struct FrameSlot {
    current: RwLock<Arc<RenderTarget>>,
}

impl FrameSlot {
    /// A slot holding an empty 0x0 frame.
    pub fn new() -> Self {
        Self {
            current: RwLock::new(Arc::new(RenderTarget::empty())),
        }
    }

    /// Replace the current frame, returning it.
    pub fn publish(&self, target: RenderTarget) -> Arc<RenderTarget> {
        let target = Arc::new(target);
        let previous = {
            let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
            std::mem::replace(&mut *current, Arc::clone(&target))
        };
        log::debug!(
            "Published frame {} ({}x{}), replacing {}",
            target.identifier(),
            target.width(),
            target.height(),
            previous.identifier()
        );
        target
    }

    /// A handle to the current frame.
    pub fn latest(&self) -> Arc<RenderTarget> {
        let current = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&current)
    }

    pub fn identifier(&self) -> String {
        self.latest().identifier().to_string()
    }
}

impl Default for FrameSlot {
    fn default() -> Self {
        Self::new()
    }
}

/// Consumer-side change detection by frame identifier.
#[derive(Debug, Default, Clone)]
pub struct FrameWatcher {
    last_seen: Option<String>,
}

impl FrameWatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// The latest frame if it differs from the one seen last time.
    pub fn poll(&mut self, slot: &FrameSlot) -> Option<Arc<RenderTarget>> {
        let latest = slot.latest();
        if self.last_seen.as_deref() == Some(latest.identifier()) {
            return None;
        }
        self.last_seen = Some(latest.identifier().to_string());
        Some(latest)
    }

    pub fn last_seen(&self) -> Option<&str> {
        self.last_seen.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sol_math::Color;

    #[test]
    fn test_slot_starts_empty() {
        let slot = FrameSlot::new();
        let frame = slot.latest();
        assert_eq!((frame.width(), frame.height()), (0, 0));
        assert!(frame.is_empty());
    }

    #[test]
    fn test_publish_replaces_latest() {
        let slot = FrameSlot::new();
        let published = slot.publish(RenderTarget::new(vec![Color::ONE; 6], 3, 2));

        let latest = slot.latest();
        assert!(Arc::ptr_eq(&published, &latest));
        assert_eq!(slot.identifier(), published.identifier());
    }

    #[test]
    fn test_old_frame_survives_while_held() {
        let slot = FrameSlot::new();
        slot.publish(RenderTarget::new(vec![Color::ONE; 1], 1, 1));
        let held = slot.latest();

        slot.publish(RenderTarget::new(vec![Color::ZERO; 4], 2, 2));
        assert_eq!(held.get_pixel(0, 0), Color::ONE);
        assert_eq!(slot.latest().width(), 2);
    }

    #[test]
    fn test_watcher_reports_each_frame_once() {
        let slot = FrameSlot::new();
        let mut watcher = FrameWatcher::new();

        // The initial empty frame counts as new the first time.
        assert!(watcher.poll(&slot).is_some());
        assert!(watcher.poll(&slot).is_none());

        let frame = slot.publish(RenderTarget::new(vec![Color::ONE; 4], 2, 2));
        let seen = watcher.poll(&slot).expect("new frame");
        assert_eq!(seen.identifier(), frame.identifier());
        assert_eq!(watcher.last_seen(), Some(frame.identifier()));
        assert!(watcher.poll(&slot).is_none());
    }

    #[test]
    fn test_watcher_sees_edited_copy_of_current_frame() {
        let slot = FrameSlot::new();
        let mut watcher = FrameWatcher::new();
        slot.publish(RenderTarget::new(vec![Color::ZERO; 4], 2, 2));
        assert!(watcher.poll(&slot).is_some());

        let mut edited = (*slot.latest()).clone();
        edited.set_pixel(0, 0, Color::ONE);
        slot.publish(edited);

        let seen = watcher.poll(&slot).expect("edited frame is new");
        assert_eq!(seen.get_pixel(0, 0), Color::ONE);
    }

    #[test]
    fn test_concurrent_readers_see_whole_frames() {
        let slot = FrameSlot::new();
        std::thread::scope(|s| {
            s.spawn(|| {
                for n in 1..50u32 {
                    let value = Color::splat(n as f64);
                    slot.publish(RenderTarget::new(vec![value; (n * n) as usize], n, n));
                }
            });
            for _ in 0..4 {
                s.spawn(|| {
                    for _ in 0..200 {
                        let frame = slot.latest();
                        let n = frame.width();
                        assert_eq!(frame.pixels().len(), (n * frame.height()) as usize);
                        assert!(frame.pixels().iter().all(|&c| c == Color::splat(n as f64)));
                    }
                });
            }
        });
    }
}
