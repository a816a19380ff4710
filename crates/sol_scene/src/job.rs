//! Renders running off the calling thread.

use std::sync::Arc;
use std::thread::JoinHandle;

use sol_renderer::{Camera, RenderProgress, RenderTarget, World};

use crate::FrameSlot;

/// A render of a world/camera snapshot on its own thread.
///
/// The finished frame is published into the slot it was started with;
/// `wait` also hands it back directly.
#[derive(Debug)]
pub struct RenderJob {
    progress: Arc<RenderProgress>,
    handle: JoinHandle<Arc<RenderTarget>>,
}

impl RenderJob {
    pub(crate) fn spawn(
        world: World,
        mut camera: Camera,
        thread_count: usize,
        frames: Arc<FrameSlot>,
    ) -> std::io::Result<Self> {
        let progress = Arc::new(RenderProgress::new());
        let worker_progress = Arc::clone(&progress);

        let handle = std::thread::Builder::new()
            .name("sol-render-job".to_string())
            .spawn(move || {
                let pixels = camera.render(&world, thread_count, &worker_progress);
                let target = RenderTarget::new(pixels, camera.image_width, camera.image_height());
                frames.publish(target)
            })?;

        Ok(Self { progress, handle })
    }

    pub fn progress(&self) -> &RenderProgress {
        &self.progress
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Block until the render is done.
    ///
    /// Returns `None` if the render thread panicked.
    pub fn wait(self) -> Option<Arc<RenderTarget>> {
        match self.handle.join() {
            Ok(frame) => Some(frame),
            Err(_) => {
                log::error!("Render thread panicked");
                None
            }
        }
    }
}
