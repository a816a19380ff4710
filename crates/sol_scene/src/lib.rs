//! sol scene - editing boundary and frame hand-off
//!
//! A [`Scene`] owns the world, the camera and a named material table.
//! Finished frames go into a [`FrameSlot`] that display or export code
//! reads from, on the same thread or another.

pub mod frame;
pub mod job;
pub mod scene;

pub use frame::{FrameSlot, FrameWatcher};
pub use job::RenderJob;
pub use scene::{Scene, SceneError, SceneResult, DEFAULT_MATERIAL};
