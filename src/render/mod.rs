//! Render Module
//!
//! - [`RenderLoop`]: stopped/running state machine with continuous and
//!   on-demand modes, frame callbacks and request coalescing
//! - [`FrameSnapshot`]: the per-frame data handed to a [`RenderTarget`]
//! - [`headless`]: scheduler and target for tests and offscreen hosts

pub mod frame;
pub mod headless;
pub mod render_loop;

pub use frame::{CameraUniform, FrameSnapshot, InstanceBatch, LightUniform, LineVertex, PointInstance, RenderTarget};
pub use headless::{ManualScheduler, RecordingTarget};
pub use render_loop::{FrameCallback, FrameRequest, FrameScheduler, LoopState, RenderLoop, RenderMode};
