//! Host adapters.
//!
//! The viewer core only knows the [`FrameScheduler`] and [`RenderTarget`]
//! seams. This module connects them to a real windowing system.
//!
//! [`FrameScheduler`]: crate::render::FrameScheduler
//! [`RenderTarget`]: crate::render::RenderTarget

#[cfg(feature = "winit")]
pub mod winit;
