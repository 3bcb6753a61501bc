//! Frame scheduling.
//!
//! The loop never drives itself: it asks the host for a frame through a
//! [`FrameScheduler`] (a `requestAnimationFrame`, a winit redraw request, a
//! test harness) and does its work when the host calls back into
//! [`RenderLoop::run_frame`].
//!
//! In [`RenderMode::OnDemand`] a frame only happens after
//! [`RenderLoop::request_render`]. Requests coalesce: however many arrive
//! before the host fires, exactly one frame is submitted.

use serde::{Deserialize, Serialize};

use crate::utils::time::{DeltaClock, Duration, Instant};

/// Longest delta handed to frame callbacks.
const MAX_FRAME_DELTA: Duration = Duration::from_millis(100);

/// Opaque id of a host frame request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameRequest(pub u64);

/// The host's per-frame scheduling primitive.
pub trait FrameScheduler {
    /// Asks the host to call [`RenderLoop::run_frame`] at its next frame.
    fn request_frame(&mut self) -> FrameRequest;

    /// Withdraws a request. Hosts that cannot cancel may ignore this; the
    /// loop drops callbacks that arrive without a pending request.
    fn cancel_frame(&mut self, request: FrameRequest);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RenderMode {
    /// Draw on every display refresh
    Continuous,
    /// Draw only after an explicit request
    #[default]
    OnDemand,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Stopped,
    Running,
    Disposed,
}

pub type FrameCallback = Box<dyn FnMut(f32)>;

pub struct RenderLoop {
    scheduler: Box<dyn FrameScheduler>,
    mode: RenderMode,
    state: LoopState,

    pending: Option<FrameRequest>,
    render_requested: bool,

    callbacks: Vec<FrameCallback>,
    clock: DeltaClock,
    frames_submitted: u64,
}

impl RenderLoop {
    #[must_use]
    pub fn new(scheduler: Box<dyn FrameScheduler>, mode: RenderMode) -> Self {
        Self {
            scheduler,
            mode,
            state: LoopState::Stopped,
            pending: None,
            render_requested: false,
            callbacks: Vec::new(),
            clock: DeltaClock::new(MAX_FRAME_DELTA),
            frames_submitted: 0,
        }
    }

    #[inline]
    #[must_use]
    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    #[inline]
    #[must_use]
    pub fn state(&self) -> LoopState {
        self.state
    }

    #[inline]
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    #[inline]
    #[must_use]
    pub fn has_pending_frame(&self) -> bool {
        self.pending.is_some()
    }

    #[inline]
    #[must_use]
    pub fn frames_submitted(&self) -> u64 {
        self.frames_submitted
    }

    /// Registers a callback invoked with the frame delta before every submitted frame.
    pub fn add_callback(&mut self, callback: impl FnMut(f32) + 'static) {
        if self.state == LoopState::Disposed {
            log::warn!("add_callback() on a disposed RenderLoop is ignored");
            return;
        }
        self.callbacks.push(Box::new(callback));
    }

    /// Marks the scene dirty. Redundant calls before the next frame are free.
    pub fn request_render(&mut self) {
        if self.state == LoopState::Disposed {
            return;
        }
        self.render_requested = true;
        self.ensure_scheduled();
    }

    fn ensure_scheduled(&mut self) {
        if self.state == LoopState::Running && self.pending.is_none() {
            self.pending = Some(self.scheduler.request_frame());
        }
    }

    pub fn start(&mut self) {
        match self.state {
            LoopState::Disposed => log::warn!("start() on a disposed RenderLoop is ignored"),
            LoopState::Running => {}
            LoopState::Stopped => {
                self.state = LoopState::Running;
                self.clock.reset();
                if self.mode == RenderMode::Continuous {
                    self.render_requested = true;
                }
                if self.render_requested {
                    self.ensure_scheduled();
                }
                log::debug!("RenderLoop started ({:?})", self.mode);
            }
        }
    }

    /// Pauses the loop and withdraws any pending host request.
    ///
    /// An outstanding render request is remembered and honoured on the next `start()`.
    pub fn stop(&mut self) {
        if self.state != LoopState::Running {
            return;
        }
        if let Some(request) = self.pending.take() {
            self.scheduler.cancel_frame(request);
        }
        self.state = LoopState::Stopped;
    }

    pub fn set_mode(&mut self, mode: RenderMode) {
        self.mode = mode;
        if mode == RenderMode::Continuous {
            self.request_render();
        }
    }

    /// Host callback for a scheduled frame.
    ///
    /// Runs the frame callbacks, then `render` with the measured delta. When
    /// `render` returns `true` (something is still animating) another frame
    /// is requested. Returns whether a frame was submitted; callbacks that
    /// arrive while stopped, disposed or without a pending request do nothing.
    pub fn run_frame(&mut self, now: Instant, render: impl FnOnce(f32) -> bool) -> bool {
        if self.state != LoopState::Running || self.pending.take().is_none() {
            return false;
        }
        if self.mode == RenderMode::OnDemand && !self.render_requested {
            return false;
        }
        self.render_requested = false;

        let dt = self.clock.tick(now);
        for callback in &mut self.callbacks {
            callback(dt);
        }

        let keep_animating = render(dt);
        self.frames_submitted += 1;

        if keep_animating || self.mode == RenderMode::Continuous {
            self.request_render();
        }
        true
    }

    /// Cancels the pending host request and drops all callbacks. Idempotent.
    pub fn dispose(&mut self) {
        if self.state == LoopState::Disposed {
            return;
        }
        if let Some(request) = self.pending.take() {
            self.scheduler.cancel_frame(request);
        }
        self.callbacks.clear();
        self.render_requested = false;
        self.state = LoopState::Disposed;
        log::debug!("RenderLoop disposed after {} frames", self.frames_submitted);
    }
}

impl Drop for RenderLoop {
    fn drop(&mut self) {
        self.dispose();
    }
}
