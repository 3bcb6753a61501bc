//! Headless host implementations.
//!
//! [`ManualScheduler`] stands in for the display's frame callback: it only
//! records requests, and the embedder decides when to fire them.
//! [`RecordingTarget`] keeps the last submitted frame. Both hand out cheap
//! clones sharing the same state, so a caller can keep an inspector handle
//! after moving the original into the viewer.

use std::cell::RefCell;
use std::rc::Rc;

use crate::render::frame::{FrameSnapshot, RenderTarget};
use crate::render::render_loop::{FrameRequest, FrameScheduler};

#[derive(Debug, Default)]
struct SchedulerState {
    next_id: u64,
    pending: Option<FrameRequest>,
    requested: u64,
    cancelled: u64,
}

#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    state: Rc<RefCell<SchedulerState>>,
}

impl ManualScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The request the host would fire next, if any.
    #[must_use]
    pub fn pending(&self) -> Option<FrameRequest> {
        self.state.borrow().pending
    }

    /// Consumes the pending request, as a host does right before its callback.
    pub fn take_pending(&self) -> Option<FrameRequest> {
        self.state.borrow_mut().pending.take()
    }

    #[must_use]
    pub fn requested_count(&self) -> u64 {
        self.state.borrow().requested
    }

    #[must_use]
    pub fn cancelled_count(&self) -> u64 {
        self.state.borrow().cancelled
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) -> FrameRequest {
        let mut state = self.state.borrow_mut();
        state.next_id += 1;
        state.requested += 1;
        let request = FrameRequest(state.next_id);
        state.pending = Some(request);
        request
    }

    fn cancel_frame(&mut self, request: FrameRequest) {
        let mut state = self.state.borrow_mut();
        if state.pending == Some(request) {
            state.pending = None;
            state.cancelled += 1;
        }
    }
}

#[derive(Debug, Default)]
struct RecordingState {
    frames: u64,
    last: Option<FrameSnapshot>,
}

#[derive(Debug, Clone, Default)]
pub struct RecordingTarget {
    state: Rc<RefCell<RecordingState>>,
}

impl RecordingTarget {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.state.borrow().frames
    }

    #[must_use]
    pub fn last_frame(&self) -> Option<FrameSnapshot> {
        self.state.borrow().last.clone()
    }
}

impl RenderTarget for RecordingTarget {
    fn submit(&mut self, frame: &FrameSnapshot) {
        let mut state = self.state.borrow_mut();
        state.frames += 1;
        state.last = Some(frame.clone());
    }
}
