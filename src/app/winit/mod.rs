//! Winit-based host
//!
//! Runs a [`Viewer3DPanel`] inside a native window:
//!
//! - [`WinitScheduler`]: maps frame requests onto `Window::request_redraw`
//! - [`ViewerHandler`]: trait users implement to provide the render target and feed data
//! - [`App`]: builder that owns the event loop
//!
//! ```rust,ignore
//! use pointfield::app::winit::{App, ViewerHandler};
//!
//! struct Dashboard { /* stream subscription */ }
//!
//! impl ViewerHandler for Dashboard {
//!     fn create_target(window: &Arc<Window>) -> Box<dyn RenderTarget> { /* GPU backend */ }
//!     fn init(panel: &mut Viewer3DPanel) -> Self { Dashboard { /* ... */ } }
//!     fn update(&mut self, panel: &mut Viewer3DPanel, now: Instant) {
//!         if let Some(batch) = self.poll() {
//!             panel.set_readings(batch);
//!         }
//!     }
//! }
//!
//! App::new().with_title("Sensors").run::<Dashboard>()
//! ```

use std::sync::Arc;

use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
pub use winit::window::{Window, WindowId};

use crate::config::ViewerConfig;
use crate::errors::ViewerError;
use crate::render::frame::RenderTarget;
use crate::render::render_loop::{FrameRequest, FrameScheduler};
use crate::utils::time::{Duration, Instant};
use crate::viewer::panel::Viewer3DPanel;

pub mod input_adapter;

use self::input_adapter::{InputAdapter, cursor_icon};

/// Frame scheduling through winit redraw requests.
///
/// Winit cannot withdraw a redraw request; a cancelled request still fires
/// and the render loop discards it.
pub struct WinitScheduler {
    window: Arc<Window>,
    next_id: u64,
}

impl WinitScheduler {
    #[must_use]
    pub fn new(window: Arc<Window>) -> Self {
        Self { window, next_id: 0 }
    }
}

impl FrameScheduler for WinitScheduler {
    fn request_frame(&mut self) -> FrameRequest {
        self.next_id += 1;
        self.window.request_redraw();
        FrameRequest(self.next_id)
    }

    fn cancel_frame(&mut self, _request: FrameRequest) {}
}

/// Application behaviour around the viewer.
pub trait ViewerHandler: Sized + 'static {
    /// Builds the GPU backend for the freshly created window.
    fn create_target(window: &Arc<Window>) -> Box<dyn RenderTarget>;

    /// Called once after the panel is mounted.
    fn init(panel: &mut Viewer3DPanel) -> Self;

    /// Called on every event loop iteration, before interpolation runs.
    #[allow(unused_variables)]
    fn update(&mut self, panel: &mut Viewer3DPanel, now: Instant) {}
}

pub struct App {
    title: String,
    config: ViewerConfig,
}

impl App {
    #[must_use]
    pub fn new() -> Self {
        Self {
            title: "Sensor Viewer".into(),
            config: ViewerConfig::default(),
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    #[must_use]
    pub fn with_config(mut self, config: ViewerConfig) -> Self {
        self.config = config;
        self
    }

    /// Runs the event loop until the window closes.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn run<H: ViewerHandler>(self) -> crate::errors::Result<()> {
        self.config.validate()?;
        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Wait);

        let mut runner = AppRunner::<H>::new(self.title, self.config);
        event_loop.run_app(&mut runner).map_err(ViewerError::from)
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

struct AppRunner<H: ViewerHandler> {
    title: String,
    config: ViewerConfig,
    step_interval: Duration,

    window: Option<Arc<Window>>,
    panel: Option<Viewer3DPanel>,
    user_state: Option<H>,
    input: InputAdapter,
}

impl<H: ViewerHandler> AppRunner<H> {
    fn new(title: String, config: ViewerConfig) -> Self {
        Self {
            title,
            step_interval: Duration::from_secs_f32(1.0 / config.interpolation.steps_per_second),
            config,
            window: None,
            panel: None,
            user_state: None,
            input: InputAdapter::new(),
        }
    }
}

impl<H: ViewerHandler> ApplicationHandler for AppRunner<H> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attributes = Window::default_attributes()
            .with_title(&self.title)
            .with_inner_size(winit::dpi::LogicalSize::new(1280.0, 720.0));
        let window = match event_loop.create_window(attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        let size = window.inner_size();
        let scheduler = Box::new(WinitScheduler::new(window.clone()));
        let target = H::create_target(&window);
        let mut panel = match Viewer3DPanel::new(self.config.clone(), scheduler, target, size.width, size.height) {
            Ok(panel) => panel,
            Err(e) => {
                log::error!("Failed to mount viewer: {e}");
                event_loop.exit();
                return;
            }
        };

        self.user_state = Some(H::init(&mut panel));
        self.panel = Some(panel);
        self.window = Some(window);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        let (Some(window), Some(panel)) = (&self.window, &mut self.panel) else {
            return;
        };

        if self.input.process_window_event(panel, &event) {
            window.set_cursor(cursor_icon(panel.cursor()));
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                panel.dispose();
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => {
                panel.frame(Instant::now());
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(panel), Some(user_state)) = (&mut self.panel, &mut self.user_state) else {
            return;
        };
        let now = Instant::now();
        user_state.update(panel, now);
        panel.tick_interpolation(now);

        if panel.is_animating() {
            event_loop.set_control_flow(ControlFlow::WaitUntil(now + self.step_interval));
        } else {
            event_loop.set_control_flow(ControlFlow::Wait);
        }
    }
}
