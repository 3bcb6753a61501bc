//! The viewer's public surface.
//!
//! [`Viewer3DPanel`] wires every component together and is the only type a
//! dashboard talks to. It is mounted by [`Viewer3DPanel::new`] and unmounted
//! by [`Viewer3DPanel::dispose`] (or by dropping it); after unmount every
//! method is a no-op and every resource it allocated has been released.
//!
//! The host drives two clocks:
//!
//! - [`Viewer3DPanel::frame`] whenever the [`FrameScheduler`] fires,
//! - [`Viewer3DPanel::tick_interpolation`] at its own steady cadence
//!   (ideally 60 Hz), independent of frames and of reading arrival.

use glam::{Quat, Vec2};

use crate::config::ViewerConfig;
use crate::errors::Result;
use crate::render::frame::{FrameSnapshot, RenderTarget};
use crate::render::render_loop::{FrameScheduler, RenderLoop, RenderMode};
use crate::scene::camera::CameraManager;
use crate::scene::lighting::{LightIntensities, LightingManager, LightingPreset};
use crate::scene::SceneManager;
use crate::utils::orbit_control::OrbitControls;
use crate::utils::time::Instant;
use crate::viewer::color::{ColorMapper, ColorMode, DefaultColorMapper};
use crate::viewer::interaction::{CursorStyle, InteractionController, PointerButton, PointerMotion, SelectionState};
use crate::viewer::interpolation::InterpolationDriver;
use crate::viewer::layer::LayerStyle;
use crate::viewer::reading::Reading;
use crate::viewer::reconciler::{AssetReconciler, ReconcileContext, ReconcileStats};
use crate::viewer::view::{ViewController, ViewPreset};

pub type PointSelectCallback = Box<dyn FnMut(Option<&Reading>)>;
pub type ViewChangeCallback = Box<dyn FnMut(ViewPreset)>;

pub struct Viewer3DPanel {
    config: ViewerConfig,

    scene: SceneManager,
    camera: CameraManager,
    lighting: LightingManager,
    render_loop: RenderLoop,
    target: Box<dyn RenderTarget>,

    reconciler: AssetReconciler,
    interpolation: InterpolationDriver,
    interaction: InteractionController,
    view: ViewController,
    orbit: OrbitControls,

    readings: Vec<Reading>,
    style: LayerStyle,
    mapper: Box<dyn ColorMapper>,
    color_mode: ColorMode,

    /// Radians per second about +Y; `None` when off
    auto_rotate: Option<f32>,
    group_angle: f32,

    on_point_select: Option<PointSelectCallback>,
    on_view_change: Option<ViewChangeCallback>,

    mounted: bool,
}

impl Viewer3DPanel {
    /// Mounts a viewer rendering into a `width` x `height` viewport.
    pub fn new(
        config: ViewerConfig,
        scheduler: Box<dyn FrameScheduler>,
        target: Box<dyn RenderTarget>,
        width: u32,
        height: u32,
    ) -> Result<Self> {
        config.validate()?;

        let mut scene = SceneManager::new();
        if config.helpers.show_grid {
            scene.add_grid_helper(
                config.helpers.grid_size,
                config.helpers.grid_divisions,
                config.helpers.grid_color,
            );
        }
        if config.helpers.show_axes {
            scene.add_axes_helper(config.helpers.axes_size);
        }

        let camera = CameraManager::new(&config.camera, width, height);
        let lighting = LightingManager::new(&mut scene, config.lighting);
        let reconciler = AssetReconciler::new(&mut scene, &config.point, config.emphasis.clone(), config.ground_level);

        let view = ViewController::new(config.zoom.clone());
        let (min_distance, max_distance) = view.distance_limits(camera.base_distance());
        let mut orbit = OrbitControls::new(&config.orbit, min_distance, max_distance);
        orbit.sync_from(&camera);

        let mut render_loop = RenderLoop::new(scheduler, config.render_mode);
        render_loop.start();
        render_loop.request_render();

        log::info!(
            "Viewer mounted ({width}x{height}, {:?}, base distance {:.2})",
            config.render_mode,
            camera.base_distance()
        );

        Ok(Self {
            interpolation: InterpolationDriver::new(&config.interpolation),
            interaction: InteractionController::new(config.drag_threshold),
            mapper: Box::new(DefaultColorMapper::new(config.heatmap_range)),
            color_mode: config.color_mode,
            config,

            scene,
            camera,
            lighting,
            render_loop,
            target,

            reconciler,
            view,
            orbit,

            readings: Vec::new(),
            style: LayerStyle::default(),

            auto_rotate: None,
            group_angle: 0.0,

            on_point_select: None,
            on_view_change: None,

            mounted: true,
        })
    }

    // ========================================================================
    // Data
    // ========================================================================

    /// Replaces the displayed batch. Sensors missing from `readings` are evicted.
    pub fn set_readings(&mut self, readings: Vec<Reading>) -> ReconcileStats {
        if !self.mounted {
            return ReconcileStats::default();
        }
        self.readings = readings;
        self.reconcile()
    }

    pub fn set_layer_style(&mut self, style: LayerStyle) {
        if !self.mounted {
            return;
        }
        self.style = style;
        self.reconcile();
    }

    pub fn set_color_mapper(&mut self, mapper: impl ColorMapper + 'static) {
        if !self.mounted {
            return;
        }
        self.mapper = Box::new(mapper);
        self.reconcile();
    }

    pub fn set_color_mode(&mut self, mode: ColorMode) {
        if !self.mounted || self.color_mode == mode {
            return;
        }
        self.color_mode = mode;
        self.reconcile();
    }

    fn reconcile(&mut self) -> ReconcileStats {
        let ctx = ReconcileContext {
            style: &self.style,
            mapper: &*self.mapper,
            mode: self.color_mode,
        };
        let stats = self.reconciler.reconcile(
            &mut self.scene,
            &self.readings,
            &ctx,
            self.interaction.selection_mut(),
        );
        if stats.hover_cleared {
            self.interaction.hover_lost();
        }
        if stats.selection_cleared
            && let Some(callback) = self.on_point_select.as_mut()
        {
            callback(None);
        }
        self.render_loop.request_render();
        stats
    }

    // ========================================================================
    // Frames
    // ========================================================================

    /// Host frame callback. Returns whether a frame was submitted.
    pub fn frame(&mut self, now: Instant) -> bool {
        if !self.mounted {
            return false;
        }
        let frame_index = self.render_loop.frames_submitted();
        let Self {
            render_loop,
            scene,
            camera,
            orbit,
            reconciler,
            target,
            auto_rotate,
            group_angle,
            ..
        } = self;

        render_loop.run_frame(now, |dt| {
            let mut animating = orbit.update(camera, dt);

            if let Some(speed) = *auto_rotate {
                *group_angle = (*group_angle + speed * dt) % std::f32::consts::TAU;
                if let Some(group) = reconciler.group().and_then(|g| scene.scene_mut().get_node_mut(g)) {
                    group.transform.rotation = Quat::from_rotation_y(*group_angle);
                }
                animating = true;
            }

            scene.scene_mut().update_matrix_world();
            let snapshot = FrameSnapshot::extract(frame_index, scene.scene(), scene.resources(), camera);
            target.submit(&snapshot);

            animating || !orbit.is_settled()
        })
    }

    /// Interpolation step, driven at its own cadence. Returns whether any
    /// point moved (a frame has then been requested).
    pub fn tick_interpolation(&mut self, now: Instant) -> bool {
        if !self.mounted {
            return false;
        }
        let moved = self.interpolation.tick(now, &mut self.reconciler, &mut self.scene);
        if moved {
            self.render_loop.request_render();
        }
        moved
    }

    /// Asks for a redraw without changing anything.
    pub fn request_render(&mut self) {
        if self.mounted {
            self.render_loop.request_render();
        }
    }

    /// Registers a hook run before every submitted frame with the frame delta.
    pub fn add_frame_callback(&mut self, callback: impl FnMut(f32) + 'static) {
        if self.mounted {
            self.render_loop.add_callback(callback);
        }
    }

    pub fn set_render_mode(&mut self, mode: RenderMode) {
        if self.mounted {
            self.render_loop.set_mode(mode);
        }
    }

    /// Constant rotation of the points about +Y, in radians per second.
    pub fn set_auto_rotate(&mut self, speed: Option<f32>) {
        if !self.mounted {
            return;
        }
        self.auto_rotate = speed.filter(|s| *s != 0.0 && s.is_finite());
        self.render_loop.request_render();
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if !self.mounted {
            return;
        }
        self.camera.update_aspect(width, height);
        self.render_loop.request_render();
    }

    // ========================================================================
    // Pointer input (viewport pixels, origin top-left)
    // ========================================================================

    pub fn pointer_move(&mut self, x: f32, y: f32) {
        if !self.mounted {
            return;
        }
        self.scene.scene_mut().update_matrix_world();
        let targets = self
            .reconciler
            .pick_targets(self.scene.scene(), self.scene.resources());
        let motion = self
            .interaction
            .pointer_move(Vec2::new(x, y), &self.camera, &targets);

        match motion {
            PointerMotion::Idle => {}
            PointerMotion::HoverChanged => {
                self.reconciler
                    .apply_emphasis(&mut self.scene, self.interaction.selection());
                self.render_loop.request_render();
            }
            PointerMotion::Drag { button, delta } => {
                match button {
                    PointerButton::Primary => self.orbit.rotate(delta),
                    PointerButton::Secondary | PointerButton::Middle => self.orbit.pan(delta),
                }
                self.render_loop.request_render();
            }
        }
    }

    pub fn pointer_down(&mut self, x: f32, y: f32, button: PointerButton) {
        if self.mounted {
            self.interaction.pointer_down(Vec2::new(x, y), button);
        }
    }

    /// Ends a press; a click selects the point under the pointer (or clears
    /// the selection) and notifies `on_point_select`.
    pub fn pointer_up(&mut self, x: f32, y: f32) {
        if !self.mounted {
            return;
        }
        self.scene.scene_mut().update_matrix_world();
        let targets = self
            .reconciler
            .pick_targets(self.scene.scene(), self.scene.resources());
        let click = self
            .interaction
            .pointer_up(Vec2::new(x, y), &self.camera, &targets);

        let Some(click) = click else {
            return;
        };
        self.reconciler
            .apply_emphasis(&mut self.scene, self.interaction.selection());
        self.render_loop.request_render();

        let reading = click.selected.as_deref().and_then(|id| self.reconciler.reading(id));
        if let Some(callback) = self.on_point_select.as_mut() {
            callback(reading);
        }
    }

    pub fn pointer_leave(&mut self) {
        if self.mounted && self.interaction.pointer_leave() {
            self.reconciler
                .apply_emphasis(&mut self.scene, self.interaction.selection());
            self.render_loop.request_render();
        }
    }

    /// Wheel input in notches; positive moves closer.
    pub fn wheel(&mut self, steps: f32) {
        if !self.mounted || steps == 0.0 {
            return;
        }
        self.orbit.dolly(steps);
        self.render_loop.request_render();
    }

    // ========================================================================
    // View
    // ========================================================================

    pub fn set_view(&mut self, preset: ViewPreset) {
        if !self.mounted {
            return;
        }
        self.view.apply_preset(preset, &mut self.camera, &mut self.orbit);
        self.after_view_change(preset);
    }

    pub fn set_view_by_name(&mut self, name: &str) -> Result<()> {
        let preset = name.parse()?;
        self.set_view(preset);
        Ok(())
    }

    /// Perspective preset around the world origin.
    pub fn reset_view(&mut self) {
        if !self.mounted {
            return;
        }
        self.view.reset(&mut self.camera, &mut self.orbit);
        self.after_view_change(ViewPreset::Perspective);
    }

    fn after_view_change(&mut self, preset: ViewPreset) {
        self.group_angle = 0.0;
        if let Some(group) = self
            .reconciler
            .group()
            .and_then(|g| self.scene.scene_mut().get_node_mut(g))
        {
            group.transform.rotation = Quat::IDENTITY;
        }
        self.render_loop.request_render();
        if let Some(callback) = self.on_view_change.as_mut() {
            callback(preset);
        }
    }

    /// One zoom step closer. Returns the new zoom factor.
    pub fn zoom_in(&mut self) -> f32 {
        if !self.mounted {
            return self.zoom_factor();
        }
        let zoom = self.view.zoom_in(&mut self.camera, &mut self.orbit);
        self.render_loop.request_render();
        zoom
    }

    /// One zoom step away. Returns the new zoom factor.
    pub fn zoom_out(&mut self) -> f32 {
        if !self.mounted {
            return self.zoom_factor();
        }
        let zoom = self.view.zoom_out(&mut self.camera, &mut self.orbit);
        self.render_loop.request_render();
        zoom
    }

    // ========================================================================
    // Lighting
    // ========================================================================

    pub fn set_lighting_preset(&mut self, preset: LightingPreset) {
        if !self.mounted {
            return;
        }
        self.lighting.set_preset(&mut self.scene, preset);
        self.render_loop.request_render();
    }

    /// Unknown names are reported and leave the lights untouched.
    pub fn set_lighting_preset_by_name(&mut self, name: &str) -> Result<()> {
        if !self.mounted {
            return Ok(());
        }
        self.lighting.set_preset_by_name(&mut self.scene, name)?;
        self.render_loop.request_render();
        Ok(())
    }

    pub fn set_ambient_intensity(&mut self, intensity: f32) {
        if self.mounted {
            self.lighting.set_ambient_intensity(&mut self.scene, intensity);
            self.render_loop.request_render();
        }
    }

    pub fn set_directional_intensity(&mut self, intensity: f32) {
        if self.mounted {
            self.lighting.set_directional_intensity(&mut self.scene, intensity);
            self.render_loop.request_render();
        }
    }

    pub fn set_point_intensity(&mut self, intensity: f32) {
        if self.mounted {
            self.lighting.set_point_intensity(&mut self.scene, intensity);
            self.render_loop.request_render();
        }
    }

    pub fn toggle_ambient(&mut self, visible: bool) {
        if self.mounted {
            self.lighting.toggle_ambient(&mut self.scene, visible);
            self.render_loop.request_render();
        }
    }

    pub fn toggle_directional(&mut self, visible: bool) {
        if self.mounted {
            self.lighting.toggle_directional(&mut self.scene, visible);
            self.render_loop.request_render();
        }
    }

    pub fn toggle_point(&mut self, visible: bool) {
        if self.mounted {
            self.lighting.toggle_point(&mut self.scene, visible);
            self.render_loop.request_render();
        }
    }

    #[must_use]
    pub fn lighting_preset(&self) -> LightingPreset {
        self.lighting.preset()
    }

    #[must_use]
    pub fn light_intensities(&self) -> LightIntensities {
        self.lighting.intensities(&self.scene)
    }

    // ========================================================================
    // Callbacks
    // ========================================================================

    /// Called on every click with the clicked reading (or `None` for empty
    /// space), and with `None` when the selected sensor is evicted.
    pub fn on_point_select(&mut self, callback: impl FnMut(Option<&Reading>) + 'static) {
        if self.mounted {
            self.on_point_select = Some(Box::new(callback));
        }
    }

    pub fn on_view_change(&mut self, callback: impl FnMut(ViewPreset) + 'static) {
        if self.mounted {
            self.on_view_change = Some(Box::new(callback));
        }
    }

    // ========================================================================
    // Read-only state
    // ========================================================================

    #[must_use]
    pub fn zoom_factor(&self) -> f32 {
        self.view.zoom_factor(&self.camera)
    }

    #[must_use]
    pub fn view(&self) -> ViewPreset {
        self.view.view()
    }

    #[must_use]
    pub fn asset_count(&self) -> usize {
        self.reconciler.len()
    }

    /// Size of the last batch, before reduction and filtering.
    #[must_use]
    pub fn reading_count(&self) -> usize {
        self.readings.len()
    }

    #[must_use]
    pub fn selection(&self) -> &SelectionState {
        self.interaction.selection()
    }

    #[must_use]
    pub fn selected_reading(&self) -> Option<&Reading> {
        let id = self.interaction.selection().selected.as_deref()?;
        self.reconciler.reading(id)
    }

    #[must_use]
    pub fn cursor(&self) -> CursorStyle {
        self.interaction.cursor()
    }

    #[must_use]
    pub fn color_mode(&self) -> ColorMode {
        self.color_mode
    }

    #[must_use]
    pub fn layer_style(&self) -> &LayerStyle {
        &self.style
    }

    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.reconciler.is_animating(self.interpolation.epsilon())
    }

    #[must_use]
    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    #[must_use]
    pub fn camera(&self) -> &CameraManager {
        &self.camera
    }

    #[must_use]
    pub fn scene(&self) -> &SceneManager {
        &self.scene
    }

    #[must_use]
    pub fn reconciler(&self) -> &AssetReconciler {
        &self.reconciler
    }

    #[must_use]
    pub fn render_loop(&self) -> &RenderLoop {
        &self.render_loop
    }

    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Unmounts the viewer: stops the loop, releases every asset, helper and
    /// light, and drops user callbacks. Safe to call more than once.
    pub fn dispose(&mut self) {
        if !self.mounted {
            return;
        }
        self.mounted = false;

        self.render_loop.dispose();
        self.reconciler.dispose(&mut self.scene);
        self.lighting.dispose(&mut self.scene);
        self.scene.dispose();

        self.interaction.clear();
        self.orbit.stop();
        self.on_point_select = None;
        self.on_view_change = None;
        self.readings.clear();

        let resources = self.scene.resources();
        if resources.live_geometries() > 0 || resources.live_materials() > 0 {
            log::warn!(
                "Viewer unmounted with {} geometries and {} materials still alive",
                resources.live_geometries(),
                resources.live_materials()
            );
        } else {
            log::info!("Viewer unmounted");
        }
    }
}

impl Drop for Viewer3DPanel {
    fn drop(&mut self) {
        self.dispose();
    }
}
