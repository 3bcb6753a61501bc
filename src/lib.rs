#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::too_many_arguments)]

pub mod app;
pub mod config;
pub mod errors;
pub mod render;
pub mod resources;
pub mod scene;
pub mod utils;
pub mod viewer;

pub use config::ViewerConfig;
pub use errors::{Result, ViewerError};
pub use render::{FrameScheduler, FrameSnapshot, ManualScheduler, RecordingTarget, RenderLoop, RenderMode, RenderTarget};
pub use resources::{Geometry, Material, Mesh, ResourcePool};
pub use scene::{Camera, CameraManager, LightingManager, LightingPreset, Node, Scene, SceneManager};
pub use utils::orbit_control::OrbitControls;
pub use viewer::{
    ColorMapper, ColorMode, CursorStyle, LayerStyle, PointerButton, Reading, SelectionState, ViewPreset,
    Viewer3DPanel,
};
