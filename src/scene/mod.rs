//! Scene Graph Module
//!
//! Manages the hierarchy and the components attached to it:
//! - [`Node`]: hierarchy + transform
//! - [`Transform`]: position, rotation, scale with dirty tracking
//! - [`Scene`]: node arena plus mesh/light component pools
//! - [`SceneManager`]: scene + resource pool + grid/axes helpers
//! - [`CameraManager`]: orbit camera, viewport and base distance
//! - [`LightingManager`]: ambient/directional/point lights with presets

pub mod camera;
pub mod light;
pub mod lighting;
pub mod manager;
pub mod node;
#[allow(clippy::module_inception)]
pub mod scene;
pub mod transform;
pub mod transform_system;

pub use camera::{Camera, CameraManager, CameraState};
pub use light::{Light, LightKind};
pub use lighting::{LightIntensities, LightingManager, LightingPreset};
pub use manager::SceneManager;
pub use node::Node;
pub use scene::Scene;
pub use transform::Transform;

use slotmap::new_key_type;

new_key_type! {
    pub struct NodeHandle;
    pub struct MeshKey;
    pub struct LightKey;
}
