//! Utility Module
//!
//! - [`OrbitControls`]: damped orbit/pan/dolly camera controller
//! - [`Ray`]: ray casting against bounding spheres
//! - [`time`]: platform `Instant` and the clamped [`DeltaClock`]

pub mod orbit_control;
pub mod ray;
pub mod time;

pub use orbit_control::OrbitControls;
pub use ray::Ray;
pub use time::DeltaClock;
