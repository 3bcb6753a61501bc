//! Sensor Viewer Module
//!
//! Everything specific to displaying sensor readings:
//! - [`Reading`]: one decoded sample, plus batch reduction
//! - [`ColorMapper`]: reading to RGB, heatmap or per sensor type
//! - [`LayerStyle`]: opacity, point size, visibility, filter
//! - [`AssetReconciler`]: the sensor id to visual asset table
//! - [`InterpolationDriver`]: fixed-cadence easing toward targets
//! - [`InteractionController`]: hover, selection and drag detection
//! - [`ViewController`]: view presets and stepped zoom
//! - [`Viewer3DPanel`]: composition root and public surface

pub mod color;
pub mod interaction;
pub mod interpolation;
pub mod layer;
pub mod panel;
pub mod reading;
pub mod reconciler;
pub mod view;

pub use color::{ColorMapper, ColorMode, DefaultColorMapper, ValueRange};
pub use interaction::{
    Click, CursorStyle, Emphasis, InteractionController, PickTarget, PointerButton, PointerMotion, SelectionState,
};
pub use interpolation::InterpolationDriver;
pub use layer::{LayerStyle, ReadingFilter};
pub use panel::{PointSelectCallback, ViewChangeCallback, Viewer3DPanel};
pub use reading::{Position, Reading, Timestamp, reduce_latest};
pub use reconciler::{AssetReconciler, ReconcileContext, ReconcileStats, VisualAsset};
pub use view::{ViewController, ViewPreset};
