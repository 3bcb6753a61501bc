use crate::resources::pool::{GeometryHandle, MaterialHandle};

/// A drawable component: references a geometry and a material in the
/// [`ResourcePool`](crate::resources::ResourcePool). The mesh never owns them;
/// whoever allocated the handles releases them.
#[derive(Debug, Clone)]
pub struct Mesh {
    pub name: String,

    pub geometry: GeometryHandle,
    pub material: MaterialHandle,

    pub visible: bool,
    /// Draw order; lines are drawn after points
    pub render_order: i32,
}

impl Mesh {
    #[must_use]
    pub fn new(geometry: GeometryHandle, material: MaterialHandle) -> Self {
        Self {
            name: "Mesh".to_string(),
            geometry,
            material,
            visible: true,
            render_order: 0,
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn with_render_order(mut self, order: i32) -> Self {
        self.render_order = order;
        self
    }
}
