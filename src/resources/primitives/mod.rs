pub mod lines;
pub mod sphere;

pub use lines::{create_axes, create_grid, create_line};
pub use sphere::{SphereOptions, create_sphere};
