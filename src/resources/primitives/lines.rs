use glam::Vec3;

use crate::resources::geometry::{Geometry, Topology};

/// A single two-point segment. Endpoints are updated in place via
/// [`Geometry::update_positions`].
#[must_use]
pub fn create_line(start: Vec3, end: Vec3) -> Geometry {
    Geometry::new(Topology::LineList).with_positions(vec![start, end])
}

/// Square grid on the XZ plane, centred on the origin.
#[must_use]
pub fn create_grid(size: f32, divisions: u32, color: Vec3) -> Geometry {
    let divisions = divisions.max(1);
    let half = size / 2.0;
    let step = size / divisions as f32;

    let line_count = ((divisions + 1) * 2) as usize;
    let mut positions = Vec::with_capacity(line_count * 2);

    for i in 0..=divisions {
        let k = -half + i as f32 * step;
        positions.push(Vec3::new(-half, 0.0, k));
        positions.push(Vec3::new(half, 0.0, k));
        positions.push(Vec3::new(k, 0.0, -half));
        positions.push(Vec3::new(k, 0.0, half));
    }

    let colors = vec![color; positions.len()];
    Geometry::new(Topology::LineList)
        .with_positions(positions)
        .with_colors(colors)
}

/// X (red), Y (green), Z (blue) axis segments starting at the origin.
#[must_use]
pub fn create_axes(size: f32) -> Geometry {
    let positions = vec![
        Vec3::ZERO,
        Vec3::X * size,
        Vec3::ZERO,
        Vec3::Y * size,
        Vec3::ZERO,
        Vec3::Z * size,
    ];
    let colors = vec![Vec3::X, Vec3::X, Vec3::Y, Vec3::Y, Vec3::Z, Vec3::Z];
    Geometry::new(Topology::LineList)
        .with_positions(positions)
        .with_colors(colors)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_has_two_lines_per_division_boundary() {
        let geo = create_grid(10.0, 10, Vec3::splat(0.5));
        assert_eq!(geo.positions().len(), 11 * 4);
        assert_eq!(geo.colors().len(), geo.positions().len());
    }
}
