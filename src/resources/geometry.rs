use glam::{Affine3A, Vec3};
use uuid::Uuid;

/// How the vertices of a [`Geometry`] are assembled into primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topology {
    TriangleList,
    LineList,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BoundingBox {
    pub min: Vec3,
    pub max: Vec3,
}

impl BoundingBox {
    #[must_use]
    pub fn from_points(points: &[Vec3]) -> Option<Self> {
        let first = *points.first()?;
        let mut bbox = Self { min: first, max: first };
        for &p in &points[1..] {
            bbox.min = bbox.min.min(p);
            bbox.max = bbox.max.max(p);
        }
        Some(bbox)
    }

    #[must_use]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    #[must_use]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    #[must_use]
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BoundingSphere {
    pub center: Vec3,
    pub radius: f32,
}

impl BoundingSphere {
    /// Transforms the sphere into another space.
    ///
    /// Non-uniform scale is handled conservatively by taking the largest axis.
    #[must_use]
    pub fn transform(&self, matrix: &Affine3A) -> Self {
        let max_scale = matrix
            .matrix3
            .x_axis
            .length()
            .max(matrix.matrix3.y_axis.length())
            .max(matrix.matrix3.z_axis.length());
        Self {
            center: matrix.transform_point3(self.center),
            radius: self.radius * max_scale,
        }
    }
}

/// CPU-side description of a vertex buffer.
///
/// A GPU backend uploads `positions`/`colors`/`indices` when `version` moves
/// and frees its buffers when the owning [`ResourcePool`] entry is disposed.
///
/// [`ResourcePool`]: crate::resources::pool::ResourcePool
#[derive(Debug, Clone)]
pub struct Geometry {
    pub uuid: Uuid,
    pub topology: Topology,

    positions: Vec<Vec3>,
    normals: Vec<Vec3>,
    /// Optional per-vertex colors (grid and axes helpers)
    colors: Vec<Vec3>,
    indices: Vec<u32>,

    version: u64,
    bounding_sphere: BoundingSphere,
}

impl Geometry {
    #[must_use]
    pub fn new(topology: Topology) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            topology,
            positions: Vec::new(),
            normals: Vec::new(),
            colors: Vec::new(),
            indices: Vec::new(),
            version: 0,
            bounding_sphere: BoundingSphere::default(),
        }
    }

    #[must_use]
    pub fn with_positions(mut self, positions: Vec<Vec3>) -> Self {
        self.positions = positions;
        self.compute_bounding_sphere();
        self
    }

    #[must_use]
    pub fn with_normals(mut self, normals: Vec<Vec3>) -> Self {
        self.normals = normals;
        self
    }

    #[must_use]
    pub fn with_colors(mut self, colors: Vec<Vec3>) -> Self {
        self.colors = colors;
        self
    }

    #[must_use]
    pub fn with_indices(mut self, indices: Vec<u32>) -> Self {
        self.indices = indices;
        self
    }

    #[inline]
    #[must_use]
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    #[inline]
    #[must_use]
    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    #[inline]
    #[must_use]
    pub fn colors(&self) -> &[Vec3] {
        &self.colors
    }

    #[inline]
    #[must_use]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    #[inline]
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    #[inline]
    #[must_use]
    pub fn bounding_sphere(&self) -> BoundingSphere {
        self.bounding_sphere
    }

    /// Overwrites vertex positions in place, keeping the resource identity.
    pub fn update_positions(&mut self, positions: &[Vec3]) {
        if self.positions.len() == positions.len() {
            self.positions.copy_from_slice(positions);
        } else {
            self.positions = positions.to_vec();
        }
        self.version = self.version.wrapping_add(1);
        self.compute_bounding_sphere();
    }

    fn compute_bounding_sphere(&mut self) {
        let Some(bbox) = BoundingBox::from_points(&self.positions) else {
            self.bounding_sphere = BoundingSphere::default();
            return;
        };
        let center = bbox.center();
        let radius = self
            .positions
            .iter()
            .map(|p| p.distance_squared(center))
            .fold(0.0_f32, f32::max)
            .sqrt();
        self.bounding_sphere = BoundingSphere { center, radius };
    }
}
