//! Height-field mesh data structure.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// A regular grid of vertices triangulated into two triangles per cell.
///
/// Vertex `(x, z)` lives at index `z * (width + 1) + x`. Every triangle
/// references valid vertex indices and all triangles share the same winding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeightFieldMesh {
    /// Number of cells along x.
    pub width: u32,
    /// Number of cells along z.
    pub depth: u32,
    /// Vertex positions `(x, height, z)` in row-major order.
    pub vertices: Vec<Vec3>,
    /// Triangle vertex indices.
    pub triangles: Vec<[u32; 3]>,
}

impl HeightFieldMesh {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Flat index of the vertex at grid position `(x, z)`.
    #[inline]
    pub fn vertex_index(&self, x: u32, z: u32) -> usize {
        (z as usize) * (self.width as usize + 1) + x as usize
    }

    /// Returns the height at grid vertex `(x, z)`, or None if out of bounds.
    pub fn height_at(&self, x: u32, z: u32) -> Option<f32> {
        if x > self.width || z > self.depth {
            return None;
        }
        self.vertices.get(self.vertex_index(x, z)).map(|v| v.y)
    }

    /// Computes the min and max height over all vertices.
    pub fn height_range(&self) -> (f32, f32) {
        let mut min = f32::MAX;
        let mut max = f32::MIN;

        for vertex in &self.vertices {
            min = min.min(vertex.y);
            max = max.max(vertex.y);
        }

        (min, max)
    }

    /// Triangle indices flattened into a single list, three per triangle.
    pub fn flat_indices(&self) -> Vec<u32> {
        self.triangles.iter().flatten().copied().collect()
    }

    /// Returns an iterator over all (x, z) grid vertex coordinates in index order.
    pub fn grid_coords(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        let (width, depth) = (self.width, self.depth);
        (0..=depth).flat_map(move |z| (0..=width).map(move |x| (x, z)))
    }
}
