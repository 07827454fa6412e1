//! Cloud voxel data structures.

use glam::{UVec3, Vec3};
use serde::{Deserialize, Serialize};

/// A single occupied cloud cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VoxelCell {
    /// Grid coordinate of the cell.
    pub grid: UVec3,
    /// World position (`grid + origin`).
    pub position: Vec3,
    /// Random uniform scale for the rendered voxel.
    pub scale: f32,
}

/// The occupied cells of one cloud grid, in traversal order
/// (z outer, y middle, x inner).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloudField {
    pub width: u32,
    pub height: u32,
    pub depth: u32,
    pub cells: Vec<VoxelCell>,
}

impl CloudField {
    /// Number of occupied cells.
    pub fn occupied_count(&self) -> usize {
        self.cells.len()
    }

    /// Total number of cells in the grid.
    pub fn cell_count(&self) -> u64 {
        self.width as u64 * self.height as u64 * self.depth as u64
    }

    /// Fraction of the grid that is occupied, in [0, 1].
    pub fn fill_ratio(&self) -> f32 {
        let total = self.cell_count();
        if total == 0 {
            return 0.0;
        }
        (self.cells.len() as f64 / total as f64) as f32
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// World positions of all occupied cells.
    pub fn positions(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.cells.iter().map(|cell| cell.position)
    }

    /// Axis-aligned bounds of occupied cell positions, or None if empty.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let mut positions = self.positions();
        let first = positions.next()?;
        Some(positions.fold((first, first), |(min, max), p| (min.min(p), max.max(p))))
    }
}
