//! Thresholded cloud voxel generation from 3D Perlin noise.

use std::iter::FusedIterator;

use glam::{UVec3, Vec3};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use tracing::{debug, info, trace};

use crate::error::GenerationError;
use crate::noise::PerlinNoise;
use super::config::CloudConfig;
use super::voxel::{CloudField, VoxelCell};

/// Occupancy predicate over a validated cloud configuration.
#[derive(Debug, Clone)]
pub struct CloudMask<'a> {
    noise: &'a PerlinNoise,
    config: CloudConfig,
}

impl<'a> CloudMask<'a> {
    /// Validates `config` and binds it to `noise`.
    pub fn new(noise: &'a PerlinNoise, config: &CloudConfig) -> Result<Self, GenerationError> {
        config.validate()?;
        Ok(Self {
            noise,
            config: config.clone(),
        })
    }

    pub fn config(&self) -> &CloudConfig {
        &self.config
    }

    /// Noise density at a grid cell.
    pub fn density(&self, grid: UVec3) -> f32 {
        let c = &self.config;
        let x = (grid.x as f32 + c.origin.x + c.offset.x) / c.scale;
        let y = (grid.y as f32 + c.origin.y + c.offset.y) / c.scale;
        let z = (grid.z as f32 + c.origin.z + c.offset.z) / c.scale;
        self.noise.sample(x, y, z)
    }

    /// True when the cell's density is strictly above the threshold.
    #[inline]
    pub fn is_occupied(&self, grid: UVec3) -> bool {
        self.density(grid) > self.config.threshold
    }

    /// World position of a grid cell.
    #[inline]
    pub fn world_position(&self, grid: UVec3) -> Vec3 {
        grid.as_vec3() + self.config.origin
    }

    fn make_cell<R: Rng>(&self, grid: UVec3, rng: &mut R) -> VoxelCell {
        let (min, max) = self.config.scale_range;
        VoxelCell {
            grid,
            position: self.world_position(grid),
            scale: rng.random_range(min..=max),
        }
    }

    /// Occupied cells of one z-slice, y then x.
    fn occupied_in_slice(&self, z: u32) -> Vec<UVec3> {
        let mut occupied = Vec::new();
        for y in 0..self.config.height {
            for x in 0..self.config.width {
                let grid = UVec3::new(x, y, z);
                if self.is_occupied(grid) {
                    occupied.push(grid);
                }
            }
        }
        occupied
    }
}

/// Lazy, finite iterator over the occupied cells of a cloud grid.
///
/// Cells come out in z-outer, y-middle, x-inner order, each drawing one
/// scale from the random source. The iterator cannot be restarted; dropping
/// it early is a complete cancellation.
#[derive(Debug)]
pub struct CloudCells<'a, R> {
    mask: CloudMask<'a>,
    cursor: Option<UVec3>,
    visited: u64,
    rng: R,
}

impl<'a, R: Rng> CloudCells<'a, R> {
    /// Validates `config` and prepares the traversal.
    pub fn new(noise: &'a PerlinNoise, config: &CloudConfig, rng: R) -> Result<Self, GenerationError> {
        let mask = CloudMask::new(noise, config)?;
        Ok(Self {
            mask,
            cursor: Some(UVec3::ZERO),
            visited: 0,
            rng,
        })
    }

    /// Number of grid cells not yet tested.
    pub fn remaining_cells(&self) -> u64 {
        self.mask.config.cell_count() - self.visited
    }

    fn advance(&mut self, current: UVec3) {
        let dims = self.mask.config.dimensions();
        let mut next = current;
        next.x += 1;
        if next.x == dims.x {
            next.x = 0;
            next.y += 1;
            if next.y == dims.y {
                next.y = 0;
                next.z += 1;
            }
        }
        self.visited += 1;
        self.cursor = (next.z < dims.z).then_some(next);
    }
}

impl<R: Rng> Iterator for CloudCells<'_, R> {
    type Item = VoxelCell;

    fn next(&mut self) -> Option<VoxelCell> {
        while let Some(grid) = self.cursor {
            self.advance(grid);
            if self.mask.is_occupied(grid) {
                let cell = self.mask.make_cell(grid, &mut self.rng);
                trace!(x = grid.x, y = grid.y, z = grid.z, scale = cell.scale, "cloud cell");
                return Some(cell);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, usize::try_from(self.remaining_cells()).ok())
    }
}

impl<R: Rng> FusedIterator for CloudCells<'_, R> {}

/// Generates the cloud field for `config`, seeding the voxel scales from
/// `config.seed`.
///
/// # Errors
/// Returns `GenerationError::InvalidParameter` if any parameter is invalid.
pub fn generate_clouds(noise: &PerlinNoise, config: &CloudConfig) -> Result<CloudField, GenerationError> {
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    generate_clouds_with_rng(noise, config, &mut rng)
}

/// Generates the cloud field, drawing voxel scales from `rng`.
///
/// Z-slices are sampled in parallel; scales are then drawn in traversal
/// order, so the result equals collecting [`CloudCells`] over the same RNG.
pub fn generate_clouds_with_rng<R: Rng>(
    noise: &PerlinNoise,
    config: &CloudConfig,
    rng: &mut R,
) -> Result<CloudField, GenerationError> {
    let mask = CloudMask::new(noise, config)?;

    debug!(
        width = config.width,
        height = config.height,
        depth = config.depth,
        scale = config.scale,
        threshold = config.threshold,
        "generating cloud field"
    );

    let slices: Vec<Vec<UVec3>> = (0..config.depth)
        .into_par_iter()
        .map(|z| mask.occupied_in_slice(z))
        .collect();

    let cells: Vec<VoxelCell> = slices
        .into_iter()
        .flatten()
        .map(|grid| mask.make_cell(grid, &mut *rng))
        .collect();

    let field = CloudField {
        width: config.width,
        height: config.height,
        depth: config.depth,
        cells,
    };

    info!(
        occupied = field.occupied_count(),
        total = field.cell_count(),
        "cloud field generated"
    );
    Ok(field)
}
