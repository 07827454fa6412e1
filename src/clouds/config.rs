//! Configuration for cloud voxel generation.

use glam::{UVec3, Vec3};
use serde::{Deserialize, Serialize};

use crate::error::{require_finite, require_nonzero, require_positive, GenerationError};

/// Parameters for a thresholded cloud voxel field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CloudConfig {
    /// Grid size along x.
    pub width: u32,
    /// Grid size along y.
    pub height: u32,
    /// Grid size along z.
    pub depth: u32,
    /// Noise scale; larger values give bigger, smoother cloud masses.
    pub scale: f32,
    /// A cell is occupied when its noise sample is strictly above this value.
    pub threshold: f32,
    /// Offset used to vary the field without moving it.
    pub offset: Vec3,
    /// World position of grid cell (0, 0, 0).
    pub origin: Vec3,
    /// Inclusive range for the per-voxel random scale.
    pub scale_range: (f32, f32),
    /// Seed for the voxel scale random source.
    pub seed: u64,
}

impl Default for CloudConfig {
    fn default() -> Self {
        Self {
            width: 50,
            height: 20,
            depth: 20,
            scale: 7.0,
            threshold: 0.7,
            offset: Vec3::ZERO,
            origin: Vec3::ZERO,
            scale_range: (2.0, 8.0),
            seed: 42,
        }
    }
}

impl CloudConfig {
    /// Creates a configuration with the given grid size.
    pub fn with_size(width: u32, height: u32, depth: u32) -> Self {
        Self {
            width,
            height,
            depth,
            ..Default::default()
        }
    }

    /// Large, dense cloud banks.
    pub fn cumulus(seed: u64) -> Self {
        Self {
            width: 96,
            height: 24,
            depth: 96,
            scale: 12.0,
            threshold: 0.62,
            scale_range: (3.0, 9.0),
            seed,
            ..Default::default()
        }
    }

    /// Scattered wisps.
    pub fn sparse(seed: u64) -> Self {
        Self {
            scale: 5.0,
            threshold: 0.78,
            scale_range: (1.5, 4.0),
            seed,
            ..Default::default()
        }
    }

    /// Grid dimensions as a vector.
    pub fn dimensions(&self) -> UVec3 {
        UVec3::new(self.width, self.height, self.depth)
    }

    /// Total number of grid cells.
    pub fn cell_count(&self) -> u64 {
        self.width as u64 * self.height as u64 * self.depth as u64
    }

    /// Checks every parameter; generation never starts on an invalid config.
    pub fn validate(&self) -> Result<(), GenerationError> {
        require_nonzero("width", self.width)?;
        require_nonzero("height", self.height)?;
        require_nonzero("depth", self.depth)?;
        require_positive("scale", self.scale)?;
        require_finite("threshold", self.threshold)?;
        for (name, value) in [
            ("offset.x", self.offset.x),
            ("offset.y", self.offset.y),
            ("offset.z", self.offset.z),
            ("origin.x", self.origin.x),
            ("origin.y", self.origin.y),
            ("origin.z", self.origin.z),
        ] {
            require_finite(name, value)?;
        }

        let (min, max) = self.scale_range;
        if !min.is_finite() || !max.is_finite() || min > max || !(max - min).is_finite() {
            return Err(GenerationError::invalid(
                "scale_range",
                format!("must be a finite range with min <= max and a finite width, got [{min}, {max}]"),
            ));
        }
        Ok(())
    }
}
