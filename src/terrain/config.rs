//! Configuration for height-field terrain generation.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::{require_finite, require_nonzero, require_positive, GenerationError};
use crate::noise::FractalNoiseConfig;

/// Parameters for a height-field terrain mesh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// Number of cells along x.
    pub width: u32,
    /// Number of cells along z.
    pub depth: u32,
    /// Noise scale; larger values give smoother, lower-frequency terrain.
    pub scale: f32,
    /// Multiplier applied to the normalized fractal sample.
    pub height_multiplier: f32,
    /// Offset added to grid coordinates before scaling. Only x and z are used.
    pub offset: Vec3,
    /// Fractal noise parameters.
    pub noise: FractalNoiseConfig,
    /// Half-width of the per-vertex height jitter, if enabled.
    pub jitter: Option<f32>,
    /// Seed for the jitter random source.
    pub seed: u64,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            width: 200,
            depth: 200,
            scale: 25.0,
            height_multiplier: 40.0,
            offset: Vec3::ZERO,
            noise: FractalNoiseConfig::default(),
            jitter: None,
            seed: 42,
        }
    }
}

impl TerrainConfig {
    /// Creates a configuration with the given grid size and default noise.
    pub fn with_size(width: u32, depth: u32) -> Self {
        Self {
            width,
            depth,
            ..Default::default()
        }
    }

    /// Rolling hills with extra octaves and a slight surface roughness.
    pub fn hills(seed: u64) -> Self {
        Self {
            scale: 60.0,
            height_multiplier: 25.0,
            noise: FractalNoiseConfig {
                octaves: 5,
                persistence: 0.45,
                ..Default::default()
            },
            jitter: Some(0.1),
            seed,
            ..Default::default()
        }
    }

    /// Low, smooth plains.
    pub fn flat(seed: u64) -> Self {
        Self {
            scale: 120.0,
            height_multiplier: 8.0,
            noise: FractalNoiseConfig {
                octaves: 2,
                persistence: 0.3,
                ..Default::default()
            },
            seed,
            ..Default::default()
        }
    }

    /// Number of vertices in the generated mesh, saturating at `u64::MAX`.
    pub fn vertex_count(&self) -> u64 {
        (self.width as u64 + 1).saturating_mul(self.depth as u64 + 1)
    }

    /// Number of triangles in the generated mesh, saturating at `u64::MAX`.
    pub fn triangle_count(&self) -> u64 {
        (self.width as u64 * self.depth as u64).saturating_mul(2)
    }

    /// Checks every parameter; generation never starts on an invalid config.
    pub fn validate(&self) -> Result<(), GenerationError> {
        require_nonzero("width", self.width)?;
        require_nonzero("depth", self.depth)?;
        require_positive("scale", self.scale)?;
        require_finite("height_multiplier", self.height_multiplier)?;
        require_finite("offset.x", self.offset.x)?;
        require_finite("offset.z", self.offset.z)?;
        self.noise.validate()?;

        if let Some(amplitude) = self.jitter {
            // The draw range spans 2 * amplitude and must itself be finite.
            if !(2.0 * amplitude).is_finite() || amplitude < 0.0 {
                return Err(GenerationError::invalid(
                    "jitter",
                    format!("must be a non-negative number below f32::MAX / 2, got {amplitude}"),
                ));
            }
        }

        let vertices = (self.width as u64 + 1).checked_mul(self.depth as u64 + 1);
        let fits = vertices.is_some_and(|n| n <= u32::MAX as u64)
            && usize::try_from(self.triangle_count()).is_ok();
        if !fits {
            return Err(GenerationError::invalid(
                "width",
                format!(
                    "{}x{} grid has too many vertices for 32-bit indices",
                    self.width, self.depth
                ),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TerrainConfig::default();
        assert_eq!(config.width, 200);
        assert_eq!(config.depth, 200);
        assert_eq!(config.scale, 25.0);
        assert_eq!(config.height_multiplier, 40.0);
        assert!(config.jitter.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_presets_are_valid() {
        assert!(TerrainConfig::hills(1).validate().is_ok());
        assert!(TerrainConfig::flat(2).validate().is_ok());
        assert_eq!(TerrainConfig::hills(7).seed, 7);
    }

    #[test]
    fn test_counts() {
        let config = TerrainConfig::with_size(2, 3);
        assert_eq!(config.vertex_count(), 12);
        assert_eq!(config.triangle_count(), 12);
    }

    #[test]
    fn test_counts_saturate_on_huge_grids() {
        let config = TerrainConfig::with_size(u32::MAX, u32::MAX);
        assert_eq!(config.vertex_count(), u64::MAX);
        assert_eq!(config.triangle_count(), u64::MAX);
    }

    #[test]
    fn test_largest_jitter_is_valid() {
        let config = TerrainConfig {
            jitter: Some(f32::MAX / 4.0),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_invalid_parameters() {
        let cases = [
            ("width", TerrainConfig { width: 0, ..Default::default() }),
            ("depth", TerrainConfig { depth: 0, ..Default::default() }),
            ("scale", TerrainConfig { scale: 0.0, ..Default::default() }),
            ("scale", TerrainConfig { scale: -1.0, ..Default::default() }),
            ("jitter", TerrainConfig { jitter: Some(-0.5), ..Default::default() }),
            ("jitter", TerrainConfig { jitter: Some(f32::NAN), ..Default::default() }),
            ("jitter", TerrainConfig { jitter: Some(f32::MAX), ..Default::default() }),
            ("width", TerrainConfig::with_size(u32::MAX, u32::MAX)),
            ("width", TerrainConfig::with_size(u32::MAX, 1)),
            ("width", TerrainConfig::with_size(70_000, 70_000)),
        ];
        for (expected, config) in cases {
            match config.validate() {
                Err(GenerationError::InvalidParameter { name, .. }) => assert_eq!(name, expected),
                other => panic!("expected invalid '{}', got {:?}", expected, other),
            }
        }
    }

    #[test]
    fn test_negative_offset_is_valid() {
        let config = TerrainConfig {
            offset: Vec3::new(-100.0, 0.0, -250.0),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }
}
