//! Multi-octave fractal composition of Perlin noise.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{require_finite, GenerationError};
use super::perlin::PerlinNoise;

/// Frequency multiplier applied per octave.
pub const LACUNARITY: f32 = 2.0;

/// Largest accepted octave count. The last octave samples at `2^31` times the
/// base frequency, far inside the `f32` range for any realistic coordinate.
pub const MAX_OCTAVES: u32 = 32;

/// Configuration for multi-octave fractal noise.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FractalNoiseConfig {
    /// Number of noise octaves, in `1..=MAX_OCTAVES`.
    pub octaves: u32,
    /// Amplitude decay per octave, in (0, 1].
    pub persistence: f32,
    /// Third coordinate used when sampling a 2D field. Not scaled by frequency.
    pub y_fixed: f32,
}

impl Default for FractalNoiseConfig {
    fn default() -> Self {
        Self {
            octaves: 4,
            persistence: 0.5,
            y_fixed: 0.0,
        }
    }
}

impl FractalNoiseConfig {
    /// A single octave; equivalent to sampling the raw noise.
    pub fn single_octave() -> Self {
        Self {
            octaves: 1,
            ..Default::default()
        }
    }

    /// Rough, detailed terrain.
    pub fn rugged() -> Self {
        Self {
            octaves: 6,
            persistence: 0.6,
            ..Default::default()
        }
    }

    /// Checks the octave count and persistence.
    pub fn validate(&self) -> Result<(), GenerationError> {
        if self.octaves < 1 || self.octaves > MAX_OCTAVES {
            return Err(GenerationError::invalid(
                "octaves",
                format!("must lie in 1..={MAX_OCTAVES}, got {}", self.octaves),
            ));
        }
        if !self.persistence.is_finite() || self.persistence <= 0.0 || self.persistence > 1.0 {
            return Err(GenerationError::invalid(
                "persistence",
                format!("must lie in (0, 1], got {}", self.persistence),
            ));
        }
        require_finite("y_fixed", self.y_fixed)
    }

    /// Sum of the per-octave amplitudes.
    pub fn amplitude_sum(&self) -> f32 {
        let mut amplitude = 1.0f32;
        let mut sum = 0.0f32;
        for _ in 0..self.octaves {
            sum += amplitude;
            amplitude *= self.persistence;
        }
        sum
    }
}

/// Fractal noise bound to a validated configuration.
#[derive(Debug, Clone, Copy)]
pub struct FractalNoise<'a> {
    noise: &'a PerlinNoise,
    config: FractalNoiseConfig,
    max_value: f32,
}

impl<'a> FractalNoise<'a> {
    /// Validates `config` and binds it to `noise`.
    pub fn new(noise: &'a PerlinNoise, config: FractalNoiseConfig) -> Result<Self, GenerationError> {
        config.validate()?;
        let max_value = config.amplitude_sum();
        if max_value == 0.0 || !max_value.is_finite() {
            return Err(GenerationError::DegenerateNormalization);
        }
        debug!(
            octaves = config.octaves,
            persistence = config.persistence,
            max_value,
            "fractal noise configured"
        );
        Ok(Self {
            noise,
            config,
            max_value,
        })
    }

    pub fn config(&self) -> &FractalNoiseConfig {
        &self.config
    }

    /// Samples a 2D field at `(x, z)`, with `y_fixed` as the noise's y coordinate.
    ///
    /// # Returns
    /// A value in approximately [0, 1], normalized by the amplitude sum.
    pub fn sample_2d(&self, x: f32, z: f32) -> f32 {
        let y = self.config.y_fixed;
        self.accumulate(|frequency| self.noise.sample(x * frequency, y, z * frequency))
    }

    /// Samples a 3D field at `(x, y, z)`.
    pub fn sample_3d(&self, x: f32, y: f32, z: f32) -> f32 {
        self.accumulate(|frequency| {
            self.noise
                .sample(x * frequency, y * frequency, z * frequency)
        })
    }

    fn accumulate(&self, sample: impl Fn(f32) -> f32) -> f32 {
        let mut total = 0.0f32;
        let mut amplitude = 1.0f32;
        let mut frequency = 1.0f32;

        for _ in 0..self.config.octaves {
            total += sample(frequency) * amplitude;
            amplitude *= self.config.persistence;
            frequency *= LACUNARITY;
        }

        total / self.max_value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = FractalNoiseConfig::default();
        assert_eq!(config.octaves, 4);
        assert_eq!(config.persistence, 0.5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_amplitude_sum() {
        let config = FractalNoiseConfig {
            octaves: 3,
            persistence: 0.5,
            y_fixed: 0.0,
        };
        assert!((config.amplitude_sum() - 1.75).abs() < 1e-6);
    }

    #[test]
    fn test_rejects_zero_octaves() {
        let noise = PerlinNoise::new();
        let config = FractalNoiseConfig {
            octaves: 0,
            ..Default::default()
        };
        assert!(matches!(
            FractalNoise::new(&noise, config),
            Err(GenerationError::InvalidParameter { name: "octaves", .. })
        ));
    }

    #[test]
    fn test_rejects_too_many_octaves() {
        let noise = PerlinNoise::new();
        for octaves in [MAX_OCTAVES + 1, 200] {
            let config = FractalNoiseConfig {
                octaves,
                persistence: 1.0,
                ..Default::default()
            };
            assert!(matches!(
                FractalNoise::new(&noise, config),
                Err(GenerationError::InvalidParameter { name: "octaves", .. })
            ));
        }
    }

    #[test]
    fn test_max_octaves_stays_in_range() {
        let noise = PerlinNoise::new();
        let config = FractalNoiseConfig {
            octaves: MAX_OCTAVES,
            persistence: 1.0,
            ..Default::default()
        };
        let fractal = FractalNoise::new(&noise, config).unwrap();
        for (x, z) in [(0.37, 0.91), (-12.5, 40.25), (1000.1, -3.3)] {
            let value = fractal.sample_2d(x, z);
            assert!(value.is_finite());
            assert!((-0.05..=1.05).contains(&value), "sample {} out of range", value);
        }
    }

    #[test]
    fn test_rejects_bad_persistence() {
        let noise = PerlinNoise::new();
        for persistence in [0.0, -0.5, 1.5, f32::NAN] {
            let config = FractalNoiseConfig {
                persistence,
                ..Default::default()
            };
            assert!(
                matches!(
                    FractalNoise::new(&noise, config),
                    Err(GenerationError::InvalidParameter { name: "persistence", .. })
                ),
                "persistence {} should be rejected",
                persistence
            );
        }
    }

    #[test]
    fn test_persistence_one_is_valid() {
        let noise = PerlinNoise::new();
        let config = FractalNoiseConfig {
            persistence: 1.0,
            ..Default::default()
        };
        assert!(FractalNoise::new(&noise, config).is_ok());
    }

    #[test]
    fn test_single_octave_matches_raw_noise() {
        let noise = PerlinNoise::new();
        let fractal = FractalNoise::new(&noise, FractalNoiseConfig::single_octave()).unwrap();
        for i in 0..50 {
            let x = i as f32 * 0.173;
            let z = i as f32 * -0.291;
            assert_eq!(fractal.sample_2d(x, z), noise.sample(x, 0.0, z));
            assert_eq!(fractal.sample_3d(x, 1.5, z), noise.sample(x, 1.5, z));
        }
    }

    #[test]
    fn test_noise_reproducibility() {
        let noise = PerlinNoise::new();
        let fractal = FractalNoise::new(&noise, FractalNoiseConfig::rugged()).unwrap();
        let a = fractal.sample_2d(12.34, 56.78);
        let b = fractal.sample_2d(12.34, 56.78);
        assert_eq!(a, b, "Same position should produce same result");
    }

    #[test]
    fn test_noise_range() {
        let noise = PerlinNoise::new();
        for config in [FractalNoiseConfig::default(), FractalNoiseConfig::rugged()] {
            let fractal = FractalNoise::new(&noise, config).unwrap();
            for ix in 0..40 {
                for iz in 0..40 {
                    let x = ix as f32 * 0.213;
                    let z = iz as f32 * 0.377;
                    let v2 = fractal.sample_2d(x, z);
                    let v3 = fractal.sample_3d(x, z * 0.5, z);
                    assert!(v2 >= -0.05 && v2 <= 1.05, "2D value {} out of range", v2);
                    assert!(v3 >= -0.05 && v3 <= 1.05, "3D value {} out of range", v3);
                }
            }
        }
    }

    #[test]
    fn test_y_fixed_changes_field() {
        let noise = PerlinNoise::new();
        let a = FractalNoise::new(&noise, FractalNoiseConfig::default()).unwrap();
        let b = FractalNoise::new(
            &noise,
            FractalNoiseConfig {
                y_fixed: 0.37,
                ..Default::default()
            },
        )
        .unwrap();
        let differs = (0..20).any(|i| {
            let x = 0.3 + i as f32 * 0.41;
            a.sample_2d(x, 0.7) != b.sample_2d(x, 0.7)
        });
        assert!(differs);
    }
}
