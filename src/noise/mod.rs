//! Noise generation module for terrain and cloud synthesis.
//!
//! Implements Ken Perlin's reference gradient noise and its fractal
//! (multi-octave) composition.

mod fractal;
mod perlin;

pub use fractal::{FractalNoise, FractalNoiseConfig, LACUNARITY, MAX_OCTAVES};
pub use perlin::{fade, lerp, PerlinNoise, PermutationTable};
