//! Terrain generation module.
//!
//! Samples fractal noise over a regular grid and triangulates it into a
//! height-field mesh.

mod config;
mod heightfield;
mod mesh;

pub use config::TerrainConfig;
pub use heightfield::{generate_heightfield, generate_heightfield_with_rng, sample_height};
pub use mesh::HeightFieldMesh;
