//! Procedural terrain and cloud synthesis from Perlin gradient noise.
//!
//! This crate provides a reference Perlin noise implementation with fractal
//! composition, a height-field terrain mesher and a thresholded cloud voxel
//! generator. Outputs are plain data for a renderer to consume.

pub mod clouds;
pub mod config;
pub mod error;
pub mod logging;
pub mod noise;
pub mod pipeline;
pub mod terrain;

pub use clouds::{generate_clouds, CloudCells, CloudConfig, CloudField, CloudMask, VoxelCell};
pub use config::{ConfigError, GeneratorConfig};
pub use error::GenerationError;
pub use noise::{FractalNoise, FractalNoiseConfig, PerlinNoise, PermutationTable};
pub use pipeline::{CloudStage, GenerationStage, Pipeline, PipelineError, TerrainStage, World};
pub use terrain::{generate_heightfield, HeightFieldMesh, TerrainConfig};
