//! Cloud generation module.
//!
//! Thresholds 3D Perlin noise over a voxel grid to produce a sparse set of
//! occupied cloud cells.

mod config;
mod generator;
mod voxel;

pub use config::CloudConfig;
pub use generator::{generate_clouds, generate_clouds_with_rng, CloudCells, CloudMask};
pub use voxel::{CloudField, VoxelCell};
