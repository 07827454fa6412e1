//! Height-field mesh generation using fractal noise.

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::error::GenerationError;
use crate::noise::{FractalNoise, PerlinNoise};
use super::config::TerrainConfig;
use super::mesh::HeightFieldMesh;

/// Generates a terrain mesh from `config`.
///
/// Without jitter the output depends only on `config`. With jitter enabled
/// the random source is a `ChaCha8Rng` seeded from `config.seed`, so the
/// result is still reproducible.
///
/// # Errors
/// Returns `GenerationError::InvalidParameter` if any parameter is invalid.
pub fn generate_heightfield(
    noise: &PerlinNoise,
    config: &TerrainConfig,
) -> Result<HeightFieldMesh, GenerationError> {
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    generate_heightfield_with_rng(noise, config, &mut rng)
}

/// Generates a terrain mesh, drawing jitter from `rng`.
///
/// `rng` is only consumed when `config.jitter` is set, one draw per vertex
/// in index order.
pub fn generate_heightfield_with_rng<R: Rng>(
    noise: &PerlinNoise,
    config: &TerrainConfig,
    rng: &mut R,
) -> Result<HeightFieldMesh, GenerationError> {
    config.validate()?;
    let fractal = FractalNoise::new(noise, config.noise)?;

    debug!(
        width = config.width,
        depth = config.depth,
        scale = config.scale,
        jitter = ?config.jitter,
        "generating height field"
    );

    let mut vertices = generate_vertices(&fractal, config);
    if let Some(amplitude) = config.jitter {
        for vertex in &mut vertices {
            vertex.y += rng.random_range(-amplitude..=amplitude);
        }
    }
    let triangles = generate_triangles(config);

    let mesh = HeightFieldMesh {
        width: config.width,
        depth: config.depth,
        vertices,
        triangles,
    };

    let (min, max) = mesh.height_range();
    info!(
        vertices = mesh.vertex_count(),
        triangles = mesh.triangle_count(),
        min_height = min,
        max_height = max,
        "height field generated"
    );
    Ok(mesh)
}

/// Height of the terrain surface at grid position `(x, z)`, before jitter.
///
/// `x` and `z` need not be integers; the fractal is continuous.
pub fn sample_height(fractal: &FractalNoise<'_>, config: &TerrainConfig, x: f32, z: f32) -> f32 {
    let nx = (x + config.offset.x) / config.scale;
    let nz = (z + config.offset.z) / config.scale;
    fractal.sample_2d(nx, nz) * config.height_multiplier
}

fn generate_vertices(fractal: &FractalNoise<'_>, config: &TerrainConfig) -> Vec<Vec3> {
    let row = config.width + 1;
    let mut vertices = vec![Vec3::ZERO; config.vertex_count() as usize];

    vertices.par_iter_mut().enumerate().for_each(|(i, vertex)| {
        let x = (i as u32 % row) as f32;
        let z = (i as u32 / row) as f32;
        *vertex = Vec3::new(x, sample_height(fractal, config, x, z), z);
    });

    vertices
}

/// Two triangles per cell with the same winding, so recomputed normals all
/// point to the same side of the surface.
fn generate_triangles(config: &TerrainConfig) -> Vec<[u32; 3]> {
    let width = config.width;
    let row = width + 1;
    // Validation guarantees the count fits in usize.
    let mut triangles = vec![[0u32; 3]; config.triangle_count() as usize];

    triangles
        .par_chunks_mut(2)
        .enumerate()
        .for_each(|(cell, pair)| {
            let x = cell as u32 % width;
            let z = cell as u32 / width;
            let i = z * row + x;
            pair[0] = [i, i + row, i + 1];
            pair[1] = [i + 1, i + row, i + row + 1];
        });

    triangles
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noise::FractalNoiseConfig;

    fn unit_config() -> TerrainConfig {
        TerrainConfig {
            width: 1,
            depth: 1,
            scale: 1.0,
            height_multiplier: 1.0,
            offset: Vec3::ZERO,
            noise: FractalNoiseConfig {
                octaves: 1,
                persistence: 0.5,
                y_fixed: 0.0,
            },
            jitter: None,
            seed: 0,
        }
    }

    #[test]
    fn test_single_cell_scenario() {
        let noise = PerlinNoise::new();
        let config = unit_config();
        let mesh = generate_heightfield(&noise, &config).unwrap();

        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.triangles, vec![[0, 2, 1], [1, 2, 3]]);

        let fractal = FractalNoise::new(&noise, config.noise).unwrap();
        let corners = [(0.0, 0.0), (1.0, 0.0), (0.0, 1.0), (1.0, 1.0)];
        for (vertex, &(x, z)) in mesh.vertices.iter().zip(corners.iter()) {
            assert_eq!(vertex.x, x);
            assert_eq!(vertex.z, z);
            assert_eq!(vertex.y, fractal.sample_2d(x, z));
        }
    }

    #[test]
    fn test_mesh_topology() {
        let noise = PerlinNoise::new();
        let config = TerrainConfig {
            width: 2,
            depth: 2,
            ..Default::default()
        };
        let mesh = generate_heightfield(&noise, &config).unwrap();

        assert_eq!(mesh.vertex_count(), 9);
        assert_eq!(mesh.triangle_count(), 8);
        assert!(mesh.flat_indices().iter().all(|&i| i < 9));
    }

    #[test]
    fn test_rectangular_grid_indices() {
        let noise = PerlinNoise::new();
        let config = TerrainConfig::with_size(5, 3);
        let mesh = generate_heightfield(&noise, &config).unwrap();

        assert_eq!(mesh.vertex_count(), 24);
        assert_eq!(mesh.triangle_count(), 30);
        for (i, vertex) in mesh.vertices.iter().enumerate() {
            assert_eq!(mesh.vertex_index(vertex.x as u32, vertex.z as u32), i);
        }
        // Last cell (x = 4, z = 2).
        assert_eq!(mesh.triangles[28], [16, 22, 17]);
        assert_eq!(mesh.triangles[29], [17, 22, 23]);
    }

    #[test]
    fn test_winding_faces_up() {
        let noise = PerlinNoise::new();
        let mesh = generate_heightfield(&noise, &TerrainConfig::with_size(4, 4)).unwrap();
        for tri in &mesh.triangles {
            let a = mesh.vertices[tri[0] as usize];
            let b = mesh.vertices[tri[1] as usize];
            let c = mesh.vertices[tri[2] as usize];
            // Flattened to the xz plane all triangles must share one orientation.
            let flat = |v: Vec3| Vec3::new(v.x, 0.0, v.z);
            let normal = (flat(b) - flat(a)).cross(flat(c) - flat(a));
            assert!(normal.y > 0.0, "triangle {:?} has inconsistent winding", tri);
        }
    }

    #[test]
    fn test_heightfield_reproducibility() {
        let noise = PerlinNoise::new();
        let config = TerrainConfig::with_size(16, 16);
        let a = generate_heightfield(&noise, &config).unwrap();
        let b = generate_heightfield(&noise, &config).unwrap();
        assert_eq!(a, b, "Same configuration should produce identical meshes");
    }

    #[test]
    fn test_offset_shifts_terrain() {
        let noise = PerlinNoise::new();
        let base = TerrainConfig::with_size(8, 8);
        let shifted = TerrainConfig {
            offset: Vec3::new(3.0, 0.0, 2.0),
            ..base.clone()
        };
        let a = generate_heightfield(&noise, &base).unwrap();
        let b = generate_heightfield(&noise, &shifted).unwrap();
        // Vertex (0, 0) of the shifted mesh samples where (3, 2) of the base does.
        assert_eq!(b.height_at(0, 0), a.height_at(3, 2));
    }

    #[test]
    fn test_jitter_off_draws_nothing() {
        let noise = PerlinNoise::new();
        let config = TerrainConfig::with_size(4, 4);
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        generate_heightfield_with_rng(&noise, &config, &mut rng).unwrap();

        let mut fresh = ChaCha8Rng::seed_from_u64(9);
        assert_eq!(rng.random::<u64>(), fresh.random::<u64>());
    }

    #[test]
    fn test_jitter_is_bounded_and_seeded() {
        let noise = PerlinNoise::new();
        let base = TerrainConfig::with_size(10, 10);
        let jittered = TerrainConfig {
            jitter: Some(0.5),
            ..base.clone()
        };

        let smooth = generate_heightfield(&noise, &base).unwrap();
        let a = generate_heightfield(&noise, &jittered).unwrap();
        let b = generate_heightfield(&noise, &jittered).unwrap();
        assert_eq!(a, b, "Same seed should give the same jitter");

        let mut moved = 0;
        for (s, j) in smooth.vertices.iter().zip(a.vertices.iter()) {
            let delta = (j.y - s.y).abs();
            assert!(delta <= 0.5 + 1e-4, "jitter {} exceeds amplitude", delta);
            assert_eq!((s.x, s.z), (j.x, j.z));
            if delta > 0.0 {
                moved += 1;
            }
        }
        assert!(moved > 0);
        assert_eq!(smooth.triangles, a.triangles);
    }

    #[test]
    fn test_unrepresentable_jitter_is_rejected() {
        let noise = PerlinNoise::new();
        let config = TerrainConfig {
            jitter: Some(f32::MAX),
            ..TerrainConfig::with_size(2, 2)
        };
        assert!(matches!(
            generate_heightfield(&noise, &config),
            Err(GenerationError::InvalidParameter { name: "jitter", .. })
        ));

        let widest = TerrainConfig {
            jitter: Some(f32::MAX / 2.0),
            ..config
        };
        let mesh = generate_heightfield(&noise, &widest).unwrap();
        assert!(mesh.vertices.iter().all(|v| v.y.is_finite()));
    }

    #[test]
    fn test_oversized_grid_is_rejected() {
        let noise = PerlinNoise::new();
        for config in [
            TerrainConfig::with_size(u32::MAX, u32::MAX),
            TerrainConfig::with_size(u32::MAX, 1),
        ] {
            assert!(matches!(
                generate_heightfield(&noise, &config),
                Err(GenerationError::InvalidParameter { name: "width", .. })
            ));
        }
    }

    #[test]
    fn test_rejects_zero_scale_before_generating() {
        let noise = PerlinNoise::new();
        let config = TerrainConfig {
            scale: 0.0,
            ..TerrainConfig::with_size(4, 4)
        };
        assert!(matches!(
            generate_heightfield(&noise, &config),
            Err(GenerationError::InvalidParameter { name: "scale", .. })
        ));
    }

    #[test]
    fn test_height_multiplier_scales_heights() {
        let noise = PerlinNoise::new();
        let config = TerrainConfig::with_size(6, 6);
        let doubled = TerrainConfig {
            height_multiplier: config.height_multiplier * 2.0,
            ..config.clone()
        };
        let a = generate_heightfield(&noise, &config).unwrap();
        let b = generate_heightfield(&noise, &doubled).unwrap();
        for (va, vb) in a.vertices.iter().zip(b.vertices.iter()) {
            assert!((vb.y - va.y * 2.0).abs() < 1e-4);
        }
    }
}
