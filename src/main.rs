//! Noisescape CLI - procedural terrain and cloud generator.
//!
//! Generates a height-field terrain mesh and a cloud voxel field from
//! Perlin noise and prints a summary of the results.

use clap::{Parser, Subcommand, ValueEnum};
use glam::Vec3;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, trace};

use noisescape::clouds::{generate_clouds, CloudCells, CloudConfig, CloudField};
use noisescape::config::GeneratorConfig;
use noisescape::noise::{FractalNoiseConfig, PerlinNoise};
use noisescape::pipeline::Pipeline;
use noisescape::terrain::{generate_heightfield, HeightFieldMesh, TerrainConfig};

/// Procedural terrain and cloud generator.
#[derive(Parser)]
#[command(name = "noisescape")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Default log level when RUST_LOG is unset.
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a height-field terrain mesh.
    Terrain {
        /// Number of cells along x.
        #[arg(long, default_value = "200")]
        width: u32,

        /// Number of cells along z.
        #[arg(long, default_value = "200")]
        depth: u32,

        /// Noise scale (larger = smoother).
        #[arg(long, default_value = "25.0")]
        scale: f32,

        /// Height multiplier applied to the normalized noise.
        #[arg(long, default_value = "40.0")]
        height_multiplier: f32,

        /// Sampling offset as "x,y,z".
        #[arg(long, value_parser = parse_vec3, default_value = "0,0,0")]
        offset: Vec3,

        /// Number of noise octaves.
        #[arg(long, default_value = "4")]
        octaves: u32,

        /// Amplitude decay per octave, in (0, 1].
        #[arg(long, default_value = "0.5")]
        persistence: f32,

        /// Fixed y coordinate of the 2D noise slice.
        #[arg(long, default_value = "0.0")]
        y_fixed: f32,

        /// Enable per-vertex height jitter in [-JITTER, JITTER].
        #[arg(long)]
        jitter: Option<f32>,

        /// Random seed for the jitter.
        #[arg(short, long)]
        seed: Option<u64>,
    },

    /// Generate a cloud voxel field.
    Clouds {
        /// Grid size along x.
        #[arg(long, default_value = "50")]
        width: u32,

        /// Grid size along y.
        #[arg(long, default_value = "20")]
        height: u32,

        /// Grid size along z.
        #[arg(long, default_value = "20")]
        depth: u32,

        /// Noise scale (larger = bigger cloud masses).
        #[arg(long, default_value = "7.0")]
        scale: f32,

        /// Occupancy threshold; cells above it become voxels.
        #[arg(long, default_value = "0.7")]
        threshold: f32,

        /// Sampling offset as "x,y,z".
        #[arg(long, value_parser = parse_vec3, default_value = "0,0,0")]
        offset: Vec3,

        /// World position of the grid origin as "x,y,z".
        #[arg(long, value_parser = parse_vec3, default_value = "0,0,0")]
        origin: Vec3,

        /// Minimum voxel scale.
        #[arg(long, default_value = "2.0")]
        min_scale: f32,

        /// Maximum voxel scale.
        #[arg(long, default_value = "8.0")]
        max_scale: f32,

        /// Random seed for the voxel scales.
        #[arg(short, long)]
        seed: Option<u64>,

        /// Stream cells in batches of this size instead of one bulk call.
        #[arg(long)]
        batch: Option<usize>,
    },

    /// Run the full terrain + cloud pipeline.
    Generate {
        /// JSON configuration file; overrides --preset.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Built-in configuration preset.
        #[arg(short, long, default_value = "default")]
        preset: Preset,

        /// Seed applied to every stage.
        #[arg(short, long)]
        seed: Option<u64>,

        /// Print the effective configuration as JSON before running.
        #[arg(long)]
        print_config: bool,
    },

    /// Display size estimates for a configuration.
    Info {
        /// Terrain cells along x.
        #[arg(long, default_value = "200")]
        width: u32,

        /// Terrain cells along z.
        #[arg(long, default_value = "200")]
        depth: u32,

        /// Cloud grid size along x.
        #[arg(long, default_value = "50")]
        cloud_width: u32,

        /// Cloud grid size along y.
        #[arg(long, default_value = "20")]
        cloud_height: u32,

        /// Cloud grid size along z.
        #[arg(long, default_value = "20")]
        cloud_depth: u32,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Preset {
    /// Stock terrain and cloud settings.
    Default,
    /// Hilly terrain under dense cumulus.
    Highlands,
    /// Flat plains with scattered clouds.
    Plains,
}

fn main() {
    let cli = Cli::parse();
    noisescape::logging::init(&cli.log_level);

    match cli.command {
        Commands::Terrain {
            width,
            depth,
            scale,
            height_multiplier,
            offset,
            octaves,
            persistence,
            y_fixed,
            jitter,
            seed,
        } => {
            let config = TerrainConfig {
                width,
                depth,
                scale,
                height_multiplier,
                offset,
                noise: FractalNoiseConfig {
                    octaves,
                    persistence,
                    y_fixed,
                },
                jitter,
                seed: seed.unwrap_or_else(time_seed),
            };
            run_terrain(&config);
        }
        Commands::Clouds {
            width,
            height,
            depth,
            scale,
            threshold,
            offset,
            origin,
            min_scale,
            max_scale,
            seed,
            batch,
        } => {
            let config = CloudConfig {
                width,
                height,
                depth,
                scale,
                threshold,
                offset,
                origin,
                scale_range: (min_scale, max_scale),
                seed: seed.unwrap_or_else(time_seed),
            };
            run_clouds(&config, batch);
        }
        Commands::Generate {
            config,
            preset,
            seed,
            print_config,
        } => {
            run_generate(config, preset, seed, print_config);
        }
        Commands::Info {
            width,
            depth,
            cloud_width,
            cloud_height,
            cloud_depth,
        } => {
            run_info(width, depth, cloud_width, cloud_height, cloud_depth);
        }
    }
}

fn run_terrain(config: &TerrainConfig) {
    println!("Noisescape - Terrain");
    println!("====================");
    println!("Grid: {}x{} cells", config.width, config.depth);
    println!("Seed: {}", config.seed);

    let start = Instant::now();
    let noise = PerlinNoise::new();
    let mesh = generate_heightfield(&noise, config).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });
    println!("Generation completed in {:.2?}", start.elapsed());
    print_terrain_summary(&mesh);
}

fn run_clouds(config: &CloudConfig, batch: Option<usize>) {
    println!("Noisescape - Clouds");
    println!("===================");
    println!("Grid: {}x{}x{} cells", config.width, config.height, config.depth);
    println!("Seed: {}", config.seed);

    let start = Instant::now();
    let noise = PerlinNoise::new();

    let field = match batch {
        Some(size) => stream_clouds(&noise, config, size.max(1)),
        None => generate_clouds(&noise, config).unwrap_or_else(|e| {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }),
    };
    println!("Generation completed in {:.2?}", start.elapsed());
    print_cloud_summary(&field);
}

/// Pulls cells from the lazy iterator `batch` at a time, the way a frame
/// loop would spread the work across ticks.
fn stream_clouds(noise: &PerlinNoise, config: &CloudConfig, batch: usize) -> CloudField {
    let rng = ChaCha8Rng::seed_from_u64(config.seed);
    let mut stream = CloudCells::new(noise, config, rng).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    let mut cells = Vec::new();
    let mut ticks = 0usize;
    loop {
        let before = cells.len();
        cells.extend(stream.by_ref().take(batch));
        let emitted = cells.len() - before;
        if emitted == 0 {
            break;
        }
        ticks += 1;
        trace!(tick = ticks, emitted, remaining = stream.remaining_cells(), "cloud batch");
    }
    info!(ticks, cells = cells.len(), "cloud stream drained");

    CloudField {
        width: config.width,
        height: config.height,
        depth: config.depth,
        cells,
    }
}

fn run_generate(path: Option<PathBuf>, preset: Preset, seed: Option<u64>, print_config: bool) {
    let mut config = match &path {
        Some(path) => GeneratorConfig::from_json_file(path).unwrap_or_else(|e| {
            eprintln!("Error loading {}: {}", path.display(), e);
            std::process::exit(1);
        }),
        None => match preset {
            Preset::Default => GeneratorConfig::default(),
            Preset::Highlands => GeneratorConfig::highlands(seed.unwrap_or(42)),
            Preset::Plains => GeneratorConfig::plains(seed.unwrap_or(42)),
        },
    };
    if let Some(seed) = seed {
        config = config.with_seed(seed);
    }

    println!("Noisescape - Terrain & Clouds");
    println!("=============================");
    if let Some(path) = &path {
        println!("Config: {}", path.display());
    }
    if print_config {
        match config.to_json_string() {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("Error printing config: {}", e),
        }
    }

    let start = Instant::now();
    let pipeline = Pipeline::from_config(&config);
    println!("Running generation pipeline ({} stages)...", pipeline.stage_count());

    let world = pipeline
        .run_with_callbacks(
            |name, i, total| {
                println!("  [{}/{}] Starting: {}", i + 1, total, name);
            },
            |name, i, total| {
                println!("  [{}/{}] Completed: {}", i + 1, total, name);
            },
        )
        .unwrap_or_else(|e| {
            eprintln!("Error during generation: {}", e);
            std::process::exit(1);
        });
    println!("Generation completed in {:.2?}", start.elapsed());

    if let Some(mesh) = &world.terrain {
        print_terrain_summary(mesh);
    }
    if let Some(field) = &world.clouds {
        print_cloud_summary(field);
    }
}

fn print_terrain_summary(mesh: &HeightFieldMesh) {
    let (min_h, max_h) = mesh.height_range();
    println!();
    println!("Terrain:");
    println!("  Vertices:     {:>10}", mesh.vertex_count());
    println!("  Triangles:    {:>10}", mesh.triangle_count());
    println!("  Height range: [{:.4}, {:.4}]", min_h, max_h);
}

fn print_cloud_summary(field: &CloudField) {
    println!();
    println!("Clouds:");
    println!("  Cells:        {:>10}", field.cell_count());
    println!("  Occupied:     {:>10}", field.occupied_count());
    println!("  Fill ratio:   {:>10.4}", field.fill_ratio());
    if let Some((min, max)) = field.bounds() {
        println!(
            "  Bounds:       ({:.1}, {:.1}, {:.1}) - ({:.1}, {:.1}, {:.1})",
            min.x, min.y, min.z, max.x, max.y, max.z
        );
    }
}

fn run_info(width: u32, depth: u32, cloud_width: u32, cloud_height: u32, cloud_depth: u32) {
    let terrain = TerrainConfig::with_size(width, depth);
    let clouds = CloudConfig::with_size(cloud_width, cloud_height, cloud_depth);

    let vertices = terrain.vertex_count();
    let triangles = terrain.triangle_count();
    let bytes_vertices = vertices * 12; // Vec3
    let bytes_triangles = triangles * 12; // [u32; 3]
    let cells = clouds.cell_count();
    let bytes_voxel = 28u64; // UVec3 + Vec3 + f32

    println!("Noisescape - Configuration Info");
    println!("===============================");
    println!();
    println!("Terrain: {}x{} cells", width, depth);
    println!("  Vertices:  {:>12}", vertices);
    println!("  Triangles: {:>12}", triangles);
    println!(
        "  Memory:    {:>12} bytes ({:.2} MB)",
        bytes_vertices + bytes_triangles,
        (bytes_vertices + bytes_triangles) as f64 / 1024.0 / 1024.0
    );
    if vertices > u32::MAX as u64 {
        println!("  Warning:   too many vertices for 32-bit indices");
    }
    println!();
    println!("Clouds: {}x{}x{} cells", clouds.width, clouds.height, clouds.depth);
    println!("  Cells:     {:>12}", cells);
    println!(
        "  Memory if fully occupied: {} bytes ({:.2} MB)",
        cells * bytes_voxel,
        (cells * bytes_voxel) as f64 / 1024.0 / 1024.0
    );
}

fn parse_vec3(s: &str) -> Result<Vec3, String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    if parts.len() != 3 {
        return Err(format!("expected \"x,y,z\", got \"{}\"", s));
    }
    let mut values = [0.0f32; 3];
    for (value, part) in values.iter_mut().zip(parts) {
        *value = part
            .parse()
            .map_err(|e| format!("invalid component \"{}\": {}", part, e))?;
    }
    Ok(Vec3::from_array(values))
}

fn time_seed() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}
