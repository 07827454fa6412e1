//! Generation stage trait and pipeline orchestration.

use thiserror::Error;
use tracing::info;

use crate::clouds::{generate_clouds, CloudConfig, CloudField};
use crate::config::GeneratorConfig;
use crate::error::GenerationError;
use crate::noise::PerlinNoise;
use crate::terrain::{generate_heightfield, HeightFieldMesh, TerrainConfig};

/// Unique identifier for generation stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageId {
    /// Height-field terrain mesh.
    Terrain,
    /// Thresholded cloud voxels.
    Clouds,
}

impl StageId {
    /// Returns the name of the stage.
    pub fn name(&self) -> &'static str {
        match self {
            StageId::Terrain => "terrain",
            StageId::Clouds => "clouds",
        }
    }
}

/// Errors that can occur during pipeline execution.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Stage '{stage}' failed: {source}")]
    StageFailed {
        stage: &'static str,
        #[source]
        source: GenerationError,
    },
}

/// Output artifacts of a pipeline run.
#[derive(Debug, Clone, Default)]
pub struct World {
    pub terrain: Option<HeightFieldMesh>,
    pub clouds: Option<CloudField>,
}

/// A single generation step writing one artifact into the [`World`].
pub trait GenerationStage: Send + Sync {
    /// Returns the unique identifier for this stage.
    fn id(&self) -> StageId;

    /// Returns a human-readable name for the stage.
    fn name(&self) -> &str;

    /// Executes the stage against the shared noise source.
    fn execute(&self, noise: &PerlinNoise, world: &mut World) -> Result<(), PipelineError>;
}

/// Runs the stages of a generation in order against one noise source.
pub struct Pipeline {
    noise: PerlinNoise,
    stages: Vec<Box<dyn GenerationStage>>,
}

impl Pipeline {
    /// Creates a new empty pipeline with a fresh noise source.
    pub fn new() -> Self {
        Self {
            noise: PerlinNoise::new(),
            stages: Vec::new(),
        }
    }

    /// Builds a pipeline with one stage per section present in `config`.
    pub fn from_config(config: &GeneratorConfig) -> Self {
        let mut pipeline = Self::new();
        if let Some(terrain) = &config.terrain {
            pipeline.add_stage(TerrainStage::new(terrain.clone()));
        }
        if let Some(clouds) = &config.clouds {
            pipeline.add_stage(CloudStage::new(clouds.clone()));
        }
        pipeline
    }

    /// Adds a stage to the pipeline.
    pub fn add_stage<S: GenerationStage + 'static>(&mut self, stage: S) -> &mut Self {
        self.stages.push(Box::new(stage));
        self
    }

    /// Returns the number of stages in the pipeline.
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    pub fn noise(&self) -> &PerlinNoise {
        &self.noise
    }

    /// Executes all stages in order.
    pub fn run(&self) -> Result<World, PipelineError> {
        self.run_with_callbacks(|_, _, _| {}, |_, _, _| {})
    }

    /// Executes all stages with progress callbacks.
    ///
    /// # Arguments
    /// * `on_stage_start` - Called when each stage begins
    /// * `on_stage_complete` - Called when each stage finishes
    pub fn run_with_callbacks<F1, F2>(
        &self,
        mut on_stage_start: F1,
        mut on_stage_complete: F2,
    ) -> Result<World, PipelineError>
    where
        F1: FnMut(&str, usize, usize),
        F2: FnMut(&str, usize, usize),
    {
        let total = self.stages.len();
        let mut world = World::default();

        for (i, stage) in self.stages.iter().enumerate() {
            on_stage_start(stage.name(), i, total);
            stage.execute(&self.noise, &mut world)?;
            info!(stage = stage.id().name(), "stage complete");
            on_stage_complete(stage.name(), i, total);
        }

        Ok(world)
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

/// Height-field terrain stage.
pub struct TerrainStage {
    pub config: TerrainConfig,
}

impl TerrainStage {
    pub fn new(config: TerrainConfig) -> Self {
        Self { config }
    }
}

impl GenerationStage for TerrainStage {
    fn id(&self) -> StageId {
        StageId::Terrain
    }

    fn name(&self) -> &str {
        "Terrain Generation"
    }

    fn execute(&self, noise: &PerlinNoise, world: &mut World) -> Result<(), PipelineError> {
        let mesh = generate_heightfield(noise, &self.config).map_err(|source| {
            PipelineError::StageFailed {
                stage: self.id().name(),
                source,
            }
        })?;
        world.terrain = Some(mesh);
        Ok(())
    }
}

/// Cloud voxel stage.
pub struct CloudStage {
    pub config: CloudConfig,
}

impl CloudStage {
    pub fn new(config: CloudConfig) -> Self {
        Self { config }
    }
}

impl GenerationStage for CloudStage {
    fn id(&self) -> StageId {
        StageId::Clouds
    }

    fn name(&self) -> &str {
        "Cloud Generation"
    }

    fn execute(&self, noise: &PerlinNoise, world: &mut World) -> Result<(), PipelineError> {
        let field = generate_clouds(noise, &self.config).map_err(|source| {
            PipelineError::StageFailed {
                stage: self.id().name(),
                source,
            }
        })?;
        world.clouds = Some(field);
        Ok(())
    }
}
