//! Pipeline module for orchestrating generation stages.
//!
//! Provides a trait-based architecture for running terrain and cloud
//! generation against one shared noise source.

mod stage;

pub use stage::{
    CloudStage, GenerationStage, Pipeline, PipelineError, StageId, TerrainStage, World,
};
