//! Pipeline orchestration
//!
//! load layers → validate → (standard check) → generate → emit
//!
//! Each command runs a prefix of this sequence. Any error stops the
//! pipeline; nothing is written unless generation succeeded.

use std::path::PathBuf;

use log::info;
use thiserror::Error;

use recipe_core::{generate, validate, GeneratedConfig, ManifestError, ValidatedManifest};

use crate::config::{CliOverrides, LoadedRecipe, RecipeError};
use crate::emit::{emit, EmitError, EmitReport};

/// Default output directory for generated files
pub const DEFAULT_OUT_DIR: &str = "build/generators";

/// Pipeline errors
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("recipe error: {0}")]
    Recipe(#[from] RecipeError),

    #[error("manifest error: {0}")]
    Manifest(#[from] ManifestError),

    #[error("emit error: {0}")]
    Emit(#[from] EmitError),
}

impl PipelineError {
    /// Stable error code for manifest failures
    pub fn code(&self) -> Option<&'static str> {
        match self {
            PipelineError::Manifest(e) => Some(e.code().as_str()),
            _ => None,
        }
    }
}

/// Result type for pipeline operations
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Where the pipeline reads its layers from
#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    /// Repo recipe (layer 3)
    pub recipe_path: Option<PathBuf>,

    /// Host defaults (layer 2)
    pub host_defaults_path: Option<PathBuf>,

    /// CLI overrides (layer 4)
    pub overrides: CliOverrides,

    /// Standard the compiler is configured for, checked against the minimum
    pub compiler_standard: Option<u32>,
}

/// Result of a full generate run
#[derive(Debug)]
pub struct GenerateOutcome {
    pub recipe: LoadedRecipe,
    pub config: GeneratedConfig,
    pub report: EmitReport,
}

/// Load and validate without generating
pub fn run_verify(config: &PipelineConfig) -> PipelineResult<(LoadedRecipe, ValidatedManifest)> {
    let recipe = LoadedRecipe::load(
        config.host_defaults_path.as_deref(),
        config.recipe_path.as_deref(),
        &config.overrides,
    )?;

    let validated = validate(&recipe.manifest)?;
    if let Some(compiler_standard) = config.compiler_standard {
        validated.check_compiler_standard(compiler_standard)?;
    }

    Ok((recipe, validated))
}

/// Load, validate, generate, and emit into `out_dir`
pub fn run_generate(config: &PipelineConfig, out_dir: PathBuf) -> PipelineResult<GenerateOutcome> {
    let (recipe, validated) = run_verify(config)?;

    let generated = generate(&validated);
    let report = emit(&generated, &out_dir)?;
    info!(
        "Generated {} requirement(s), digest {}",
        generated.requirements.len(),
        report.digest
    );

    Ok(GenerateOutcome {
        recipe,
        config: generated,
        report,
    })
}
