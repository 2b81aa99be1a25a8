//! buildrecipe - build configuration generator
//!
//! Loads a layered recipe into a manifest, validates it, and writes the
//! generated dependency and toolchain settings for a downstream build
//! system. The pure core lives in `recipe-core`; this crate adds recipe
//! loading, artifact emission, and the CLI pipeline.

pub mod config;
pub mod emit;
pub mod pipeline;

pub use config::{CliOverrides, LoadedRecipe, RecipeError, RecipeOrigin, RecipeSource};
pub use emit::{emit, EmitError, EmitReport};
pub use pipeline::{run_generate, run_verify, GenerateOutcome, PipelineConfig, PipelineError};
pub use recipe_core::{
    generate, resolve_requirements, validate, GeneratedConfig, LayoutMode, Manifest,
    ManifestError, Requirement, Scope, SettingValue, SettingsGroup, ValidatedManifest,
};
