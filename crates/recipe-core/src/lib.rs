//! Build configuration generator core.
//!
//! A manifest declares versioned requirements and a handful of toolchain
//! settings. It goes through three stages:
//!
//! 1. [`validate`] checks the language standard, requirement fields, and
//!    scope consistency, producing a [`ValidatedManifest`]
//! 2. [`resolve_requirements`] merges duplicate names, last declaration wins
//! 3. [`generate`] emits the per-generator key/value settings
//!
//! Everything here is pure; writing the settings out is up to the caller.

mod error;
mod generate;
mod manifest;
mod requirement;
mod resolve;

pub use error::{ErrorCode, ManifestError, RequirementField};
pub use generate::{
    generate, GeneratedConfig, Setting, SettingValue, SettingsGroup, DEPS_GENERATOR,
    EXPORT_COMPILE_COMMANDS_KEY, MINIMUM_STANDARD_KEY, PRESETS_PATH_KEY, SCHEMA_ID,
    SCHEMA_VERSION, TOOLCHAIN_GENERATOR,
};
pub use manifest::{
    validate, LayoutMode, Manifest, ValidatedManifest, DEFAULT_SETTINGS, SUPPORTED_STANDARDS,
};
pub use requirement::{Requirement, Scope};
pub use resolve::resolve_requirements;
