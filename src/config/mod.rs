//! Recipe loading
//!
//! Builds a manifest from four merged layers:
//! 1. Built-in defaults
//! 2. Host defaults (~/.config/buildrecipe/defaults.toml)
//! 3. Repo recipe (recipe.toml)
//! 4. CLI overrides

mod defaults;
mod loader;
mod merge;

pub use defaults::BuiltinDefaults;
pub use loader::{
    CliOverrides, LoadedRecipe, RecipeError, RecipeOrigin, RecipeSource, DEFAULT_RECIPE_FILE,
};
pub use merge::{deep_merge, merge_layers};
