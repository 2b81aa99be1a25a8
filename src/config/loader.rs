//! Layered recipe loading with provenance
//!
//! The loaded recipe records which files contributed to the manifest and a
//! digest of each, so a generated config can be traced back to its inputs.

use chrono::{DateTime, Utc};
use log::info;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use recipe_core::{Manifest, Requirement};

use super::defaults::BuiltinDefaults;
use super::merge::merge_layers;

/// Default repo recipe file name
pub const DEFAULT_RECIPE_FILE: &str = "recipe.toml";

/// Host defaults location relative to $HOME
const HOST_DEFAULTS_PATH: &str = ".config/buildrecipe/defaults.toml";

/// Origin of a recipe layer
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RecipeOrigin {
    Builtin,
    Host,
    Repo,
    Cli,
}

/// A contributing recipe layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeSource {
    pub origin: RecipeOrigin,

    /// File path (None for builtin/cli)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// SHA-256 digest of raw file bytes (None for builtin/cli)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
}

/// Overrides supplied on the command line (layer 4)
///
/// Scalars override the merged layers. `requires` are appended after the
/// recipe's own declarations, so they win by the usual override rule. A CLI
/// requirement takes the scope of the last declaration with the same name.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub minimum_standard: Option<u32>,
    pub export_compile_commands: Option<bool>,
    pub presets_path: Option<String>,
    pub requires: Vec<Requirement>,
}

impl CliOverrides {
    pub fn is_empty(&self) -> bool {
        self.minimum_standard.is_none()
            && self.export_compile_commands.is_none()
            && self.presets_path.is_none()
            && self.requires.is_empty()
    }

    /// Scalar overrides as a merge layer
    fn to_value(&self) -> Value {
        let mut map = serde_json::Map::new();
        if let Some(standard) = self.minimum_standard {
            map.insert("minimum_standard".to_string(), Value::from(standard));
        }
        if let Some(export) = self.export_compile_commands {
            map.insert("export_compile_commands".to_string(), Value::from(export));
        }
        if let Some(ref presets) = self.presets_path {
            map.insert("presets_path".to_string(), Value::from(presets.as_str()));
        }
        Value::Object(map)
    }
}

/// Manifest assembled from all layers, not yet validated
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadedRecipe {
    /// When the layers were merged
    pub created_at: DateTime<Utc>,

    pub manifest: Manifest,

    /// Contributing layers in precedence order
    pub sources: Vec<RecipeSource>,
}

impl LoadedRecipe {
    /// Load a recipe from the given layers.
    ///
    /// Missing host or repo files contribute nothing.
    pub fn load(
        host_defaults_path: Option<&Path>,
        recipe_path: Option<&Path>,
        cli: &CliOverrides,
    ) -> Result<Self, RecipeError> {
        let mut layers = vec![BuiltinDefaults::default().to_value()];
        let mut sources = vec![RecipeSource {
            origin: RecipeOrigin::Builtin,
            path: None,
            digest: None,
        }];

        for (origin, path) in [
            (RecipeOrigin::Host, host_defaults_path),
            (RecipeOrigin::Repo, recipe_path),
        ] {
            let Some(path) = path else { continue };
            if !path.exists() {
                continue;
            }

            let (value, digest) = Self::load_toml_file(path)?;
            info!("Loaded {:?} recipe layer from {}", origin, path.display());
            layers.push(value);
            sources.push(RecipeSource {
                origin,
                path: Some(path.to_string_lossy().to_string()),
                digest: Some(digest),
            });
        }

        if !cli.is_empty() {
            layers.push(cli.to_value());
            sources.push(RecipeSource {
                origin: RecipeOrigin::Cli,
                path: None,
                digest: None,
            });
        }

        let merged = merge_layers(layers);
        let mut manifest: Manifest =
            serde_json::from_value(merged).map_err(|e| RecipeError::Shape(e.to_string()))?;
        for requirement in &cli.requires {
            let scope = manifest
                .requires
                .iter()
                .rev()
                .find(|r| r.name == requirement.name)
                .map_or(requirement.scope, |r| r.scope);
            manifest.requires.push(requirement.clone().with_scope(scope));
        }

        Ok(Self {
            created_at: Utc::now(),
            manifest,
            sources,
        })
    }

    /// Parse a single recipe document with no other layers
    pub fn from_toml_str(contents: &str) -> Result<Manifest, RecipeError> {
        let value = toml_to_json(toml::from_str(contents)?);
        let merged = merge_layers(vec![BuiltinDefaults::default().to_value(), value]);
        serde_json::from_value(merged).map_err(|e| RecipeError::Shape(e.to_string()))
    }

    /// Default host defaults path ($HOME/.config/buildrecipe/defaults.toml)
    pub fn default_host_path() -> Option<PathBuf> {
        std::env::var("HOME")
            .ok()
            .map(|home| PathBuf::from(home).join(HOST_DEFAULTS_PATH))
    }

    /// Read a TOML file, returning its value and the digest of its raw bytes
    fn load_toml_file(path: &Path) -> Result<(Value, String), RecipeError> {
        let bytes = fs::read(path)?;

        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        let digest = hex::encode(hasher.finalize());

        let contents = String::from_utf8(bytes)
            .map_err(|e| RecipeError::Shape(format!("{}: invalid UTF-8: {}", path.display(), e)))?;
        let toml_value: toml::Value = toml::from_str(&contents)?;

        Ok((toml_to_json(toml_value), digest))
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Convert TOML Value to JSON Value
fn toml_to_json(toml: toml::Value) -> Value {
    match toml {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::Number(i.into()),
        toml::Value::Float(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(arr) => Value::Array(arr.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => Value::Object(
            table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect(),
        ),
    }
}

/// Recipe loading errors
#[derive(Debug, thiserror::Error)]
pub enum RecipeError {
    #[error("Failed to read recipe file: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid recipe: {0}")]
    Shape(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use recipe_core::{LayoutMode, Scope};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn toml_file(contents: &str) -> NamedTempFile {
        let mut temp = NamedTempFile::new().unwrap();
        write!(temp, "{}", contents).unwrap();
        temp
    }

    #[test]
    fn test_load_defaults_only() {
        let recipe = LoadedRecipe::load(None, None, &CliOverrides::default()).unwrap();

        assert_eq!(recipe.manifest.minimum_standard, 17);
        assert!(recipe.manifest.export_compile_commands);
        assert!(recipe.manifest.requires.is_empty());
        assert_eq!(recipe.manifest.layout_mode, LayoutMode::Standard);
        assert_eq!(recipe.sources.len(), 1);
        assert_eq!(recipe.sources[0].origin, RecipeOrigin::Builtin);
    }

    #[test]
    fn test_load_repo_recipe() {
        let repo = toml_file(
            r#"
minimum_standard = 23
presets_path = "CMakeUserPresets.json"
requires = ["benchmark/1.8.3", "catch2/3.4.0"]
"#,
        );
        let recipe = LoadedRecipe::load(None, Some(repo.path()), &CliOverrides::default()).unwrap();

        assert_eq!(recipe.manifest.minimum_standard, 23);
        assert_eq!(
            recipe.manifest.presets_path.as_deref(),
            Some("CMakeUserPresets.json")
        );
        assert_eq!(
            recipe.manifest.requires,
            vec![
                Requirement::build("benchmark", "1.8.3"),
                Requirement::build("catch2", "3.4.0"),
            ]
        );
        assert_eq!(recipe.sources[1].origin, RecipeOrigin::Repo);
        assert_eq!(recipe.sources[1].digest.as_ref().map(|d| d.len()), Some(64));
    }

    #[test]
    fn test_requirement_tables() {
        let repo = toml_file(
            r#"
minimum_standard = 20

[[requires]]
name = "gsl"
version = "4.0.0"

[[requires]]
name = "catch2"
version = "3.4.0"
scope = "test"
"#,
        );
        let recipe = LoadedRecipe::load(None, Some(repo.path()), &CliOverrides::default()).unwrap();

        assert_eq!(recipe.manifest.requires[0], Requirement::build("gsl", "4.0.0"));
        assert_eq!(recipe.manifest.requires[1].scope, Scope::Test);
    }

    #[test]
    fn test_repo_overrides_host() {
        let host = toml_file("minimum_standard = 20\nexport_compile_commands = false\n");
        let repo = toml_file("minimum_standard = 23\n");

        let recipe =
            LoadedRecipe::load(Some(host.path()), Some(repo.path()), &CliOverrides::default())
                .unwrap();

        assert_eq!(recipe.manifest.minimum_standard, 23);
        assert!(!recipe.manifest.export_compile_commands);
        let origins: Vec<_> = recipe.sources.iter().map(|s| s.origin).collect();
        assert_eq!(
            origins,
            vec![RecipeOrigin::Builtin, RecipeOrigin::Host, RecipeOrigin::Repo]
        );
    }

    #[test]
    fn test_cli_overrides_win() {
        let repo = toml_file("minimum_standard = 20\nrequires = [\"gsl/4.0.0\"]\n");
        let cli = CliOverrides {
            minimum_standard: Some(23),
            export_compile_commands: Some(false),
            presets_path: None,
            requires: vec![Requirement::build("gsl", "4.1.0")],
        };

        let recipe = LoadedRecipe::load(None, Some(repo.path()), &cli).unwrap();

        assert_eq!(recipe.manifest.minimum_standard, 23);
        assert!(!recipe.manifest.export_compile_commands);
        assert_eq!(recipe.manifest.requires.len(), 2);
        assert_eq!(recipe.manifest.requires[1].version, "4.1.0");
        assert_eq!(recipe.sources.last().unwrap().origin, RecipeOrigin::Cli);
    }

    #[test]
    fn test_cli_requirement_keeps_declared_scope() {
        let repo = toml_file(
            "requires = [{ name = \"catch2\", version = \"3.4.0\", scope = \"test\" }]\n",
        );
        let cli = CliOverrides {
            requires: vec!["catch2/3.5.0".parse().unwrap(), "fmt/10.2.1".parse().unwrap()],
            ..Default::default()
        };

        let recipe = LoadedRecipe::load(None, Some(repo.path()), &cli).unwrap();

        assert_eq!(recipe.manifest.requires[1], Requirement::test("catch2", "3.5.0"));
        assert_eq!(recipe.manifest.requires[2], Requirement::build("fmt", "10.2.1"));
    }

    #[test]
    fn test_missing_files_skipped() {
        let recipe = LoadedRecipe::load(
            Some(Path::new("/nonexistent/defaults.toml")),
            Some(Path::new("/nonexistent/recipe.toml")),
            &CliOverrides::default(),
        )
        .unwrap();
        assert_eq!(recipe.sources.len(), 1);
    }

    #[test]
    fn test_invalid_toml() {
        let repo = toml_file("minimum_standard = \n");
        let err = LoadedRecipe::load(None, Some(repo.path()), &CliOverrides::default()).unwrap_err();
        assert!(matches!(err, RecipeError::Parse(_)));
    }

    #[test]
    fn test_wrong_shape() {
        let repo = toml_file("minimum_standard = \"twenty\"\n");
        let err = LoadedRecipe::load(None, Some(repo.path()), &CliOverrides::default()).unwrap_err();
        assert!(matches!(err, RecipeError::Shape(_)));
        assert!(err.to_string().contains("Invalid recipe"));
    }

    #[test]
    fn test_from_toml_str() {
        let manifest = LoadedRecipe::from_toml_str("requires = [\"fmt/10.2.1\"]\n").unwrap();
        assert_eq!(manifest.minimum_standard, 17);
        assert_eq!(manifest.requires, vec![Requirement::build("fmt", "10.2.1")]);
    }
}
