//! Manifest model and validation.

use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::ManifestError;
use crate::requirement::{Requirement, Scope};
use crate::resolve::resolve_requirements;

/// Language standards a manifest may require, ascending
pub const SUPPORTED_STANDARDS: &[u32] = &[11, 14, 17, 20, 23, 26];

/// Configuration axes the downstream build is parameterized over by default
pub const DEFAULT_SETTINGS: &[&str] = &["os", "compiler", "build_type", "arch"];

/// Build-folder layout handed to the downstream build system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutMode {
    #[default]
    Standard,
}

impl LayoutMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            LayoutMode::Standard => "standard",
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_settings() -> Vec<String> {
    DEFAULT_SETTINGS.iter().map(|s| s.to_string()).collect()
}

/// Declarative description of build requirements and settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    /// Requirements in declaration order (duplicates allowed, last wins)
    #[serde(default, alias = "requirements")]
    pub requires: Vec<Requirement>,

    /// Minimum language standard (e.g. 23 for C++23)
    pub minimum_standard: u32,

    /// Ask the build system to export a compile-commands database
    #[serde(default = "default_true")]
    pub export_compile_commands: bool,

    /// Path of a presets file the build tool should include
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub presets_path: Option<String>,

    #[serde(default)]
    pub layout_mode: LayoutMode,

    /// Configuration axes (os, compiler, ...)
    #[serde(default = "default_settings")]
    pub settings: Vec<String>,
}

impl Manifest {
    /// Empty manifest with default settings
    pub fn new(minimum_standard: u32) -> Self {
        Self {
            requires: Vec::new(),
            minimum_standard,
            export_compile_commands: true,
            presets_path: None,
            layout_mode: LayoutMode::default(),
            settings: default_settings(),
        }
    }

    /// Append a requirement declaration
    pub fn require(mut self, requirement: Requirement) -> Self {
        self.requires.push(requirement);
        self
    }

    pub fn with_export_compile_commands(mut self, enabled: bool) -> Self {
        self.export_compile_commands = enabled;
        self
    }

    pub fn with_presets_path(mut self, path: impl Into<String>) -> Self {
        self.presets_path = Some(path.into());
        self
    }

    pub fn with_settings<I, S>(mut self, settings: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.settings = settings.into_iter().map(Into::into).collect();
        self
    }

    /// Validate this manifest
    pub fn validate(&self) -> Result<ValidatedManifest, ManifestError> {
        validate(self)
    }
}

/// A manifest that passed [`validate`]
///
/// Holds the resolved requirement list so generation never re-resolves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedManifest {
    manifest: Manifest,
    resolved: Vec<Requirement>,
}

impl ValidatedManifest {
    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// Requirements after override resolution
    pub fn resolved_requirements(&self) -> &[Requirement] {
        &self.resolved
    }

    pub fn minimum_standard(&self) -> u32 {
        self.manifest.minimum_standard
    }

    /// Check that a compiler configured for `compiler_standard` meets the minimum
    pub fn check_compiler_standard(&self, compiler_standard: u32) -> Result<(), ManifestError> {
        if compiler_standard < self.manifest.minimum_standard {
            return Err(ManifestError::InsufficientStandard {
                compiler: compiler_standard,
                minimum: self.manifest.minimum_standard,
            });
        }
        Ok(())
    }

    pub fn into_manifest(self) -> Manifest {
        self.manifest
    }
}

/// Validate a manifest.
///
/// Checks, in order: the standard is supported, every requirement has a
/// name and version, and no name is declared under two scopes.
pub fn validate(manifest: &Manifest) -> Result<ValidatedManifest, ManifestError> {
    if !SUPPORTED_STANDARDS.contains(&manifest.minimum_standard) {
        return Err(ManifestError::UnsupportedStandard {
            standard: manifest.minimum_standard,
            supported: SUPPORTED_STANDARDS,
        });
    }

    for (index, requirement) in manifest.requires.iter().enumerate() {
        if let Some(field) = requirement.missing_field() {
            return Err(ManifestError::MalformedRequirement {
                reference: format!("#{}", index),
                field,
            });
        }
    }

    let mut scopes: HashMap<&str, Scope> = HashMap::new();
    for requirement in &manifest.requires {
        match scopes.get(requirement.name.as_str()) {
            Some(&first) if first != requirement.scope => {
                return Err(ManifestError::DuplicateScopeConflict {
                    name: requirement.name.clone(),
                    first,
                    second: requirement.scope,
                });
            }
            Some(_) => {}
            None => {
                scopes.insert(requirement.name.as_str(), requirement.scope);
            }
        }
    }

    let resolved = resolve_requirements(manifest);
    debug!(
        "Validated manifest: standard {}, {} declaration(s), {} resolved",
        manifest.minimum_standard,
        manifest.requires.len(),
        resolved.len()
    );

    Ok(ValidatedManifest {
        manifest: manifest.clone(),
        resolved,
    })
}
