//! Generated build-system settings.
//!
//! Turns a validated manifest into the logical key/value settings a
//! downstream build tool serializes: one dependency-descriptor group and one
//! toolchain group. Nothing here touches the filesystem.

use log::debug;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

use crate::manifest::{LayoutMode, ValidatedManifest};
use crate::requirement::{Requirement, Scope};

/// Schema version for generated_config.json
pub const SCHEMA_VERSION: u32 = 1;

/// Schema identifier
pub const SCHEMA_ID: &str = "buildrecipe/generated_config@1";

/// Generator name of the dependency-descriptor group
pub const DEPS_GENERATOR: &str = "CMakeDeps";

/// Generator name of the toolchain-settings group
pub const TOOLCHAIN_GENERATOR: &str = "CMakeToolchain";

/// Toolchain setting keys
pub const MINIMUM_STANDARD_KEY: &str = "minimum_standard";
pub const EXPORT_COMPILE_COMMANDS_KEY: &str = "export_compile_commands";
pub const PRESETS_PATH_KEY: &str = "presets_path";

/// A single setting value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Bool(bool),
    Integer(i64),
    String(String),
}

impl SettingValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            SettingValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            SettingValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            SettingValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl From<bool> for SettingValue {
    fn from(value: bool) -> Self {
        SettingValue::Bool(value)
    }
}

impl From<u32> for SettingValue {
    fn from(value: u32) -> Self {
        SettingValue::Integer(i64::from(value))
    }
}

impl From<&str> for SettingValue {
    fn from(value: &str) -> Self {
        SettingValue::String(value.to_string())
    }
}

impl From<String> for SettingValue {
    fn from(value: String) -> Self {
        SettingValue::String(value)
    }
}

/// One key/value entry of a settings group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Setting {
    pub key: String,
    pub value: SettingValue,
}

/// Ordered key/value settings emitted for one generator
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SettingsGroup {
    entries: Vec<Setting>,
}

impl SettingsGroup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a setting. Keys are expected to be unique within a group.
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<SettingValue>) {
        self.entries.push(Setting {
            key: key.into(),
            value: value.into(),
        });
    }

    pub fn get(&self, key: &str) -> Option<&SettingValue> {
        self.entries.iter().find(|s| s.key == key).map(|s| &s.value)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|s| s.key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Setting> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Resolved, emitted settings consumed by an external build tool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedConfig {
    /// Schema version
    pub schema_version: u32,

    /// Schema identifier
    pub schema_id: String,

    /// Requirements after override resolution
    pub requirements: Vec<Requirement>,

    /// Settings groups keyed by generator name
    pub generators: BTreeMap<String, SettingsGroup>,

    pub layout_mode: LayoutMode,

    /// Configuration axes the build is parameterized over
    pub settings: Vec<String>,
}

impl GeneratedConfig {
    /// Look up a settings group by generator name
    pub fn group(&self, generator: &str) -> Option<&SettingsGroup> {
        self.generators.get(generator)
    }

    /// Dependency-descriptor group
    pub fn deps(&self) -> Option<&SettingsGroup> {
        self.group(DEPS_GENERATOR)
    }

    /// Toolchain-settings group
    pub fn toolchain(&self) -> Option<&SettingsGroup> {
        self.group(TOOLCHAIN_GENERATOR)
    }

    /// Resolved requirements with the given scope, in resolution order
    pub fn requirements_for(&self, scope: Scope) -> Vec<&Requirement> {
        self.requirements.iter().filter(|r| r.scope == scope).collect()
    }

    /// SHA-256 hex digest of the RFC 8785 (JCS) form of this config
    pub fn digest(&self) -> Result<String, serde_json::Error> {
        let jcs_bytes = serde_json_canonicalizer::to_vec(self)?;

        let mut hasher = Sha256::new();
        hasher.update(&jcs_bytes);
        Ok(hex::encode(hasher.finalize()))
    }

    /// Serialize to JSON (pretty printed)
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load from JSON
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Produce the generated settings for a validated manifest
pub fn generate(validated: &ValidatedManifest) -> GeneratedConfig {
    let manifest = validated.manifest();
    let requirements = validated.resolved_requirements().to_vec();

    let mut deps = SettingsGroup::new();
    for requirement in &requirements {
        deps.push(requirement.name.as_str(), requirement.version.as_str());
    }

    let mut toolchain = SettingsGroup::new();
    toolchain.push(MINIMUM_STANDARD_KEY, manifest.minimum_standard);
    toolchain.push(EXPORT_COMPILE_COMMANDS_KEY, manifest.export_compile_commands);
    if let Some(ref presets) = manifest.presets_path {
        toolchain.push(PRESETS_PATH_KEY, presets.as_str());
    }

    let mut generators = BTreeMap::new();
    generators.insert(DEPS_GENERATOR.to_string(), deps);
    generators.insert(TOOLCHAIN_GENERATOR.to_string(), toolchain);

    debug!(
        "Generated {} dependency entries for standard {}",
        requirements.len(),
        manifest.minimum_standard
    );

    GeneratedConfig {
        schema_version: SCHEMA_VERSION,
        schema_id: SCHEMA_ID.to_string(),
        requirements,
        generators,
        layout_mode: manifest.layout_mode,
        settings: manifest.settings.clone(),
    }
}
